mod auth_service;
pub mod password;
mod session_service;

pub use auth_service::AuthService;
pub use session_service::SessionService;
