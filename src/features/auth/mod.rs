//! Account registration, login and cookie-backed sessions.
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | POST | `/auth/register` | public |
//! | POST | `/auth/login` | public |
//! | POST | `/auth/logout` | session |

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::{AuthService, SessionService};
