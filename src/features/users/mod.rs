//! Registered user accounts.
//!
//! No HTTP surface of its own: accounts are created and looked up by the auth feature.

pub mod models;
pub mod services;

pub use services::UserService;
