pub mod ai;
pub mod auth;
pub mod charts;
pub mod files;
pub mod users;
