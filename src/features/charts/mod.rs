//! Chart suggestions and chart data
//!
//! | Method | Path                        | Description                          |
//! |--------|-----------------------------|--------------------------------------|
//! | GET    | `/charts/suggest/{file_id}` | Charts that fit the file's columns   |
//! | GET    | `/charts/data/{file_id}`    | Whole file as columnar JSON          |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ChartService;
