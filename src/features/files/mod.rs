//! Uploaded datasets
//!
//! | Method | Path                       | Description                     |
//! |--------|----------------------------|---------------------------------|
//! | POST   | `/files/upload`            | Upload a csv/xls/xlsx file      |
//! | GET    | `/files/list`              | List the current user's files   |
//! | DELETE | `/files/delete/{file_id}`  | Delete a file and its record    |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::FileService;
