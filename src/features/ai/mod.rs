//! LLM summaries and chat grounded in a file preview
//!
//! | Method | Path                    | Description                        |
//! |--------|-------------------------|------------------------------------|
//! | GET    | `/ai/summary/{file_id}` | Markdown summary of the dataset    |
//! | POST   | `/ai/chat`              | Answer a question about a dataset  |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::AiService;
