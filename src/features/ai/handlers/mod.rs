pub mod ai_handler;

pub use ai_handler::{__path_chat, __path_get_summary, chat, get_summary};
