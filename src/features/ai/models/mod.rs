mod chat;

#[allow(unused_imports)]
pub use chat::Chat;
