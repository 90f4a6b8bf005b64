//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the upload storage and the chat completion client.

pub mod llm;
pub mod storage;
