//! Storage module for uploaded files
//!
//! Uploads are kept on the local filesystem under the configured upload folder.

mod upload_dir;

pub use upload_dir::UploadStorage;
