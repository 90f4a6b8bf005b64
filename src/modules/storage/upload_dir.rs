//! Local upload directory
//!
//! Stored files are flat: every upload gets a sanitised, collision-free name directly
//! inside the configured directory.

use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;
use crate::shared::validation::secure_filename;

/// Upper bound on `name (n).ext` candidates tried before giving up
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Longest stored name, suffix included; fits a single path component and `files.filename`
const MAX_STORED_NAME_LEN: usize = 255;

/// Upload storage rooted at a local directory
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Create the storage, making sure the directory exists
    pub async fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let storage = Self {
            root: config.upload_dir.clone(),
        };
        storage.ensure_dir().await?;

        info!("Upload storage ready at {}", storage.root.display());
        Ok(storage)
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Disk(format!(
                "Failed to create upload directory '{}': {}",
                self.root.display(),
                e
            ))
        })
    }

    #[cfg(test)]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Absolute location of a stored file
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Sanitise `filename` and claim the first free name among `name.ext`,
    /// `name (1).ext`, `name (2).ext`, ...
    ///
    /// The file is created with create-new semantics, so two concurrent uploads can
    /// never be handed the same name.
    pub async fn allocate(&self, filename: &str) -> Result<(String, File), AppError> {
        let safe = secure_filename(filename);
        if safe.is_empty() {
            return Err(AppError::BadRequest("Invalid file name".to_string()));
        }

        let (stem, extension) = match safe.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
            _ => (safe.clone(), String::new()),
        };

        // Names are ASCII after sanitising, so length in bytes equals length in characters
        let suffix_len = format!(" ({})", MAX_NAME_ATTEMPTS).len();
        let max_stem = MAX_STORED_NAME_LEN
            .checked_sub(suffix_len + extension.len())
            .filter(|max| *max > 0)
            .ok_or_else(|| AppError::BadRequest("File name is too long".to_string()))?;
        let stem: String = stem.chars().take(max_stem).collect();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                format!("{}{}", stem, extension)
            } else {
                format!("{} ({}){}", stem, attempt, extension)
            };

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.path_of(&candidate))
                .await
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::Disk(format!(
                        "Failed to create '{}': {}",
                        candidate, e
                    )))
                }
            }
        }

        Err(AppError::Disk(format!(
            "No free file name left for '{}'",
            safe
        )))
    }

    /// Write an upload under a freshly allocated name and return that name
    pub async fn store(&self, filename: &str, data: &[u8]) -> Result<String, AppError> {
        let (stored_name, mut file) = self.allocate(filename).await?;

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            self.remove(&stored_name).await?;
            return Err(AppError::Disk(format!(
                "Failed to write '{}': {}",
                stored_name, e
            )));
        }

        debug!("Stored upload '{}' ({} bytes)", stored_name, data.len());
        Ok(stored_name)
    }

    /// Delete a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, filename: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_of(filename)).await {
            Ok(()) => {
                debug!("Removed stored file '{}'", filename);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Stored file '{}' was already missing", filename);
                Ok(())
            }
            Err(e) => Err(AppError::Disk(format!(
                "Failed to delete file '{}': {}",
                filename, e
            ))),
        }
    }
}
