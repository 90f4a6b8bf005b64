use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FileResponseDto, UploadResponseDto};
use crate::features::files::models::File;
use crate::modules::storage::UploadStorage;
use crate::shared::tabular::{self, extract_metadata, Table};
use crate::shared::validation::file_extension;

/// Service for uploaded files: storage, metadata and ownership-scoped lookups
pub struct FileService {
    pool: PgPool,
    storage: Arc<UploadStorage>,
}

impl FileService {
    pub fn new(pool: PgPool, storage: Arc<UploadStorage>) -> Self {
        Self { pool, storage }
    }

    /// Store an upload, extract its metadata and record it for the user.
    ///
    /// All-or-nothing: if the file cannot be parsed or recorded, the stored copy is removed.
    pub async fn upload(
        &self,
        user_id: i64,
        original_filename: &str,
        data: &[u8],
    ) -> Result<UploadResponseDto> {
        let stored_name = self.storage.store(original_filename, data).await?;

        match self.record_upload(user_id, &stored_name).await {
            Ok(response) => Ok(response),
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&stored_name).await {
                    warn!(
                        "Failed to remove '{}' after rejected upload: {}",
                        stored_name, cleanup
                    );
                }
                Err(e)
            }
        }
    }

    async fn record_upload(&self, user_id: i64, stored_name: &str) -> Result<UploadResponseDto> {
        let table = self.read_table(stored_name).await?;
        let metadata = extract_metadata(&table);

        let file_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO files (filename, user_id, file_metadata)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(stored_name)
        .bind(user_id)
        .bind(Json(&metadata))
        .fetch_one(&self.pool)
        .await?;

        info!(
            "File uploaded: id={}, filename={}, columns={}, rows={}",
            file_id,
            stored_name,
            metadata.columns.len(),
            metadata.num_rows
        );

        Ok(UploadResponseDto {
            message: "File uploaded".to_string(),
            file_id,
            file_metadata: metadata,
        })
    }

    /// All files owned by the user, oldest first
    pub async fn list(&self, user_id: i64) -> Result<Vec<FileResponseDto>> {
        let files = sqlx::query_as::<_, File>(
            r#"
            SELECT id, filename, upload_time, user_id, file_metadata
            FROM files
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files.into_iter().map(FileResponseDto::from).collect())
    }

    /// Look up a file owned by the user. Someone else's file is reported as not found.
    pub async fn find_owned(&self, file_id: i64, user_id: i64) -> Result<File> {
        sqlx::query_as::<_, File>(
            r#"
            SELECT id, filename, upload_time, user_id, file_metadata
            FROM files
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// Owned file record together with its freshly parsed contents
    pub async fn load_owned(&self, file_id: i64, user_id: i64) -> Result<(File, Table)> {
        let file = self.find_owned(file_id, user_id).await?;
        let table = self.load_table(&file).await?;
        Ok((file, table))
    }

    /// Parse the stored copy of a file record
    pub async fn load_table(&self, file: &File) -> Result<Table> {
        self.read_table(&file.filename).await
    }

    /// Parse a stored file on the blocking pool
    async fn read_table(&self, stored_name: &str) -> Result<Table> {
        let path = self.storage.path_of(stored_name);
        let extension = file_extension(stored_name).unwrap_or_default();

        debug!("Parsing stored file '{}'", stored_name);

        tokio::task::spawn_blocking(move || tabular::load_table(&path, &extension))
            .await
            .map_err(|e| AppError::Internal(format!("File parsing task failed: {}", e)))?
            .map_err(AppError::from)
    }

    /// Delete the stored file, then the record
    pub async fn delete(&self, file_id: i64, user_id: i64) -> Result<()> {
        let file = self.find_owned(file_id, user_id).await?;

        self.storage.remove(&file.filename).await.map_err(|e| match e {
            AppError::Disk(msg) => AppError::Disk(format!("Failed to delete file from disk: {}", msg)),
            other => other,
        })?;

        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file.id)
            .execute(&self.pool)
            .await?;

        info!(
            "File deleted: id={}, user_id={}, filename={}",
            file.id, file.user_id, file.filename
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;
    use tempfile::TempDir;

    async fn service(pool: PgPool) -> (TempDir, FileService) {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(&StorageConfig {
            upload_dir: dir.path().to_path_buf(),
        })
        .await
        .unwrap();
        (dir, FileService::new(pool, Arc::new(storage)))
    }

    async fn create_user(pool: &PgPool, email: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (name, email, password) VALUES ('Test', $1, 'x') RETURNING id",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_upload_names(pool: PgPool) {
        let (_dir, service) = service(pool.clone()).await;
        let user_id = create_user(&pool, "owner@example.com").await;

        let first = service.upload(user_id, "data.csv", b"a,b\n1,2\n").await.unwrap();
        let second = service.upload(user_id, "data.csv", b"a,b\n3,4\n").await.unwrap();
        assert_ne!(first.file_id, second.file_id);
        assert_eq!(first.file_metadata.num_rows, 1);

        let names: Vec<String> = service
            .list(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.filename)
            .collect();
        assert_eq!(names, vec!["data.csv", "data (1).csv"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_other_users_file_is_not_found(pool: PgPool) {
        let (_dir, service) = service(pool.clone()).await;
        let owner = create_user(&pool, "owner@example.com").await;
        let stranger = create_user(&pool, "stranger@example.com").await;

        let upload = service.upload(owner, "data.csv", b"a\n1\n").await.unwrap();

        let file = service.find_owned(upload.file_id, owner).await.unwrap();
        assert_eq!(file.user_id, owner);

        let err = service.load_owned(upload.file_id, stranger).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.delete(upload.file_id, stranger).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_unparseable_upload_leaves_nothing_behind(pool: PgPool) {
        let (dir, service) = service(pool.clone()).await;
        let user_id = create_user(&pool, "owner@example.com").await;

        let err = service.upload(user_id, "empty.csv", b"").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list(user_id).await.unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_removes_file_and_record(pool: PgPool) {
        let (dir, service) = service(pool.clone()).await;
        let user_id = create_user(&pool, "owner@example.com").await;

        let upload = service.upload(user_id, "data.csv", b"a\n1\n").await.unwrap();
        service.delete(upload.file_id, user_id).await.unwrap();

        assert!(!dir.path().join("data.csv").exists());
        assert!(matches!(
            service.find_owned(upload.file_id, user_id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
