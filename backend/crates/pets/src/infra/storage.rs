//! Local File Storage
//!
//! Bytes live under `storage_dir` as `{uuid}.{ext}`; metadata lives in the
//! `uploaded_files` table.

use std::path::PathBuf;

use chrono::Utc;
use kernel::id::UploadedFileId;
use sqlx::PgPool;

use crate::domain::entities::UploadedFile;
use crate::domain::repository::FileStorage;
use crate::error::PetsResult;
use crate::infra::postgres::UploadedFileRow;

#[derive(Clone)]
pub struct PgLocalFileStorage {
    pool: PgPool,
    storage_dir: PathBuf,
}

impl PgLocalFileStorage {
    pub fn new(pool: PgPool, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            storage_dir: storage_dir.into(),
        }
    }

    /// Create the storage directory if it does not exist yet
    pub async fn ensure_dir(&self) -> PetsResult<()> {
        tokio::fs::create_dir_all(&self.storage_dir).await?;
        Ok(())
    }
}

impl FileStorage for PgLocalFileStorage {
    async fn store(&self, bytes: &[u8], extension: &str) -> PetsResult<UploadedFile> {
        let id = UploadedFileId::new();
        let path = format!("{id}.{extension}");

        tokio::fs::write(self.storage_dir.join(&path), bytes).await?;

        let file = UploadedFile {
            id,
            path,
            file_url: None,
            created_at: Utc::now(),
        };

        let inserted = sqlx::query(
            "INSERT INTO uploaded_files (id, path, file_url, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(file.id.as_uuid())
        .bind(&file.path)
        .bind(&file.file_url)
        .bind(file.created_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = inserted {
            if let Err(io) = tokio::fs::remove_file(self.storage_dir.join(&file.path)).await {
                tracing::warn!(path = %file.path, error = %io, "Orphaned file left on disk");
            }
            return Err(e.into());
        }

        tracing::debug!(file_id = %file.id, bytes = bytes.len(), "File stored");
        Ok(file)
    }

    async fn get(&self, id: &UploadedFileId) -> PetsResult<Option<UploadedFile>> {
        let row = sqlx::query_as::<_, UploadedFileRow>(
            "SELECT id, path, file_url, created_at FROM uploaded_files WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UploadedFileRow::into_file))
    }

    async fn delete(&self, id: &UploadedFileId) -> PetsResult<()> {
        let path: Option<String> =
            sqlx::query_scalar("DELETE FROM uploaded_files WHERE id = $1 RETURNING path")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        let Some(path) = path else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.storage_dir.join(&path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(file_id = %id, path = %path, "Stored file already missing on disk");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
