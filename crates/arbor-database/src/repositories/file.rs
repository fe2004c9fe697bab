//! File repository implementation.

use sqlx::PgPool;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{CreateFile, File};

/// Repository for file record operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a file in a folder by name and extension.
    pub async fn find_by_folder_and_name(
        &self,
        folder_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE folder_id = $1 AND name = $2 AND extension = $3",
        )
        .bind(folder_id)
        .bind(name)
        .bind(extension)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file by name", e))
    }

    /// List all files in a folder.
    pub async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE folder_id = $1 ORDER BY name ASC, extension ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, folder_id, name, extension, owner, group_id, permissions, \
             last_modified, size_bytes, checksum_sha256, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(data.id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.extension)
        .bind(data.owner)
        .bind(data.group)
        .bind(data.permissions)
        .bind(data.last_modified)
        .bind(data.size_bytes)
        .bind(&data.checksum_sha256)
        .bind(data.uploaded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::name_conflict(format!(
                    "File '{}.{}' already exists",
                    data.name, data.extension
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    /// Rename a file.
    pub async fn rename(&self, id: FileId, name: &str, extension: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE files SET name = $2, extension = $3 WHERE id = $1")
            .bind(id)
            .bind(name)
            .bind(extension)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::name_conflict(format!("File '{name}.{extension}' already exists"))
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to rename file", e),
            })?;
        require_row(result.rows_affected(), id)
    }

    /// Move a file to another folder.
    pub async fn move_to_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<()> {
        let result = sqlx::query("UPDATE files SET folder_id = $2 WHERE id = $1")
            .bind(id)
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::name_conflict("Destination already holds a file with that name")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to move file", e),
            })?;
        require_row(result.rows_affected(), id)
    }

    /// Delete a file record.
    pub async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}

fn require_row(rows_affected: u64, id: FileId) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::file_not_found(id));
    }
    Ok(())
}
