//! Folder repository implementation.

use sqlx::PgPool;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::types::FolderId;
use arbor_entity::folder::model::{CreateFolder, Folder};

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find the root folder by its reserved name.
    pub async fn find_root(&self, name: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id IS NULL AND name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find root", e))
    }

    /// Find a folder by parent and name.
    pub async fn find_by_name(&self, parent_id: FolderId, name: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = $1 AND name = $2")
            .bind(parent_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
            })
    }

    /// List direct children of a folder.
    pub async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Get the ancestor chain from a folder up to the root, nearest first.
    pub async fn find_ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT * FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.* FROM folders f INNER JOIN ancestors a ON f.id = a.parent_id \
             ) SELECT * FROM ancestors ORDER BY depth DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (parent_id, name, owner, group_id, permissions, depth, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6, 0) RETURNING *",
        )
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(data.owner)
        .bind(data.group)
        .bind(data.permissions)
        .bind(data.depth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::name_conflict(format!("Folder '{}' already exists", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Rename a folder.
    pub async fn rename(&self, folder_id: FolderId, new_name: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE folders SET name = $2 WHERE id = $1")
            .bind(folder_id)
            .bind(new_name)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::name_conflict(format!("Folder '{new_name}' already exists"))
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to rename folder", e),
            })?;
        require_row(result.rows_affected(), folder_id)
    }

    /// Move a folder to a new parent.
    pub async fn move_folder(
        &self,
        folder_id: FolderId,
        new_parent_id: FolderId,
        new_depth: i32,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE folders SET parent_id = $2, depth = $3 WHERE id = $1")
            .bind(folder_id)
            .bind(new_parent_id)
            .bind(new_depth)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::name_conflict("Destination already holds a folder with that name")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to move folder", e),
            })?;
        require_row(result.rows_affected(), folder_id)
    }

    /// Set the depth of a folder.
    pub async fn set_depth(&self, folder_id: FolderId, depth: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE folders SET depth = $2 WHERE id = $1")
            .bind(folder_id)
            .bind(depth)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set depth", e))?;
        require_row(result.rows_affected(), folder_id)
    }

    /// Atomically add to the aggregate size.
    pub async fn increment_size(&self, folder_id: FolderId, delta: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE folders SET size_bytes = size_bytes + $2 WHERE id = $1")
            .bind(folder_id)
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update folder size", e)
            })?;
        require_row(result.rows_affected(), folder_id)
    }

    /// Delete an empty folder.
    pub async fn delete(&self, folder_id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

fn require_row(rows_affected: u64, folder_id: FolderId) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::folder_not_found(folder_id));
    }
    Ok(())
}
