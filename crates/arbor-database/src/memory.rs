//! In-memory [`MetadataStore`] used by tests and embedded callers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{CreateFile, File};
use arbor_entity::folder::{CreateFolder, Folder};

use crate::store::MetadataStore;

/// Metadata store holding every record in concurrent maps.
///
/// Name uniqueness is checked and written under one structural lock so two
/// inserts cannot both claim a sibling name. Size increments only take the
/// lock of the folder entry they change.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    folders: DashMap<FolderId, Folder>,
    files: DashMap<FileId, File>,
    structure: Mutex<()>,
    revision: AtomicU64,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Number of folder records, including the root.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Number of file records.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, ()>> {
        self.structure
            .lock()
            .map_err(|_| AppError::internal("Metadata store lock poisoned"))
    }

    fn folder_name_taken(&self, parent_id: Option<FolderId>, name: &str, except: FolderId) -> bool {
        self.folders
            .iter()
            .any(|f| f.parent_id == parent_id && f.name == name && f.id != except)
    }

    fn file_name_taken(&self, folder_id: FolderId, name: &str, ext: &str, except: FileId) -> bool {
        self.files.iter().any(|f| {
            f.folder_id == folder_id && f.name == name && f.extension == ext && f.id != except
        })
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn find_root(&self, name: &str) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .iter()
            .find(|f| f.parent_id.is_none() && f.name == name)
            .map(|f| f.value().clone()))
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.folders.get(&id).map(|f| f.value().clone()))
    }

    async fn find_folder_by_name(
        &self,
        parent_id: FolderId,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .iter()
            .find(|f| f.parent_id == Some(parent_id) && f.name == name)
            .map(|f| f.value().clone()))
    }

    async fn list_subfolders(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        let mut children: Vec<Folder> = self
            .folders
            .iter()
            .filter(|f| f.parent_id == Some(parent_id))
            .map(|f| f.value().clone())
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let _guard = self.lock()?;
        if data.parent_id.is_none() && self.folders.iter().any(|f| f.parent_id.is_none()) {
            return Err(AppError::name_conflict("A root folder already exists"));
        }
        let id = FolderId::new();
        if self.folder_name_taken(data.parent_id, &data.name, id) {
            return Err(AppError::name_conflict(format!(
                "Folder '{}' already exists",
                data.name
            )));
        }
        let folder = Folder {
            id,
            parent_id: data.parent_id,
            name: data.name.clone(),
            owner: data.owner,
            group: data.group,
            permissions: data.permissions,
            depth: data.depth,
            size_bytes: 0,
        };
        self.folders.insert(id, folder.clone());
        self.bump();
        debug!(folder_id = %id, name = %folder.name, "Inserted folder");
        Ok(folder)
    }

    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<()> {
        let _guard = self.lock()?;
        let parent_id = self
            .folders
            .get(&id)
            .map(|f| f.parent_id)
            .ok_or_else(|| AppError::folder_not_found(id))?;
        if self.folder_name_taken(parent_id, name, id) {
            return Err(AppError::name_conflict(format!(
                "Folder '{name}' already exists"
            )));
        }
        if let Some(mut folder) = self.folders.get_mut(&id) {
            folder.name = name.to_string();
        }
        self.bump();
        Ok(())
    }

    async fn set_folder_parent(
        &self,
        id: FolderId,
        parent_id: FolderId,
        depth: i32,
    ) -> AppResult<()> {
        let _guard = self.lock()?;
        let name = self
            .folders
            .get(&id)
            .map(|f| f.name.clone())
            .ok_or_else(|| AppError::folder_not_found(id))?;
        if self.folder_name_taken(Some(parent_id), &name, id) {
            return Err(AppError::name_conflict(
                "Destination already holds a folder with that name",
            ));
        }
        if let Some(mut folder) = self.folders.get_mut(&id) {
            folder.parent_id = Some(parent_id);
            folder.depth = depth;
        }
        self.bump();
        Ok(())
    }

    async fn set_folder_depth(&self, id: FolderId, depth: i32) -> AppResult<()> {
        let mut folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::folder_not_found(id))?;
        folder.depth = depth;
        self.bump();
        Ok(())
    }

    async fn increment_folder_size(&self, id: FolderId, delta: i64) -> AppResult<()> {
        let mut folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::folder_not_found(id))?;
        folder.size_bytes += delta;
        self.bump();
        Ok(())
    }

    async fn remove_folder(&self, id: FolderId) -> AppResult<bool> {
        let removed = self.folders.remove(&id).is_some();
        if removed {
            self.bump();
        }
        Ok(removed)
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|f| f.value().clone()))
    }

    async fn find_file_by_name(
        &self,
        folder_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<Option<File>> {
        Ok(self
            .files
            .iter()
            .find(|f| f.folder_id == folder_id && f.name == name && f.extension == extension)
            .map(|f| f.value().clone()))
    }

    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|f| f.folder_id == folder_id)
            .map(|f| f.value().clone())
            .collect();
        files.sort_by(|a, b| (&a.name, &a.extension).cmp(&(&b.name, &b.extension)));
        Ok(files)
    }

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File> {
        let _guard = self.lock()?;
        if !self.folders.contains_key(&data.folder_id) {
            return Err(AppError::folder_not_found(data.folder_id));
        }
        if self.files.contains_key(&data.id)
            || self.file_name_taken(data.folder_id, &data.name, &data.extension, data.id)
        {
            return Err(AppError::name_conflict(format!(
                "File '{}.{}' already exists",
                data.name, data.extension
            )));
        }
        let file = File::from(data.clone());
        self.files.insert(file.id, file.clone());
        self.bump();
        debug!(file_id = %file.id, name = %file.name, "Inserted file");
        Ok(file)
    }

    async fn rename_file(&self, id: FileId, name: &str, extension: &str) -> AppResult<()> {
        let _guard = self.lock()?;
        let folder_id = self
            .files
            .get(&id)
            .map(|f| f.folder_id)
            .ok_or_else(|| AppError::file_not_found(id))?;
        if self.file_name_taken(folder_id, name, extension, id) {
            return Err(AppError::name_conflict(format!(
                "File '{name}.{extension}' already exists"
            )));
        }
        if let Some(mut file) = self.files.get_mut(&id) {
            file.name = name.to_string();
            file.extension = extension.to_string();
        }
        self.bump();
        Ok(())
    }

    async fn set_file_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<()> {
        let _guard = self.lock()?;
        let (name, extension) = self
            .files
            .get(&id)
            .map(|f| (f.name.clone(), f.extension.clone()))
            .ok_or_else(|| AppError::file_not_found(id))?;
        if !self.folders.contains_key(&folder_id) {
            return Err(AppError::folder_not_found(folder_id));
        }
        if self.file_name_taken(folder_id, &name, &extension, id) {
            return Err(AppError::name_conflict(
                "Destination already holds a file with that name",
            ));
        }
        if let Some(mut file) = self.files.get_mut(&id) {
            file.folder_id = folder_id;
        }
        self.bump();
        Ok(())
    }

    async fn remove_file(&self, id: FileId) -> AppResult<bool> {
        let removed = self.files.remove(&id).is_some();
        if removed {
            self.bump();
        }
        Ok(removed)
    }
}
