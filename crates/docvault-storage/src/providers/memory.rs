//! In-process document API.
//!
//! Keeps a forest in memory and answers every call the way the remote
//! service does, for offline use and tests. Individual calls can be
//! scripted to fail, and every call is recorded so callers can assert that
//! locally rejected operations never reached the API.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::archive::Archive;
use docvault_entity::folder::{Folder, FolderPayload};
use docvault_entity::traversal::{Visit, depth_first, find_folder, find_folder_mut};
use docvault_entity::upload::{CREATED_STATUS, UploadFile, UploadResponse};

use crate::api::DocumentApi;

/// Which API call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// `create_folder`
    CreateFolder,
    /// `rename_folder`
    RenameFolder,
    /// `rename_archive`
    RenameArchive,
    /// `delete_folder`
    DeleteFolder,
    /// `delete_archive`
    DeleteArchive,
    /// `move_folder`
    MoveFolder,
    /// `copy_folder`
    CopyFolder,
    /// `upload_files_to_archive`
    UploadToArchive,
    /// `upload_files_to_folder`
    UploadToFolder,
}

/// In-memory document API.
#[derive(Debug, Default)]
pub struct InMemoryDocumentApi {
    /// Server-side forest.
    forest: RwLock<Vec<Archive>>,
    /// Calls received, in order.
    calls: Mutex<Vec<ApiOperation>>,
    /// Scripted one-shot failures: operation -> HTTP status.
    failures: Mutex<HashMap<ApiOperation, u16>>,
    /// Scripted per-file upload statuses, consumed in order.
    upload_statuses: Mutex<VecDeque<u16>>,
    /// Names of accepted files per (archive, folder).
    stored_files: Mutex<HashMap<(ArchiveId, Option<FolderId>), Vec<String>>>,
}

impl InMemoryDocumentApi {
    /// Create an API with an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an API serving the given forest.
    pub fn with_forest(forest: Vec<Archive>) -> Self {
        Self {
            forest: RwLock::new(forest),
            ..Self::default()
        }
    }

    /// Make the next call of `operation` fail with `status`.
    pub fn fail_next(&self, operation: ApiOperation, status: u16) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.insert(operation, status);
    }

    /// Script the statuses returned for the next uploaded files.
    ///
    /// Files beyond the scripted list are accepted with 201.
    pub fn script_upload_statuses(&self, statuses: impl IntoIterator<Item = u16>) {
        let mut queue = self.upload_statuses.lock().unwrap_or_else(|e| e.into_inner());
        queue.extend(statuses);
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<ApiOperation> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Names of files accepted for a node.
    pub fn stored_files(&self, archive_id: ArchiveId, folder_id: Option<FolderId>) -> Vec<String> {
        let stored = self.stored_files.lock().unwrap_or_else(|e| e.into_inner());
        stored.get(&(archive_id, folder_id)).cloned().unwrap_or_default()
    }

    /// A copy of the server-side forest.
    pub async fn snapshot(&self) -> Vec<Archive> {
        self.forest.read().await.clone()
    }

    /// Records the call and returns the scripted failure, if any.
    fn enter(&self, operation: ApiOperation) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(operation);

        let scripted = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&operation);

        match scripted {
            Some(status) => {
                debug!(?operation, status, "Scripted API failure");
                Err(AppError::api_rejected(
                    status,
                    format!("{operation:?} rejected with status {status}"),
                ))
            }
            None => Ok(()),
        }
    }

    fn upload(
        &self,
        archive_id: ArchiveId,
        folder_id: Option<FolderId>,
        files: Vec<UploadFile>,
    ) -> Vec<UploadResponse> {
        let mut queue = self.upload_statuses.lock().unwrap_or_else(|e| e.into_inner());
        let mut stored = self.stored_files.lock().unwrap_or_else(|e| e.into_inner());

        files
            .into_iter()
            .map(|file| {
                let status = match queue.pop_front() {
                    Some(status) => status,
                    None if file.name.trim().is_empty() => 400,
                    None => CREATED_STATUS,
                };
                let response = UploadResponse::new(file.name.clone(), status);
                if status == CREATED_STATUS {
                    stored
                        .entry((archive_id, folder_id))
                        .or_default()
                        .push(file.name);
                    response
                } else {
                    response.with_message(format!("Upload rejected with status {status}"))
                }
            })
            .collect()
    }
}

fn rejected(status: u16, message: impl Into<String>) -> AppError {
    AppError::api_rejected(status, message)
}

fn require_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(rejected(400, "Name cannot be empty"));
    }
    Ok(())
}

fn archive_mut(forest: &mut [Archive], id: ArchiveId) -> AppResult<&mut Archive> {
    forest
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| rejected(404, format!("Archive {id} not found")))
}

/// Removes a folder from wherever it sits below `folders`.
fn detach_folder(folders: &mut Vec<Folder>, id: FolderId) -> Option<Folder> {
    if let Some(pos) = folders.iter().position(|f| f.id == id) {
        return Some(folders.remove(pos));
    }
    let parent = depth_first(
        folders.iter_mut(),
        |folder| folder.child_folders.iter_mut(),
        |folder| {
            if folder.child_folders.iter().any(|c| c.id == id) {
                Visit::Stop
            } else {
                Visit::Continue
            }
        },
    )?;
    let pos = parent.child_folders.iter().position(|c| c.id == id)?;
    Some(parent.child_folders.remove(pos))
}

/// Checks that `archive_id` exists and holds `parent_id`, if one is given.
fn require_destination(
    forest: &[Archive],
    archive_id: ArchiveId,
    parent_id: Option<FolderId>,
) -> AppResult<()> {
    let archive = forest
        .iter()
        .find(|a| a.id == archive_id)
        .ok_or_else(|| rejected(404, format!("Archive {archive_id} not found")))?;
    if let Some(parent_id) = parent_id {
        find_folder(&archive.child_folders, parent_id)
            .ok_or_else(|| rejected(404, format!("Parent folder {parent_id} not found")))?;
    }
    Ok(())
}

/// Inserts `folder` under its `archive_id`/`parent_id`.
fn attach_folder(forest: &mut [Archive], folder: Folder) -> AppResult<()> {
    let archive = archive_mut(forest, folder.archive_id)?;
    match folder.parent_id {
        None => archive.child_folders.push(folder),
        Some(parent_id) => {
            let parent = find_folder_mut(&mut archive.child_folders, parent_id)
                .ok_or_else(|| rejected(404, format!("Parent folder {parent_id} not found")))?;
            parent.child_folders.push(folder);
        }
    }
    Ok(())
}

/// Gives a copied subtree fresh identifiers, rooted at `parent_id`.
fn reassign_ids(root: &mut Folder, parent_id: Option<FolderId>) {
    depth_first(
        [(root, parent_id)],
        |(folder, _)| {
            let id = folder.id;
            folder.child_folders.iter_mut().map(move |c| (c, Some(id)))
        },
        |(folder, parent)| {
            folder.id = FolderId::new();
            folder.parent_id = *parent;
            Visit::Continue
        },
    );
}

#[async_trait]
impl DocumentApi for InMemoryDocumentApi {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn create_folder(&self, archive_id: ArchiveId, payload: FolderPayload) -> AppResult<Folder> {
        self.enter(ApiOperation::CreateFolder)?;
        require_name(&payload.name)?;

        let folder = Folder::new(archive_id, payload.parent_id, payload.name);
        let mut forest = self.forest.write().await;
        attach_folder(&mut forest, folder.clone())?;

        info!(archive_id = %archive_id, folder_id = %folder.id, "Folder created");
        Ok(folder)
    }

    async fn rename_folder(
        &self,
        archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder> {
        self.enter(ApiOperation::RenameFolder)?;
        require_name(&payload.name)?;

        let mut forest = self.forest.write().await;
        let archive = archive_mut(&mut forest, archive_id)?;
        let folder = find_folder_mut(&mut archive.child_folders, folder_id)
            .ok_or_else(|| rejected(404, format!("Folder {folder_id} not found")))?;
        folder.name = payload.name;
        Ok(folder.clone())
    }

    async fn rename_archive(&self, archive_id: ArchiveId, name: &str) -> AppResult<bool> {
        self.enter(ApiOperation::RenameArchive)?;
        require_name(name)?;

        let mut forest = self.forest.write().await;
        match forest.iter_mut().find(|a| a.id == archive_id) {
            Some(archive) => {
                archive.name = name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_folder(&self, archive_id: ArchiveId, folder_id: FolderId) -> AppResult<bool> {
        self.enter(ApiOperation::DeleteFolder)?;

        let mut forest = self.forest.write().await;
        let archive = archive_mut(&mut forest, archive_id)?;
        Ok(detach_folder(&mut archive.child_folders, folder_id).is_some())
    }

    async fn delete_archive(&self, archive_id: ArchiveId) -> AppResult<bool> {
        self.enter(ApiOperation::DeleteArchive)?;

        let mut forest = self.forest.write().await;
        let before = forest.len();
        forest.retain(|a| a.id != archive_id);
        Ok(forest.len() != before)
    }

    async fn move_folder(
        &self,
        dest_archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder> {
        self.enter(ApiOperation::MoveFolder)?;
        require_name(&payload.name)?;

        let target_archive = payload.archive_id.unwrap_or(dest_archive_id);
        let mut forest = self.forest.write().await;

        let source = forest
            .iter()
            .find_map(|a| find_folder(&a.child_folders, folder_id))
            .ok_or_else(|| rejected(404, format!("Folder {folder_id} not found")))?;
        if let Some(parent_id) = payload.parent_id {
            if find_folder(std::slice::from_ref(source), parent_id).is_some() {
                return Err(rejected(409, "Cannot move a folder into its own subtree"));
            }
        }
        require_destination(&forest, target_archive, payload.parent_id)?;

        let mut folder = forest
            .iter_mut()
            .find_map(|a| detach_folder(&mut a.child_folders, folder_id))
            .ok_or_else(|| rejected(404, format!("Folder {folder_id} not found")))?;
        folder.name = payload.name;
        folder.rehome(target_archive, payload.parent_id);
        attach_folder(&mut forest, folder.clone())?;

        info!(folder_id = %folder_id, archive_id = %target_archive, "Folder moved");
        Ok(folder)
    }

    async fn copy_folder(
        &self,
        src_archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder> {
        self.enter(ApiOperation::CopyFolder)?;
        require_name(&payload.name)?;

        let target_archive = payload.archive_id.unwrap_or(src_archive_id);
        let mut forest = self.forest.write().await;

        let source = forest
            .iter()
            .find(|a| a.id == src_archive_id)
            .and_then(|a| find_folder(&a.child_folders, folder_id))
            .ok_or_else(|| rejected(404, format!("Folder {folder_id} not found")))?;
        if let Some(parent_id) = payload.parent_id {
            if find_folder(std::slice::from_ref(source), parent_id).is_some() {
                return Err(rejected(409, "Cannot copy a folder into its own subtree"));
            }
        }

        let mut copy = source.clone();
        reassign_ids(&mut copy, payload.parent_id);
        copy.name = payload.name;
        copy.rehome(target_archive, payload.parent_id);
        attach_folder(&mut forest, copy.clone())?;

        info!(source = %folder_id, copy = %copy.id, archive_id = %target_archive, "Folder copied");
        Ok(copy)
    }

    async fn upload_files_to_archive(
        &self,
        archive_id: ArchiveId,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<UploadResponse>> {
        self.enter(ApiOperation::UploadToArchive)?;
        if !self.forest.read().await.iter().any(|a| a.id == archive_id) {
            return Err(rejected(404, format!("Archive {archive_id} not found")));
        }
        Ok(self.upload(archive_id, None, files))
    }

    async fn upload_files_to_folder(
        &self,
        archive_id: ArchiveId,
        folder_id: FolderId,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<UploadResponse>> {
        self.enter(ApiOperation::UploadToFolder)?;
        {
            let forest = self.forest.read().await;
            let exists = forest
                .iter()
                .find(|a| a.id == archive_id)
                .and_then(|a| find_folder(&a.child_folders, folder_id))
                .is_some();
            if !exists {
                return Err(rejected(404, format!("Folder {folder_id} not found")));
            }
        }
        Ok(self.upload(archive_id, Some(folder_id), files))
    }
}
