//! Document-storage API trait.

use async_trait::async_trait;

use docvault_core::result::AppResult;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::folder::{Folder, FolderPayload};
use docvault_entity::upload::{UploadFile, UploadResponse};

/// Logical operations of the remote document-storage API.
///
/// Every structural call either returns the server's view of the affected
/// node or fails with an `ExternalService` error; implementations never
/// retry. Upload calls return one response per file and only fail as a
/// whole when nothing could be sent.
#[async_trait]
pub trait DocumentApi: Send + Sync + std::fmt::Debug + 'static {
    /// Return the implementation name (e.g. "http", "memory").
    fn provider_type(&self) -> &str;

    /// Create a folder in an archive.
    async fn create_folder(&self, archive_id: ArchiveId, payload: FolderPayload) -> AppResult<Folder>;

    /// Rename a folder.
    async fn rename_folder(
        &self,
        archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder>;

    /// Rename an archive.
    async fn rename_archive(&self, archive_id: ArchiveId, name: &str) -> AppResult<bool>;

    /// Delete a folder and its contents.
    async fn delete_folder(&self, archive_id: ArchiveId, folder_id: FolderId) -> AppResult<bool>;

    /// Delete an archive.
    async fn delete_archive(&self, archive_id: ArchiveId) -> AppResult<bool>;

    /// Move a folder to the archive/parent named in the payload.
    async fn move_folder(
        &self,
        dest_archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder>;

    /// Copy a folder to the archive/parent named in the payload.
    async fn copy_folder(
        &self,
        src_archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder>;

    /// Upload files to the root of an archive.
    async fn upload_files_to_archive(
        &self,
        archive_id: ArchiveId,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<UploadResponse>>;

    /// Upload files into a folder.
    async fn upload_files_to_folder(
        &self,
        archive_id: ArchiveId,
        folder_id: FolderId,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<UploadResponse>>;
}
