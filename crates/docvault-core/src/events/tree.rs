//! Tree change payloads.

use serde::{Deserialize, Serialize};

use crate::types::{ArchiveId, FolderId};

/// A change applied to the archive/folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeChange {
    /// The whole forest was replaced from an external source.
    Hydrated {
        /// Number of archives in the new forest.
        archive_count: usize,
    },
    /// A folder was created.
    FolderCreated {
        /// Owning archive.
        archive_id: ArchiveId,
        /// The new folder.
        folder_id: FolderId,
        /// Parent folder (None for a top-level folder).
        parent_id: Option<FolderId>,
    },
    /// An archive or folder was renamed.
    Renamed {
        /// The archive (or owning archive of the folder).
        archive_id: ArchiveId,
        /// The folder, when a folder was renamed.
        folder_id: Option<FolderId>,
        /// The new name.
        name: String,
    },
    /// An archive or folder was soft-deleted.
    Deleted {
        /// The archive (or owning archive of the folder).
        archive_id: ArchiveId,
        /// The folder, when a folder was deleted.
        folder_id: Option<FolderId>,
    },
    /// A folder was moved.
    FolderMoved {
        /// The folder.
        folder_id: FolderId,
        /// Archive it was moved out of.
        from_archive_id: ArchiveId,
        /// Destination archive.
        to_archive_id: ArchiveId,
        /// Destination parent folder (None for archive level).
        to_parent_id: Option<FolderId>,
    },
    /// A folder was copied.
    FolderCopied {
        /// The original folder.
        source_folder_id: FolderId,
        /// The folder created by the copy.
        new_folder_id: FolderId,
        /// Destination archive.
        to_archive_id: ArchiveId,
        /// Destination parent folder (None for archive level).
        to_parent_id: Option<FolderId>,
    },
    /// Files were uploaded to a node.
    FilesUploaded {
        /// Target archive.
        archive_id: ArchiveId,
        /// Target folder, when uploading into a folder.
        folder_id: Option<FolderId>,
        /// Number of files accepted.
        succeeded: usize,
        /// Number of files rejected.
        failed: usize,
    },
    /// The selected node changed.
    SelectionChanged {
        /// Selected archive (or owning archive of the folder).
        archive_id: ArchiveId,
        /// Selected folder, if a folder is selected.
        folder_id: Option<FolderId>,
    },
}
