//! Folder entity model.

use serde::{Deserialize, Serialize};

use docvault_core::types::{ArchiveId, FolderId};

use crate::traversal::for_each_folder_mut;

/// A non-root node in an archive's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The owning archive.
    pub archive_id: ArchiveId,
    /// Parent folder ID (None for a direct child of the archive).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Child folders, in display order.
    #[serde(default)]
    pub child_folders: Vec<Folder>,
    /// Not selectable as a move/copy destination.
    #[serde(default)]
    pub disabled: bool,
    /// Expanded in the tree widget.
    #[serde(default)]
    pub expanded: bool,
}

impl Folder {
    /// Create an empty folder with a fresh identifier.
    pub fn new(archive_id: ArchiveId, parent_id: Option<FolderId>, name: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(),
            archive_id,
            parent_id,
            name: name.into(),
            child_folders: Vec::new(),
            disabled: false,
            expanded: false,
        }
    }

    /// Append a child folder, fixing up its archive and parent links.
    pub fn with_child(mut self, mut child: Folder) -> Self {
        child.rehome(self.archive_id, Some(self.id));
        self.child_folders.push(child);
        self
    }

    /// Whether this folder sits directly under its archive.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of folders in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .child_folders
            .iter()
            .map(Folder::subtree_size)
            .sum::<usize>()
    }

    /// Attach this subtree to a new archive and parent.
    ///
    /// Descendants keep their parent links and only have their archive
    /// rewritten.
    pub fn rehome(&mut self, archive_id: ArchiveId, parent_id: Option<FolderId>) {
        self.parent_id = parent_id;
        for_each_folder_mut(std::slice::from_mut(self), |folder| folder.archive_id = archive_id);
    }
}

/// Body sent to the folder create/rename/move/copy endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPayload {
    /// Target archive (omitted for create, where the URL carries it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_id: Option<ArchiveId>,
    /// Folder name.
    pub name: String,
    /// Target parent folder; null places the folder at archive level.
    pub parent_id: Option<FolderId>,
}

impl FolderPayload {
    /// Payload for creating a folder.
    pub fn create(name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            archive_id: None,
            name: name.into(),
            parent_id,
        }
    }

    /// Payload addressing a folder at a specific archive and parent.
    pub fn placed(
        archive_id: ArchiveId,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
    ) -> Self {
        Self {
            archive_id: Some(archive_id),
            name: name.into(),
            parent_id,
        }
    }
}
