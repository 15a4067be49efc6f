//! Archive entity model.

use serde::{Deserialize, Serialize};

use docvault_core::types::ArchiveId;

use crate::folder::Folder;

/// A top-level document container, root of one tree.
///
/// An archive owns its folder subtree exclusively. `disabled` and
/// `expanded` are transient UI flags and default to `false` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    /// Unique archive identifier.
    pub id: ArchiveId,
    /// Archive name.
    pub name: String,
    /// Top-level folders, in display order.
    #[serde(default)]
    pub child_folders: Vec<Folder>,
    /// Not selectable as a move/copy destination.
    #[serde(default)]
    pub disabled: bool,
    /// Expanded in the tree widget.
    #[serde(default)]
    pub expanded: bool,
}

impl Archive {
    /// Create an empty archive with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ArchiveId::new(),
            name: name.into(),
            child_folders: Vec::new(),
            disabled: false,
            expanded: false,
        }
    }

    /// Append a top-level folder, fixing up its archive and parent links.
    pub fn with_folder(mut self, mut folder: Folder) -> Self {
        folder.rehome(self.id, None);
        self.child_folders.push(folder);
        self
    }

    /// Total number of folders in this archive's subtree.
    pub fn folder_count(&self) -> usize {
        self.child_folders.iter().map(Folder::subtree_size).sum()
    }
}
