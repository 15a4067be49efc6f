//! Presentation wrapper pairing a domain node with UI-only fields.

use serde::{Deserialize, Serialize};

use crate::archive::Archive;
use crate::folder::Folder;
use crate::node::{NodeData, NodeId};
use crate::traversal::{Visit, depth_first};

/// A node as handed to a tree widget.
///
/// Items are rebuilt from the domain forest whenever it changes and are
/// never patched across renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem {
    /// Node identifier.
    pub id: NodeId,
    /// Display text.
    pub text: String,
    /// Domain payload.
    pub data: NodeData,
    /// Child items, in display order.
    pub items: Vec<TreeItem>,
    /// Not selectable as a move/copy destination.
    pub disabled: bool,
    /// Expanded in the widget.
    pub expanded: bool,
    /// Currently selected.
    pub selected: bool,
    /// Shown in the widget (false after a soft delete).
    pub visible: bool,
}

impl TreeItem {
    /// Wrap an archive and its folders.
    pub fn from_archive(archive: &Archive) -> Self {
        Self {
            id: NodeId::Archive(archive.id),
            text: archive.name.clone(),
            data: NodeData::Archive { id: archive.id },
            items: archive.child_folders.iter().map(Self::from_folder).collect(),
            disabled: archive.disabled,
            expanded: archive.expanded,
            selected: false,
            visible: true,
        }
    }

    /// Wrap a folder and its descendants.
    pub fn from_folder(folder: &Folder) -> Self {
        Self {
            id: NodeId::Folder(folder.id),
            text: folder.name.clone(),
            data: NodeData::Folder {
                id: folder.id,
                archive_id: folder.archive_id,
                parent_id: folder.parent_id,
            },
            items: folder.child_folders.iter().map(Self::from_folder).collect(),
            disabled: folder.disabled,
            expanded: folder.expanded,
            selected: false,
            visible: true,
        }
    }

    /// Depth-first search for an item by ID.
    pub fn find(&self, id: NodeId) -> Option<&TreeItem> {
        depth_first(
            std::iter::once(self),
            |item| item.items.iter(),
            |item| if item.id == id { Visit::Stop } else { Visit::Continue },
        )
    }
}
