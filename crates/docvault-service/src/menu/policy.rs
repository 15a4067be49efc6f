//! Which structural actions a node offers.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use docvault_entity::node::NodeData;

/// A context-menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a child folder.
    NewDirectory,
    /// Rename the node.
    Rename,
    /// Delete the node.
    Delete,
    /// Move the folder elsewhere.
    Move,
    /// Copy the folder elsewhere.
    Copy,
    /// Upload files into the node.
    Upload,
}

impl Action {
    /// Convert to string
    pub fn as_str(&self) -> &str {
        match self {
            Self::NewDirectory => "new_directory",
            Self::Rename => "rename",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions offered for `node`.
///
/// Rename, Upload and NewDirectory are always offered. Move, Copy and
/// Delete are offered only on folders; an archive root is never relocated
/// through the picker. `is_archive_root` lets callers that render archives
/// as folder-shaped rows mark them explicitly.
pub fn available_actions(node: &NodeData, is_archive_root: bool) -> BTreeSet<Action> {
    let mut actions = BTreeSet::from([Action::NewDirectory, Action::Rename, Action::Upload]);
    if !node.is_archive() && !is_archive_root {
        actions.extend([Action::Move, Action::Copy, Action::Delete]);
    }
    actions
}
