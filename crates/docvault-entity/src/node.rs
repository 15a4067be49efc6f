//! Tagged node identifiers.
//!
//! Archives and folders are discriminated by an explicit tag rather than
//! by probing for an `archiveId` field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use docvault_core::error::AppError;
use docvault_core::types::{ArchiveId, FolderId};

/// Identifies one node of the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NodeId {
    /// An archive root.
    Archive(ArchiveId),
    /// A folder.
    Folder(FolderId),
}

impl NodeId {
    /// Whether this identifies an archive.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }

    /// The folder ID, if this identifies a folder.
    pub fn as_folder(&self) -> Option<FolderId> {
        match self {
            Self::Folder(id) => Some(*id),
            Self::Archive(_) => None,
        }
    }
}

impl From<ArchiveId> for NodeId {
    fn from(id: ArchiveId) -> Self {
        Self::Archive(id)
    }
}

impl From<FolderId> for NodeId {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(id) => write!(f, "archive:{id}"),
            Self::Folder(id) => write!(f, "folder:{id}"),
        }
    }
}

impl FromStr for NodeId {
    type Err = AppError;

    /// Parses `archive:<uuid>` or `folder:<uuid>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, raw) = s
            .split_once(':')
            .ok_or_else(|| AppError::validation(format!("Expected kind:uuid, got '{s}'")))?;
        let parse_err = |e: uuid::Error| AppError::validation(format!("Invalid UUID '{raw}': {e}"));
        match kind {
            "archive" => raw.parse().map(Self::Archive).map_err(parse_err),
            "folder" => raw.parse().map(Self::Folder).map_err(parse_err),
            other => Err(AppError::validation(format!("Unknown node kind '{other}'"))),
        }
    }
}

/// Domain payload of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeData {
    /// An archive root.
    Archive {
        /// Archive ID.
        id: ArchiveId,
    },
    /// A folder.
    #[serde(rename_all = "camelCase")]
    Folder {
        /// Folder ID.
        id: FolderId,
        /// Owning archive.
        archive_id: ArchiveId,
        /// Parent folder (None for archive level).
        parent_id: Option<FolderId>,
    },
}

impl NodeData {
    /// Whether this node is an archive.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive { .. })
    }

    /// The node's identifier.
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::Archive { id } => NodeId::Archive(*id),
            Self::Folder { id, .. } => NodeId::Folder(*id),
        }
    }

    /// The archive this node belongs to (itself for an archive).
    pub fn archive_id(&self) -> ArchiveId {
        match self {
            Self::Archive { id } => *id,
            Self::Folder { archive_id, .. } => *archive_id,
        }
    }

    /// The folder parent link (always None for archives).
    pub fn parent_folder(&self) -> Option<FolderId> {
        match self {
            Self::Archive { .. } => None,
            Self::Folder { parent_id, .. } => *parent_id,
        }
    }
}
