//! Coordinator state machine types.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use docvault_core::result::AppResult;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::folder::{Folder, FolderPayload};
use docvault_entity::node::{NodeData, NodeId};

use crate::tree::{PickerView, TransferMode};

/// Which form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Create a child folder.
    NewDirectory,
    /// Rename the node.
    Rename,
    /// Confirm deletion.
    Delete,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewDirectory => write!(f, "new_directory"),
            Self::Rename => write!(f, "rename"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Snapshot of the node an operation was opened on.
///
/// Taken when the modal opens and never refreshed, so selecting another
/// node while the modal is up cannot retarget the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedNode {
    /// Node identifier.
    pub id: NodeId,
    /// Domain payload at capture time.
    pub data: NodeData,
    /// Name at capture time.
    pub name: String,
    /// Structural parent at capture time.
    pub parent: Option<NodeId>,
}

/// Monotonic tag of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub(crate) u64);

impl RequestToken {
    /// Raw token value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// User input of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    /// The entered name (unused by the delete form).
    pub name: Option<String>,
}

#[derive(Debug, Validate)]
struct NameField {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    name: String,
}

impl FormInput {
    /// Input carrying a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Input with no fields, as submitted by the delete form.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The trimmed name, rejected when blank or too long.
    pub fn validated_name(&self) -> AppResult<String> {
        let field = NameField {
            name: self.name.as_deref().unwrap_or_default().trim().to_string(),
        };
        field.validate()?;
        Ok(field.name)
    }
}

/// The modal currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// A name/confirmation form.
    Form {
        /// Form kind.
        kind: FormKind,
        /// Node the form acts on.
        target: CapturedNode,
    },
    /// A move/copy destination picker.
    Picker {
        /// Folder being moved or copied.
        target: CapturedNode,
        /// Destination constraints.
        view: PickerView,
    },
}

impl Modal {
    /// Public phase for this modal.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Form { kind, .. } => Phase::FormOpen(*kind),
            Self::Picker { view, .. } => Phase::PickerOpen(view.mode),
        }
    }

    /// Node the modal acts on.
    pub fn target(&self) -> &CapturedNode {
        match self {
            Self::Form { target, .. } | Self::Picker { target, .. } => target,
        }
    }
}

/// The coordinator's internal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum OperationState {
    /// Nothing open.
    #[default]
    Idle,
    /// A modal is open.
    Open(Modal),
    /// A structural call is in flight; `modal` is restored on failure.
    Submitting {
        token: RequestToken,
        request: StructuralRequest,
        modal: Modal,
    },
    /// An upload batch is in flight.
    Uploading { token: RequestToken },
}

impl OperationState {
    pub(crate) fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Open(modal) => modal.phase(),
            Self::Submitting { .. } | Self::Uploading { .. } => Phase::Submitting,
        }
    }

    pub(crate) fn in_flight(&self) -> Option<RequestToken> {
        match self {
            Self::Submitting { token, .. } | Self::Uploading { token } => Some(*token),
            Self::Idle | Self::Open(_) => None,
        }
    }
}

/// Coordinator phase as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "kind", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing open.
    Idle,
    /// A form is open.
    FormOpen(FormKind),
    /// A destination picker is open.
    PickerOpen(TransferMode),
    /// An operation is in flight.
    Submitting,
}

/// A fully resolved API call, built from a modal and its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralRequest {
    /// Create a folder under `parent`.
    CreateFolder {
        archive_id: ArchiveId,
        parent: NodeId,
        payload: FolderPayload,
    },
    /// Rename an archive.
    RenameArchive { archive_id: ArchiveId, name: String },
    /// Rename a folder.
    RenameFolder {
        archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    },
    /// Delete an archive.
    DeleteArchive { archive_id: ArchiveId },
    /// Delete a folder.
    DeleteFolder {
        archive_id: ArchiveId,
        folder_id: FolderId,
    },
    /// Move a folder under `dest`.
    MoveFolder {
        folder_id: FolderId,
        from_archive_id: ArchiveId,
        dest: NodeId,
        payload: FolderPayload,
    },
    /// Copy a folder under `dest`.
    CopyFolder {
        folder_id: FolderId,
        src_archive_id: ArchiveId,
        dest: NodeId,
        payload: FolderPayload,
    },
}

impl StructuralRequest {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateFolder { .. } => "create_folder",
            Self::RenameArchive { .. } => "rename_archive",
            Self::RenameFolder { .. } => "rename_folder",
            Self::DeleteArchive { .. } => "delete_archive",
            Self::DeleteFolder { .. } => "delete_folder",
            Self::MoveFolder { .. } => "move_folder",
            Self::CopyFolder { .. } => "copy_folder",
        }
    }
}

/// What the API answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    /// The server's view of a created/renamed/moved/copied folder.
    Folder(Folder),
    /// The flag returned by archive rename and deletes.
    Flag(bool),
}

/// A submission waiting for its API result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    /// Token the result must be completed with.
    pub token: RequestToken,
    /// The call to make.
    pub request: StructuralRequest,
}
