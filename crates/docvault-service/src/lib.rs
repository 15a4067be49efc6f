//! # docvault-service
//!
//! The archive/folder tree manager. [`tree`] holds the arena-backed live
//! tree and the disable-propagation engine, [`coordinator`] drives
//! structural operations against the document API, [`upload`] reconciles
//! multi-file uploads, [`menu`] decides which actions a node offers, and
//! [`notification`] keeps the notices shown to the user.

pub mod coordinator;
pub mod menu;
pub mod notification;
pub mod tree;
pub mod upload;

pub use coordinator::{FormInput, FormKind, Phase, TreeCoordinator};
pub use menu::{Action, available_actions};
pub use notification::{Notice, NoticeLevel, NotificationCenter};
pub use tree::{PickerView, TransferMode, TreeArena, compute_disabled_view};
pub use upload::{UploadOutcome, UploadReconciler, UploadSelection};
