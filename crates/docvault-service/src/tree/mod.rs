//! Live tree storage and traversal.

pub mod arena;
pub mod disable;

pub use arena::{ArenaNode, TreeArena};
pub use disable::{PickerView, TransferMode, compute_disabled_view};
pub use docvault_entity::traversal::{Visit, depth_first};
