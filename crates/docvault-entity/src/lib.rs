//! # docvault-entity
//!
//! Domain models for DocVault. Archives and folders are the nested wire
//! format exchanged with the document-storage API; [`node`] holds the
//! tagged identifiers used by the in-memory tree; [`tree`] holds the
//! presentation wrapper handed to UI layers; [`traversal`] is the single
//! depth-first walk every nested structure goes through.

pub mod archive;
pub mod folder;
pub mod node;
pub mod traversal;
pub mod tree;
pub mod upload;

pub use archive::Archive;
pub use folder::{Folder, FolderPayload};
pub use node::{NodeData, NodeId};
pub use tree::TreeItem;
pub use upload::{UploadFile, UploadResponse};
