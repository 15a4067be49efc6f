//! Structural operation coordinator.
//!
//! Owns the live tree and runs one structural operation at a time: a form
//! or picker is opened on a captured node, submitted under a request token,
//! and its API result is spliced into the arena only if the token is still
//! the one in flight.

pub mod service;
pub mod state;

pub use service::{SelectionCallback, TreeCoordinator};
pub use state::{
    ApiReply, CapturedNode, FormInput, FormKind, Modal, PendingOperation, Phase, RequestToken,
    StructuralRequest,
};
