//! Multi-file upload: the pending selection and the per-file reconciler.

pub mod reconciler;
pub mod selection;

pub use reconciler::{UploadOutcome, UploadReconciler};
pub use selection::UploadSelection;
