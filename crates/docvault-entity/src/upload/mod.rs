//! Upload request and response models.

pub mod model;

pub use model::{UploadFile, UploadResponse, CREATED_STATUS};
