//! Archive domain entities.

pub mod model;

pub use model::Archive;
