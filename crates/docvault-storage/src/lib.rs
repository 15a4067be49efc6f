//! # docvault-storage
//!
//! Clients for the external document-storage API. The [`DocumentApi`]
//! trait is the only seam the tree coordinator talks through; the
//! providers module holds a JSON/HTTP client and an in-process
//! implementation.

pub mod api;
pub mod providers;

pub use api::DocumentApi;
