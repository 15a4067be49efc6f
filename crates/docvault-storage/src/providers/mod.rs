//! Document API implementations.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

#[cfg(feature = "http")]
pub use http::HttpDocumentApi;
pub use memory::{ApiOperation, InMemoryDocumentApi};
