//! Context menu policy.

pub mod policy;

pub use policy::{Action, available_actions};
