//! # docvault-cli
//!
//! Command definitions for the `docvault` binary. Every command works on a
//! forest snapshot file: the snapshot is hydrated into a
//! [`TreeCoordinator`](docvault_service::TreeCoordinator), the operation is
//! run against the document API, and the updated forest is written back.

pub mod commands;
pub mod output;
pub mod snapshot;

pub use commands::{Cli, CommandContext, Commands};
