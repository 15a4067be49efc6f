//! CLI command definitions and dispatch.

pub mod folder;
pub mod tree;
pub mod upload;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_service::TreeCoordinator;
use docvault_storage::DocumentApi;

use crate::output::OutputFormat;
use crate::snapshot;

/// DocVault: archive and folder tree manager
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Configuration environment overlay to apply
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Forest snapshot file the tree is hydrated from and written back to
    #[arg(long, default_value = "forest.json")]
    pub forest: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the tree, or the destination picker for a move/copy
    Tree(tree::TreeArgs),
    /// List the context-menu actions offered for a node
    Actions(tree::ActionsArgs),
    /// Create a folder
    Mkdir(folder::MkdirArgs),
    /// Rename an archive or folder
    Rename(folder::RenameArgs),
    /// Delete an archive or folder
    Delete(folder::DeleteArgs),
    /// Move a folder
    Move(folder::TransferArgs),
    /// Copy a folder
    Copy(folder::TransferArgs),
    /// Upload files into an archive or folder
    Upload(upload::UploadArgs),
}

impl Cli {
    /// Execute the CLI command against `api`
    pub async fn execute(&self, config: &AppConfig, api: Arc<dyn DocumentApi>) -> AppResult<()> {
        let ctx = CommandContext {
            config,
            format: self.format,
            forest_path: &self.forest,
            api,
        };
        match &self.command {
            Commands::Tree(args) => tree::execute_tree(args, &ctx).await,
            Commands::Actions(args) => tree::execute_actions(args, &ctx).await,
            Commands::Mkdir(args) => folder::execute_mkdir(args, &ctx).await,
            Commands::Rename(args) => folder::execute_rename(args, &ctx).await,
            Commands::Delete(args) => folder::execute_delete(args, &ctx).await,
            Commands::Move(args) => folder::execute_move(args, &ctx).await,
            Commands::Copy(args) => folder::execute_copy(args, &ctx).await,
            Commands::Upload(args) => upload::execute(args, &ctx).await,
        }
    }
}

/// What every command needs: configuration, output format, the snapshot
/// path and the document API.
#[derive(Debug, Clone)]
pub struct CommandContext<'a> {
    /// Loaded configuration.
    pub config: &'a AppConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Snapshot file.
    pub forest_path: &'a Path,
    /// Document API.
    pub api: Arc<dyn DocumentApi>,
}

impl CommandContext<'_> {
    /// Hydrate a coordinator from the snapshot.
    pub async fn coordinator(&self) -> AppResult<TreeCoordinator> {
        let forest = snapshot::load(self.forest_path).await?;
        TreeCoordinator::new(self.api.clone(), &forest, self.config.tree.clone())
    }

    /// Write the coordinator's visible forest back to the snapshot.
    pub async fn persist(&self, coordinator: &TreeCoordinator) -> AppResult<()> {
        snapshot::save(self.forest_path, &coordinator.forest()).await
    }
}
