//! Structural folder commands.

use clap::Args;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::node::NodeId;
use docvault_service::{FormInput, FormKind, TransferMode};

use super::CommandContext;
use crate::output;

/// Arguments for the mkdir command
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Parent node (archive:<uuid> or folder:<uuid>)
    pub parent: NodeId,
    /// Folder name
    pub name: String,
}

/// Arguments for the rename command
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Node to rename
    pub node: NodeId,
    /// New name
    pub name: String,
}

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Node to delete
    pub node: NodeId,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the move and copy commands
#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Folder to move or copy (folder:<uuid>)
    pub folder: NodeId,
    /// Destination archive or folder
    pub destination: NodeId,
}

/// Execute the mkdir command
pub async fn execute_mkdir(args: &MkdirArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    let mut coordinator = ctx.coordinator().await?;
    coordinator
        .run_form(FormKind::NewDirectory, args.parent, &FormInput::named(&args.name))
        .await?;
    ctx.persist(&coordinator).await?;
    output::print_success(&format!("Folder '{}' created", args.name.trim()));
    Ok(())
}

/// Execute the rename command
pub async fn execute_rename(args: &RenameArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    let mut coordinator = ctx.coordinator().await?;
    coordinator
        .run_form(FormKind::Rename, args.node, &FormInput::named(&args.name))
        .await?;
    ctx.persist(&coordinator).await?;
    output::print_success(&format!("Renamed to '{}'", args.name.trim()));
    Ok(())
}

/// Execute the delete command
pub async fn execute_delete(args: &DeleteArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    let mut coordinator = ctx.coordinator().await?;
    coordinator.open_form(FormKind::Delete, args.node)?;
    let name = coordinator
        .captured()
        .map(|node| node.name.clone())
        .unwrap_or_default();

    if !args.yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete '{name}' and everything inside it?"))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            coordinator.cancel()?;
            output::print_cancelled("Delete");
            return Ok(());
        }
    }

    coordinator.submit_form(&FormInput::empty()).await?;
    ctx.persist(&coordinator).await?;
    output::print_success(&format!("'{name}' deleted"));
    Ok(())
}

/// Execute the move command
pub async fn execute_move(args: &TransferArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    transfer(args, ctx, TransferMode::Move).await
}

/// Execute the copy command
pub async fn execute_copy(args: &TransferArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    transfer(args, ctx, TransferMode::Copy).await
}

async fn transfer(args: &TransferArgs, ctx: &CommandContext<'_>, mode: TransferMode) -> AppResult<()> {
    let mut coordinator = ctx.coordinator().await?;
    coordinator
        .run_transfer(mode, args.folder, args.destination)
        .await?;
    ctx.persist(&coordinator).await?;
    output::print_success(&format!("Folder {} done ({} -> {})", mode, args.folder, args.destination));
    Ok(())
}
