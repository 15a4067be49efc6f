//! Tree display and context-menu commands.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use docvault_core::result::AppResult;
use docvault_entity::node::NodeId;
use docvault_entity::tree::TreeItem;
use docvault_service::TransferMode;
use docvault_service::tree::{Visit, depth_first};

use super::CommandContext;
use crate::output::{self, OutputFormat};

/// Picker mode as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Destinations for a move
    Move,
    /// Destinations for a copy
    Copy,
}

impl From<ModeArg> for TransferMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Move => Self::Move,
            ModeArg::Copy => Self::Copy,
        }
    }
}

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Show the destination picker for this folder (folder:<uuid>)
    #[arg(long)]
    pub picker: Option<NodeId>,

    /// Picker mode
    #[arg(long, value_enum, default_value = "move")]
    pub mode: ModeArg,
}

/// Arguments for the actions command
#[derive(Debug, Args)]
pub struct ActionsArgs {
    /// Node to inspect (archive:<uuid> or folder:<uuid>)
    pub node: NodeId,
}

/// Tree display row
#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    /// Indented name
    pub name: String,
    /// Node ID
    pub id: String,
    /// Transient flags
    pub flags: String,
}

impl NodeRow {
    fn new(item: &TreeItem, path: &[bool]) -> Self {
        let mut flags = Vec::new();
        if item.selected {
            flags.push("selected");
        }
        if item.expanded {
            flags.push("expanded");
        }
        if item.disabled {
            flags.push("disabled");
        }
        Self {
            name: output::tree_label(&item.text, path),
            id: item.id.to_string(),
            flags: flags.join(","),
        }
    }
}

/// Flatten nested items into display rows, in document order.
pub fn rows(items: &[TreeItem]) -> Vec<NodeRow> {
    let mut rows = Vec::new();
    depth_first(
        items.iter().map(|item| (item, Vec::new())),
        |(item, path)| {
            let count = item.items.len();
            item.items.iter().enumerate().map(move |(i, child)| {
                let mut child_path = path.clone();
                child_path.push(i + 1 == count);
                (child, child_path)
            })
        },
        |(item, path)| {
            rows.push(NodeRow::new(item, path));
            Visit::Continue
        },
    );
    rows
}

/// Action row
#[derive(Debug, Serialize, Tabled)]
struct ActionRow {
    /// Action name
    action: String,
}

/// Execute the tree command
pub async fn execute_tree(args: &TreeArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    let mut coordinator = ctx.coordinator().await?;
    let items = match args.picker {
        Some(node) => {
            coordinator.open_picker(args.mode.into(), node)?;
            coordinator.picker_items().unwrap_or_default()
        }
        None => coordinator.items(),
    };

    match ctx.format {
        OutputFormat::Json => output::print_json(&items),
        OutputFormat::Table => {
            output::print_list(&rows(&items), OutputFormat::Table, "No archives.")
        }
    }
    Ok(())
}

/// Execute the actions command
pub async fn execute_actions(args: &ActionsArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    let coordinator = ctx.coordinator().await?;
    let rows: Vec<ActionRow> = coordinator
        .available_actions(args.node)?
        .into_iter()
        .map(|action| ActionRow {
            action: action.to_string(),
        })
        .collect();
    output::print_list(&rows, ctx.format, "No actions available for this node.");
    Ok(())
}
