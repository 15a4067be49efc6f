//! Upload command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::node::NodeId;
use docvault_entity::upload::UploadFile;
use docvault_service::{Notice, NotificationCenter, UploadOutcome, UploadReconciler, UploadSelection};

use super::CommandContext;
use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Target archive or folder
    pub node: NodeId,
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Per-file result row
#[derive(Debug, Serialize, Tabled)]
struct UploadRow {
    /// File name
    file: String,
    /// HTTP status, 0 when the request never got an answer
    status: u16,
    /// Outcome
    result: String,
}

#[derive(Debug, Serialize)]
struct UploadReport<'a> {
    outcome: &'a UploadOutcome,
    notices: Vec<Notice>,
}

/// Read the files from disk into a selection, guessing each MIME type.
pub async fn read_selection(paths: &[PathBuf]) -> AppResult<UploadSelection> {
    let mut selection = UploadSelection::new();
    for path in paths {
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read {}: {e}", path.display()),
                e,
            )
        })?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::validation(format!("Invalid file name: {}", path.display())))?
            .to_string();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        debug!(file = %name, size = data.len(), mime = %mime, "File selected");
        selection.add(UploadFile::new(name, data).with_mime_type(mime.to_string()));
    }
    Ok(selection)
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, ctx: &CommandContext<'_>) -> AppResult<()> {
    let mut coordinator = ctx.coordinator().await?;
    let mut selection = read_selection(&args.files).await?;

    let notifications = Arc::new(NotificationCenter::new(
        ctx.config.upload.success_notice_seconds,
    ));
    let reconciler = UploadReconciler::new(
        ctx.api.clone(),
        notifications.clone(),
        ctx.config.upload.clone(),
    );

    let result = coordinator
        .upload(args.node, &mut selection, &reconciler)
        .await;
    let notices = notifications.active();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if ctx.format == OutputFormat::Table {
                print_notices(&notices);
            }
            return Err(e);
        }
    };

    match ctx.format {
        OutputFormat::Json => output::print_json(&UploadReport {
            outcome: &outcome,
            notices,
        }),
        OutputFormat::Table => {
            let rows: Vec<UploadRow> = outcome
                .ok
                .iter()
                .map(|r| (r, "uploaded"))
                .chain(outcome.failed.iter().map(|r| (r, "failed")))
                .map(|(response, result)| UploadRow {
                    file: response.file_name.clone(),
                    status: response.status,
                    result: result.to_string(),
                })
                .collect();
            output::print_list(&rows, OutputFormat::Table, "No files sent.");
            println!(
                "{}",
                output::totals_line(&[
                    (outcome.ok.len(), "uploaded"),
                    (outcome.failed.len(), "failed"),
                ])
            );
            print_notices(&notices);
        }
    }
    Ok(())
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        if notice.persistent {
            output::print_sticky(&notice.message, &notice.files);
        } else {
            output::print_success(&notice.message);
        }
    }
}
