//! Upload reconciler: dispatch a batch and split the per-file results.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use docvault_core::config::UploadConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::node::NodeData;
use docvault_entity::upload::UploadResponse;
use docvault_storage::DocumentApi;

use crate::notification::{NoticeLevel, NotificationCenter};

use super::selection::UploadSelection;

/// Per-file results of one upload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Files the API accepted with 201.
    pub ok: Vec<UploadResponse>,
    /// Every other file.
    pub failed: Vec<UploadResponse>,
}

impl UploadOutcome {
    /// Splits responses on the 201 status. Every response lands in exactly
    /// one side.
    pub fn partition(responses: Vec<UploadResponse>) -> Self {
        let (ok, failed) = responses.into_iter().partition(UploadResponse::is_created);
        Self { ok, failed }
    }

    /// Number of files reported.
    pub fn total(&self) -> usize {
        self.ok.len() + self.failed.len()
    }

    /// Names of the files that failed.
    pub fn failed_names(&self) -> Vec<String> {
        self.failed.iter().map(|r| r.file_name.clone()).collect()
    }
}

/// Sends upload batches and surfaces their results as notices.
#[derive(Debug, Clone)]
pub struct UploadReconciler {
    /// Document API.
    api: Arc<dyn DocumentApi>,
    /// Where success and failure notices go.
    notifications: Arc<NotificationCenter>,
    /// Upload configuration.
    config: UploadConfig,
}

impl UploadReconciler {
    /// Creates a new reconciler.
    pub fn new(
        api: Arc<dyn DocumentApi>,
        notifications: Arc<NotificationCenter>,
        config: UploadConfig,
    ) -> Self {
        Self {
            api,
            notifications,
            config,
        }
    }

    /// The notice sink.
    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    /// Uploads every file in `selection` to `target`.
    ///
    /// The selection is drained before anything else happens. A file the
    /// API never answered for is reported as failed with status 0.
    pub async fn upload(
        &self,
        target: NodeData,
        selection: &mut UploadSelection,
    ) -> AppResult<UploadOutcome> {
        let files = selection.take();
        if files.is_empty() {
            return Err(AppError::validation("No files selected for upload"));
        }
        if files.len() > self.config.max_files_per_batch {
            return Err(AppError::validation(format!(
                "At most {} files can be uploaded at once, got {}",
                self.config.max_files_per_batch,
                files.len()
            )));
        }

        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let result = match target {
            NodeData::Archive { id } => self.api.upload_files_to_archive(id, files).await,
            NodeData::Folder { id, archive_id, .. } => {
                self.api.upload_files_to_folder(archive_id, id, files).await
            }
        };

        let mut responses = match result {
            Ok(responses) => responses,
            Err(e) => {
                warn!(
                    node = %target.node_id(),
                    files = names.len(),
                    error = %e,
                    "Upload batch failed"
                );
                self.notifications.persistent(
                    NoticeLevel::Error,
                    format!("Upload of {} file(s) failed: {}", names.len(), e.message),
                    names,
                );
                return Err(e);
            }
        };

        let answered: HashSet<&str> = responses.iter().map(|r| r.file_name.as_str()).collect();
        let missing: Vec<UploadResponse> = names
            .iter()
            .filter(|name| !answered.contains(name.as_str()))
            .map(|name| UploadResponse::new(name.clone(), 0).with_message("No response for file"))
            .collect();
        responses.extend(missing);

        let outcome = UploadOutcome::partition(responses);
        self.report(&outcome);

        info!(
            node = %target.node_id(),
            ok = outcome.ok.len(),
            failed = outcome.failed.len(),
            "Upload reconciled"
        );
        Ok(outcome)
    }

    fn report(&self, outcome: &UploadOutcome) {
        if !outcome.ok.is_empty() {
            self.notifications.transient(
                NoticeLevel::Success,
                format!("{} file(s) uploaded", outcome.ok.len()),
            );
        }
        if !outcome.failed.is_empty() {
            self.notifications.persistent(
                NoticeLevel::Error,
                format!("{} file(s) failed to upload", outcome.failed.len()),
                outcome.failed_names(),
            );
        }
    }
}
