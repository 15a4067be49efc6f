//! The tree coordinator.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use docvault_core::config::TreeConfig;
use docvault_core::error::AppError;
use docvault_core::events::{TreeChange, TreeEvent};
use docvault_core::result::AppResult;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::archive::Archive;
use docvault_entity::folder::FolderPayload;
use docvault_entity::node::{NodeData, NodeId};
use docvault_entity::tree::TreeItem;
use docvault_storage::DocumentApi;

use crate::menu::{Action, available_actions};
use crate::tree::{TransferMode, TreeArena};
use crate::upload::{UploadOutcome, UploadReconciler, UploadSelection};

use super::state::{
    ApiReply, CapturedNode, FormInput, FormKind, Modal, OperationState, PendingOperation, Phase,
    RequestToken, StructuralRequest,
};

/// Called with `(archive_id, folder_id)` whenever the selection changes.
pub type SelectionCallback = Box<dyn Fn(ArchiveId, Option<FolderId>) + Send + Sync>;

/// Single owner of the live tree and of the one in-flight operation.
pub struct TreeCoordinator {
    /// Document API.
    api: Arc<dyn DocumentApi>,
    /// Live tree.
    arena: TreeArena,
    /// Modal / submission state.
    state: OperationState,
    /// Last issued request token.
    last_token: u64,
    /// Bumped on every applied change.
    revision: u64,
    /// Tree configuration.
    config: TreeConfig,
    /// Repaint events.
    events: broadcast::Sender<TreeEvent>,
    /// Selection listener.
    on_selection: Option<SelectionCallback>,
}

impl std::fmt::Debug for TreeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCoordinator")
            .field("provider", &self.api.provider_type())
            .field("phase", &self.state.phase())
            .field("revision", &self.revision)
            .field("nodes", &self.arena.len())
            .finish()
    }
}

impl TreeCoordinator {
    /// Creates a coordinator over an externally supplied forest.
    pub fn new(
        api: Arc<dyn DocumentApi>,
        forest: &[Archive],
        config: TreeConfig,
    ) -> AppResult<Self> {
        let arena = TreeArena::hydrate(forest, config.expand_on_load)?;
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Ok(Self {
            api,
            arena,
            state: OperationState::Idle,
            last_token: 0,
            revision: 0,
            config,
            events,
            on_selection: None,
        })
    }

    /// Subscribe to repaint events.
    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.events.subscribe()
    }

    /// Register the selection listener, replacing any previous one.
    pub fn on_selection_change(&mut self, callback: SelectionCallback) {
        self.on_selection = Some(callback);
    }

    /// The live tree.
    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    /// Items for the main tree widget.
    pub fn items(&self) -> Vec<TreeItem> {
        self.arena.visible_items()
    }

    /// Items for the open destination picker, if one is open.
    pub fn picker_items(&self) -> Option<Vec<TreeItem>> {
        match &self.state {
            OperationState::Open(Modal::Picker { view, .. }) => Some(self.arena.picker_items(view)),
            _ => None,
        }
    }

    /// Current tree revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Node the open modal acts on.
    pub fn captured(&self) -> Option<&CapturedNode> {
        match &self.state {
            OperationState::Open(modal) | OperationState::Submitting { modal, .. } => {
                Some(modal.target())
            }
            OperationState::Idle | OperationState::Uploading { .. } => None,
        }
    }

    /// Write the live tree back out as a nested forest of visible nodes.
    pub fn forest(&self) -> Vec<Archive> {
        self.arena.to_forest(false)
    }

    /// Re-hydrate from a freshly fetched forest.
    ///
    /// Closes any open modal, since its captured node may no longer exist.
    pub fn replace_forest(&mut self, forest: &[Archive]) -> AppResult<()> {
        if let Some(token) = self.state.in_flight() {
            return Err(AppError::conflict(format!(
                "Cannot reload the tree while operation {token} is in flight"
            )));
        }
        self.arena = TreeArena::hydrate(forest, self.config.expand_on_load)?;
        self.state = OperationState::Idle;
        self.publish(TreeChange::Hydrated {
            archive_count: forest.len(),
        });
        Ok(())
    }

    /// Select a node and notify the selection listener.
    pub fn select(&mut self, id: NodeId) -> AppResult<()> {
        let data = self.arena.select(id)?;
        let archive_id = data.archive_id();
        let folder_id = id.as_folder();
        if let Some(callback) = &self.on_selection {
            callback(archive_id, folder_id);
        }
        self.notify(TreeChange::SelectionChanged {
            archive_id,
            folder_id,
        });
        Ok(())
    }

    /// Actions the context menu offers for a node.
    pub fn available_actions(&self, id: NodeId) -> AppResult<BTreeSet<Action>> {
        let node = self.arena.require(id)?;
        Ok(available_actions(&node.data, node.data.is_archive()))
    }

    fn ensure_can_open(&self) -> AppResult<()> {
        match &self.state {
            OperationState::Idle => Ok(()),
            OperationState::Open(modal) => Err(AppError::invalid_state(format!(
                "{:?} is already open",
                modal.phase()
            ))),
            OperationState::Submitting { token, .. } | OperationState::Uploading { token } => {
                Err(AppError::conflict(format!("Operation {token} is in flight")))
            }
        }
    }

    fn capture(&self, id: NodeId) -> AppResult<CapturedNode> {
        let node = self.arena.require(id)?;
        if !self.arena.is_visible(id) {
            return Err(AppError::invalid_state(format!("Node {id} has been deleted")));
        }
        Ok(CapturedNode {
            id,
            data: node.data,
            name: node.name.clone(),
            parent: node.parent,
        })
    }

    /// Open a form on a node.
    pub fn open_form(&mut self, kind: FormKind, id: NodeId) -> AppResult<()> {
        self.ensure_can_open()?;
        let target = self.capture(id)?;
        debug!(node = %id, form = %kind, "Form opened");
        self.state = OperationState::Open(Modal::Form { kind, target });
        Ok(())
    }

    /// Open the destination picker for moving or copying a folder.
    pub fn open_picker(&mut self, mode: TransferMode, id: NodeId) -> AppResult<()> {
        self.ensure_can_open()?;
        let Some(folder_id) = id.as_folder() else {
            return Err(AppError::validation(format!(
                "Only folders can be the source of a {mode}"
            )));
        };
        let target = self.capture(id)?;
        let view = self.arena.picker_view(folder_id, mode)?;
        debug!(
            node = %id,
            mode = %mode,
            disabled = view.disabled_nodes().len(),
            "Picker opened"
        );
        self.state = OperationState::Open(Modal::Picker { target, view });
        Ok(())
    }

    /// Close the open modal.
    pub fn cancel(&mut self) -> AppResult<()> {
        match &self.state {
            OperationState::Idle => Ok(()),
            OperationState::Open(modal) => {
                debug!(phase = ?modal.phase(), "Modal cancelled");
                self.state = OperationState::Idle;
                Ok(())
            }
            OperationState::Submitting { token, .. } | OperationState::Uploading { token } => {
                Err(AppError::conflict(format!(
                    "Operation {token} is in flight and cannot be cancelled"
                )))
            }
        }
    }

    fn open_modal(&self) -> AppResult<&Modal> {
        match &self.state {
            OperationState::Open(modal) => Ok(modal),
            OperationState::Idle => Err(AppError::invalid_state("No form or picker is open")),
            OperationState::Submitting { token, .. } | OperationState::Uploading { token } => {
                Err(AppError::conflict(format!("Operation {token} is in flight")))
            }
        }
    }

    fn issue(&mut self, request: StructuralRequest) -> AppResult<PendingOperation> {
        let OperationState::Open(modal) = std::mem::take(&mut self.state) else {
            return Err(AppError::internal("Submission without an open modal"));
        };
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        debug!(token = %token, operation = request.name(), "Submitting");
        self.state = OperationState::Submitting {
            token,
            request: request.clone(),
            modal,
        };
        Ok(PendingOperation { token, request })
    }

    /// Validate the open form's input and move to `Submitting`.
    ///
    /// Local rejections leave the form open and make no network call.
    pub fn begin_form(&mut self, input: &FormInput) -> AppResult<PendingOperation> {
        let Modal::Form { kind, target } = self.open_modal()? else {
            return Err(AppError::invalid_state("The open modal is not a form"));
        };

        let request = match (*kind, target.data) {
            (FormKind::NewDirectory, data) => {
                let name = input.validated_name()?;
                StructuralRequest::CreateFolder {
                    archive_id: data.archive_id(),
                    parent: target.id,
                    payload: FolderPayload::create(name, target.id.as_folder()),
                }
            }
            (FormKind::Rename, NodeData::Archive { id }) => StructuralRequest::RenameArchive {
                archive_id: id,
                name: input.validated_name()?,
            },
            (
                FormKind::Rename,
                NodeData::Folder {
                    id,
                    archive_id,
                    parent_id,
                },
            ) => StructuralRequest::RenameFolder {
                archive_id,
                folder_id: id,
                payload: FolderPayload::placed(archive_id, input.validated_name()?, parent_id),
            },
            (FormKind::Delete, NodeData::Archive { id }) => {
                StructuralRequest::DeleteArchive { archive_id: id }
            }
            (FormKind::Delete, NodeData::Folder { id, archive_id, .. }) => {
                StructuralRequest::DeleteFolder {
                    archive_id,
                    folder_id: id,
                }
            }
        };

        self.issue(request)
    }

    /// Validate the chosen destination and move to `Submitting`.
    ///
    /// Disabled destinations and destinations inside the folder's own
    /// subtree are rejected locally with the picker left open.
    pub fn begin_transfer(&mut self, dest: NodeId) -> AppResult<PendingOperation> {
        let Modal::Picker { target, view } = self.open_modal()? else {
            return Err(AppError::invalid_state("The open modal is not a picker"));
        };
        let NodeData::Folder {
            id: folder_id,
            archive_id: source_archive,
            ..
        } = target.data
        else {
            return Err(AppError::internal("Picker opened on an archive"));
        };

        let dest_node = self.arena.require(dest)?;
        if !self.arena.is_visible(dest) {
            return Err(AppError::validation(format!("Destination {dest} has been deleted")));
        }
        if dest == target.id || self.arena.is_descendant_of(dest, target.id) {
            return Err(AppError::validation(
                "A folder cannot be placed inside its own subtree",
            ));
        }
        if view.is_disabled(dest) {
            return Err(AppError::validation(format!(
                "{dest} is not a valid {} destination",
                view.mode
            )));
        }

        let dest_archive = dest_node.data.archive_id();
        let dest_parent = dest.as_folder();
        let request = match view.mode {
            TransferMode::Move => StructuralRequest::MoveFolder {
                folder_id,
                from_archive_id: source_archive,
                dest,
                payload: FolderPayload::placed(dest_archive, target.name.clone(), dest_parent),
            },
            TransferMode::Copy => {
                let name = if target.parent == Some(dest) {
                    format!("{}{}", target.name, self.config.copy_suffix)
                } else {
                    target.name.clone()
                };
                StructuralRequest::CopyFolder {
                    folder_id,
                    src_archive_id: source_archive,
                    dest,
                    payload: FolderPayload::placed(dest_archive, name, dest_parent),
                }
            }
        };

        self.issue(request)
    }

    /// Perform the API call for a pending operation.
    pub async fn execute(&self, pending: &PendingOperation) -> AppResult<ApiReply> {
        let api = &self.api;
        match pending.request.clone() {
            StructuralRequest::CreateFolder {
                archive_id,
                payload,
                ..
            } => api.create_folder(archive_id, payload).await.map(ApiReply::Folder),
            StructuralRequest::RenameArchive { archive_id, name } => {
                api.rename_archive(archive_id, &name).await.map(ApiReply::Flag)
            }
            StructuralRequest::RenameFolder {
                archive_id,
                folder_id,
                payload,
            } => api
                .rename_folder(archive_id, folder_id, payload)
                .await
                .map(ApiReply::Folder),
            StructuralRequest::DeleteArchive { archive_id } => {
                api.delete_archive(archive_id).await.map(ApiReply::Flag)
            }
            StructuralRequest::DeleteFolder {
                archive_id,
                folder_id,
            } => api.delete_folder(archive_id, folder_id).await.map(ApiReply::Flag),
            StructuralRequest::MoveFolder {
                folder_id, payload, ..
            } => {
                let dest_archive = payload
                    .archive_id
                    .ok_or_else(|| AppError::internal("Move payload without an archive"))?;
                api.move_folder(dest_archive, folder_id, payload)
                    .await
                    .map(ApiReply::Folder)
            }
            StructuralRequest::CopyFolder {
                folder_id,
                src_archive_id,
                payload,
                ..
            } => api
                .copy_folder(src_archive_id, folder_id, payload)
                .await
                .map(ApiReply::Folder),
        }
    }

    /// Apply the result of the operation submitted under `token`.
    ///
    /// A token that is not the one in flight is stale: the result is
    /// dropped with a `Conflict` and nothing changes. A failed call (or a
    /// `false` flag) reopens the modal with the tree untouched; a
    /// successful one patches the arena, returns to `Idle` and publishes a
    /// repaint event.
    pub fn complete(&mut self, token: RequestToken, result: AppResult<ApiReply>) -> AppResult<()> {
        match &self.state {
            OperationState::Submitting { token: current, .. } if *current == token => {}
            other => {
                warn!(
                    token = %token,
                    in_flight = ?other.in_flight(),
                    "Discarding stale operation result"
                );
                return Err(AppError::conflict(format!(
                    "Result for {token} arrived after it was superseded"
                )));
            }
        }
        let OperationState::Submitting { request, modal, .. } = std::mem::take(&mut self.state)
        else {
            return Err(AppError::internal("Submission state vanished"));
        };

        let applied = result.and_then(|reply| self.apply(&request, reply));
        match applied {
            Ok(change) => {
                info!(token = %token, operation = request.name(), "Operation applied");
                self.publish(change);
                Ok(())
            }
            Err(e) => {
                warn!(
                    token = %token,
                    operation = request.name(),
                    error = %e,
                    "Operation rejected"
                );
                self.state = OperationState::Open(modal);
                Err(e)
            }
        }
    }

    fn apply(&mut self, request: &StructuralRequest, reply: ApiReply) -> AppResult<TreeChange> {
        match (request, reply) {
            (
                StructuralRequest::CreateFolder {
                    archive_id, parent, ..
                },
                ApiReply::Folder(folder),
            ) => {
                self.arena.insert_folder(&folder, *parent)?;
                self.arena.set_expanded(*parent, true)?;
                Ok(TreeChange::FolderCreated {
                    archive_id: *archive_id,
                    folder_id: folder.id,
                    parent_id: parent.as_folder(),
                })
            }
            (StructuralRequest::RenameArchive { archive_id, name }, ApiReply::Flag(true)) => {
                self.arena.rename(NodeId::Archive(*archive_id), name.clone())?;
                Ok(TreeChange::Renamed {
                    archive_id: *archive_id,
                    folder_id: None,
                    name: name.clone(),
                })
            }
            (
                StructuralRequest::RenameFolder {
                    archive_id,
                    folder_id,
                    ..
                },
                ApiReply::Folder(folder),
            ) => {
                self.arena.rename(NodeId::Folder(*folder_id), folder.name.clone())?;
                Ok(TreeChange::Renamed {
                    archive_id: *archive_id,
                    folder_id: Some(*folder_id),
                    name: folder.name,
                })
            }
            (StructuralRequest::DeleteArchive { archive_id }, ApiReply::Flag(true)) => {
                self.arena.hide(NodeId::Archive(*archive_id))?;
                Ok(TreeChange::Deleted {
                    archive_id: *archive_id,
                    folder_id: None,
                })
            }
            (
                StructuralRequest::DeleteFolder {
                    archive_id,
                    folder_id,
                },
                ApiReply::Flag(true),
            ) => {
                self.arena.hide(NodeId::Folder(*folder_id))?;
                Ok(TreeChange::Deleted {
                    archive_id: *archive_id,
                    folder_id: Some(*folder_id),
                })
            }
            (
                StructuralRequest::MoveFolder {
                    folder_id,
                    from_archive_id,
                    dest,
                    ..
                },
                ApiReply::Folder(folder),
            ) => {
                self.arena.relocate(*folder_id, &folder, *dest)?;
                self.arena.set_expanded(*dest, true)?;
                Ok(TreeChange::FolderMoved {
                    folder_id: folder.id,
                    from_archive_id: *from_archive_id,
                    to_archive_id: self.arena.require(*dest)?.data.archive_id(),
                    to_parent_id: dest.as_folder(),
                })
            }
            (
                StructuralRequest::CopyFolder {
                    folder_id, dest, ..
                },
                ApiReply::Folder(folder),
            ) => {
                self.arena.insert_folder(&folder, *dest)?;
                self.arena.set_expanded(*dest, true)?;
                Ok(TreeChange::FolderCopied {
                    source_folder_id: *folder_id,
                    new_folder_id: folder.id,
                    to_archive_id: self.arena.require(*dest)?.data.archive_id(),
                    to_parent_id: dest.as_folder(),
                })
            }
            (request, ApiReply::Flag(false)) => Err(AppError::external_service(format!(
                "The document API declined {}",
                request.name()
            ))),
            (request, reply) => Err(AppError::internal(format!(
                "Unexpected reply {reply:?} to {}",
                request.name()
            ))),
        }
    }

    /// Submit the open form: validate, call the API and apply the result.
    pub async fn submit_form(&mut self, input: &FormInput) -> AppResult<()> {
        let pending = self.begin_form(input)?;
        let result = self.execute(&pending).await;
        self.complete(pending.token, result)
    }

    /// Submit the open picker with the chosen destination.
    pub async fn submit_transfer(&mut self, dest: NodeId) -> AppResult<()> {
        let pending = self.begin_transfer(dest)?;
        let result = self.execute(&pending).await;
        self.complete(pending.token, result)
    }

    /// Open a form on `id` and submit it in one go.
    pub async fn run_form(&mut self, kind: FormKind, id: NodeId, input: &FormInput) -> AppResult<()> {
        self.open_form(kind, id)?;
        let result = self.submit_form(input).await;
        self.close_after_failure();
        result
    }

    /// Open the picker on `id` and submit `dest` in one go.
    pub async fn run_transfer(&mut self, mode: TransferMode, id: NodeId, dest: NodeId) -> AppResult<()> {
        self.open_picker(mode, id)?;
        let result = self.submit_transfer(dest).await;
        self.close_after_failure();
        result
    }

    fn close_after_failure(&mut self) {
        if matches!(self.state, OperationState::Open(_)) {
            self.state = OperationState::Idle;
        }
    }

    /// Upload the selected files into `id`.
    ///
    /// Runs as the single in-flight operation; the tree itself is not
    /// changed.
    pub async fn upload(
        &mut self,
        id: NodeId,
        selection: &mut UploadSelection,
        reconciler: &UploadReconciler,
    ) -> AppResult<UploadOutcome> {
        self.ensure_can_open()?;
        let target = self.capture(id)?;

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.state = OperationState::Uploading { token };
        debug!(token = %token, node = %id, files = selection.len(), "Upload started");

        let result = reconciler.upload(target.data, selection).await;
        self.state = OperationState::Idle;

        let outcome = result?;
        self.notify(TreeChange::FilesUploaded {
            archive_id: target.data.archive_id(),
            folder_id: id.as_folder(),
            succeeded: outcome.ok.len(),
            failed: outcome.failed.len(),
        });
        Ok(outcome)
    }

    fn publish(&mut self, change: TreeChange) {
        self.revision += 1;
        self.notify(change);
    }

    fn notify(&self, change: TreeChange) {
        let _ = self.events.send(TreeEvent::new(self.revision, change));
    }
}
