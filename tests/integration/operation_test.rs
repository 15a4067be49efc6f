//! Integration tests for structural operations through the coordinator.

mod helpers;

use docvault_core::error::ErrorKind;
use docvault_core::events::TreeChange;
use docvault_entity::archive::Archive;
use docvault_entity::node::NodeId;
use docvault_service::tree::{Visit, depth_first};
use docvault_service::{FormInput, FormKind, Phase, TransferMode};
use docvault_storage::providers::ApiOperation;

use helpers::{TestTree, flatten, item};

/// `Archive/Folder/...` path of every folder, depth-first.
fn paths(forest: &[Archive]) -> Vec<String> {
    let mut out = Vec::new();
    for archive in forest {
        out.push(archive.name.clone());
        depth_first(
            archive
                .child_folders
                .iter()
                .map(|folder| (folder, archive.name.clone())),
            |(folder, prefix)| {
                let path = format!("{prefix}/{}", folder.name);
                folder
                    .child_folders
                    .iter()
                    .map(move |child| (child, path.clone()))
            },
            |(folder, prefix)| {
                out.push(format!("{prefix}/{}", folder.name));
                Visit::Continue
            },
        );
    }
    out
}

async fn assert_in_sync(tree: &TestTree) {
    assert_eq!(
        paths(&tree.coordinator.forest()),
        paths(&tree.api.snapshot().await)
    );
}

#[tokio::test]
async fn test_blank_rename_is_rejected_locally() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let before = tree.coordinator.forest();

    tree.coordinator
        .open_form(FormKind::Rename, ids.f1())
        .expect("open rename");
    let err = tree
        .coordinator
        .submit_form(&FormInput::named(""))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(tree.api.call_count(), 0);
    assert_eq!(tree.coordinator.forest(), before);
    assert_eq!(tree.coordinator.revision(), 0);
    assert_eq!(tree.coordinator.phase(), Phase::FormOpen(FormKind::Rename));
}

#[tokio::test]
async fn test_create_and_rename() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let mut events = tree.coordinator.subscribe();

    tree.coordinator
        .run_form(FormKind::NewDirectory, ids.f2(), &FormInput::named("  2024 "))
        .await
        .expect("create");
    tree.coordinator
        .run_form(FormKind::Rename, ids.f1(), &FormInput::named("Documents"))
        .await
        .expect("rename folder");
    tree.coordinator
        .run_form(FormKind::Rename, ids.a2(), &FormInput::named("Archive 2"))
        .await
        .expect("rename archive");

    assert_eq!(
        paths(&tree.coordinator.forest()),
        vec![
            "A1",
            "A1/Documents",
            "A1/Documents/Drafts",
            "A1/Documents/Drafts/2024",
            "A1/Invoices",
            "Archive 2",
            "Archive 2/Misc",
        ]
    );
    assert_in_sync(&tree).await;
    assert!(tree.coordinator.arena().get(ids.f2()).expect("F2").expanded);

    assert_eq!(tree.coordinator.revision(), 3);
    let first = events.recv().await.expect("event");
    assert_eq!(first.revision, 1);
    assert!(matches!(first.change, TreeChange::FolderCreated { .. }));
}

#[tokio::test]
async fn test_move_subtree_across_archives() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator
        .run_transfer(TransferMode::Move, ids.f1(), ids.misc())
        .await
        .expect("move");

    assert_eq!(
        paths(&tree.coordinator.forest()),
        vec!["A1", "A1/Invoices", "A2", "A2/Misc", "A2/Misc/Docs", "A2/Misc/Docs/Drafts"]
    );
    assert_in_sync(&tree).await;

    let items = tree.coordinator.items();
    let drafts = item(&items, ids.f2()).expect("Drafts kept its id");
    assert_eq!(drafts.data.archive_id(), ids.a2);
    assert_eq!(drafts.data.parent_folder(), Some(ids.f1));
}

#[tokio::test]
async fn test_copy_into_parent_and_elsewhere() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator
        .run_transfer(TransferMode::Copy, ids.f1(), ids.a1())
        .await
        .expect("copy into parent");
    tree.coordinator
        .run_transfer(TransferMode::Copy, ids.f1(), ids.invoices())
        .await
        .expect("copy elsewhere");

    let forest = tree.coordinator.forest();
    assert_eq!(
        paths(&forest),
        vec![
            "A1",
            "A1/Docs",
            "A1/Docs/Drafts",
            "A1/Invoices",
            "A1/Invoices/Docs",
            "A1/Invoices/Docs/Drafts",
            "A1/Docs - copy",
            "A1/Docs - copy/Drafts",
            "A2",
            "A2/Misc",
        ]
    );
    assert_in_sync(&tree).await;

    let items = tree.coordinator.items();
    let drafts = flatten(&items)
        .into_iter()
        .filter(|item| item.text == "Drafts")
        .map(|item| item.id)
        .collect::<std::collections::HashSet<NodeId>>();
    assert_eq!(drafts.len(), 3);
}

#[tokio::test]
async fn test_descendant_destination_never_reaches_api() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    for (mode, dest) in [
        (TransferMode::Move, ids.f2()),
        (TransferMode::Copy, ids.f2()),
        (TransferMode::Move, ids.f1()),
        (TransferMode::Copy, ids.f1()),
    ] {
        let err = tree
            .coordinator
            .run_transfer(mode, ids.f1(), dest)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{mode} into {dest}");
    }
    assert_eq!(tree.api.call_count(), 0);
    assert_eq!(tree.coordinator.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_move_onto_current_parent_is_disabled() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    let err = tree
        .coordinator
        .run_transfer(TransferMode::Move, ids.f2(), ids.f1())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(tree.api.call_count(), 0);
}

#[tokio::test]
async fn test_api_failure_leaves_tree_untouched() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let before = tree.coordinator.forest();
    tree.api.fail_next(ApiOperation::MoveFolder, 500);

    tree.coordinator
        .open_picker(TransferMode::Move, ids.f2())
        .expect("open picker");
    let err = tree
        .coordinator
        .submit_transfer(ids.misc())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(err.status, Some(500));
    assert_eq!(tree.coordinator.forest(), before);
    assert_eq!(tree.coordinator.phase(), Phase::PickerOpen(TransferMode::Move));

    tree.coordinator
        .submit_transfer(ids.misc())
        .await
        .expect("retry by hand");
    assert_in_sync(&tree).await;
    assert_eq!(tree.api.calls(), vec![ApiOperation::MoveFolder, ApiOperation::MoveFolder]);
}

#[tokio::test]
async fn test_stale_completion_is_discarded() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator
        .open_form(FormKind::Rename, ids.invoices())
        .expect("open");
    let stale = tree
        .coordinator
        .begin_form(&FormInput::named("Bills"))
        .expect("begin");
    let stale_result = tree.coordinator.execute(&stale).await;
    tree.coordinator
        .complete(stale.token, stale_result.clone())
        .expect("apply");

    let err = tree
        .coordinator
        .complete(stale.token, stale_result)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(tree.coordinator.revision(), 1);
    assert_eq!(tree.coordinator.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_in_flight_operation_blocks_everything_else() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator
        .open_form(FormKind::NewDirectory, ids.a1())
        .expect("open");
    let pending = tree
        .coordinator
        .begin_form(&FormInput::named("Reports"))
        .expect("begin");
    assert_eq!(tree.coordinator.phase(), Phase::Submitting);

    let err = tree
        .coordinator
        .open_picker(TransferMode::Copy, ids.f2())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    let err = tree.coordinator.cancel().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let result = tree.coordinator.execute(&pending).await;
    tree.coordinator
        .complete(pending.token, result)
        .expect("apply");
    assert_in_sync(&tree).await;
}
