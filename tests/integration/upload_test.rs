//! Integration tests for multi-file uploads.

mod helpers;

use std::sync::Arc;

use docvault_core::config::UploadConfig;
use docvault_core::error::ErrorKind;
use docvault_core::events::TreeChange;
use docvault_entity::upload::UploadFile;
use docvault_service::{FormKind, NoticeLevel, NotificationCenter, UploadReconciler, UploadSelection};
use docvault_storage::providers::ApiOperation;

use helpers::TestTree;

fn reconciler(tree: &TestTree) -> UploadReconciler {
    UploadReconciler::new(
        tree.api.clone(),
        Arc::new(NotificationCenter::new(5)),
        UploadConfig::default(),
    )
}

fn pick(names: &[&str]) -> UploadSelection {
    names
        .iter()
        .map(|name| UploadFile::new(*name, name.as_bytes().to_vec()).with_mime_type("application/pdf"))
        .collect()
}

#[tokio::test]
async fn test_partial_failure_raises_persistent_notice() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let reconciler = reconciler(&tree);
    tree.api.script_upload_statuses([201, 500, 201]);
    let mut selection = pick(&["a.pdf", "b.pdf", "c.pdf"]);

    let outcome = tree
        .coordinator
        .upload(ids.f1(), &mut selection, &reconciler)
        .await
        .expect("upload");

    assert_eq!(outcome.ok.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed_names(), vec!["b.pdf"]);
    assert!(selection.is_empty());

    let notices = reconciler.notifications().active();
    let persistent: Vec<_> = notices.iter().filter(|n| n.persistent).collect();
    assert_eq!(persistent.len(), 1);
    assert_eq!(persistent[0].level, NoticeLevel::Error);
    assert_eq!(persistent[0].files.len(), 1);

    assert_eq!(
        tree.api.stored_files(ids.a1, Some(ids.f1)),
        vec!["a.pdf", "c.pdf"]
    );
}

#[tokio::test]
async fn test_archive_upload_notifies_without_touching_tree() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let reconciler = reconciler(&tree);
    let mut events = tree.coordinator.subscribe();
    let before = tree.coordinator.forest();
    let mut selection = pick(&["scan.pdf", "notes.pdf"]);

    let outcome = tree
        .coordinator
        .upload(ids.a2(), &mut selection, &reconciler)
        .await
        .expect("upload");

    assert_eq!(outcome.total(), 2);
    assert!(outcome.failed.is_empty());
    assert_eq!(tree.coordinator.forest(), before);
    assert_eq!(tree.coordinator.revision(), 0);
    assert_eq!(tree.api.calls(), vec![ApiOperation::UploadToArchive]);

    let event = events.recv().await.expect("event");
    match event.change {
        TreeChange::FilesUploaded {
            archive_id,
            folder_id,
            succeeded,
            failed,
        } => {
            assert_eq!(archive_id, ids.a2);
            assert_eq!(folder_id, None);
            assert_eq!((succeeded, failed), (2, 0));
        }
        other => panic!("unexpected change {other:?}"),
    }

    let notices = reconciler.notifications().active();
    assert_eq!(notices.len(), 1);
    assert!(!notices[0].persistent);
}

#[tokio::test]
async fn test_batch_rejection_fails_every_file() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let reconciler = reconciler(&tree);
    tree.api.fail_next(ApiOperation::UploadToFolder, 413);
    let mut selection = pick(&["big.pdf", "bigger.pdf"]);

    let err = tree
        .coordinator
        .upload(ids.misc(), &mut selection, &reconciler)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(err.status, Some(413));
    let notices = reconciler.notifications().active();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].files, vec!["big.pdf", "bigger.pdf"]);

    // The coordinator is free again.
    let mut retry = pick(&["big.pdf"]);
    tree.coordinator
        .upload(ids.misc(), &mut retry, &reconciler)
        .await
        .expect("second upload");
}

#[tokio::test]
async fn test_upload_waits_for_open_modal() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let reconciler = reconciler(&tree);
    tree.coordinator
        .open_form(FormKind::Rename, ids.f2())
        .expect("open");

    let mut selection = pick(&["a.pdf"]);
    let err = tree
        .coordinator
        .upload(ids.f2(), &mut selection, &reconciler)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(selection.len(), 1);
    assert_eq!(tree.api.call_count(), 0);
}

#[tokio::test]
async fn test_empty_selection_is_rejected() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    let reconciler = reconciler(&tree);

    let err = tree
        .coordinator
        .upload(ids.a1(), &mut UploadSelection::new(), &reconciler)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(tree.api.call_count(), 0);
}
