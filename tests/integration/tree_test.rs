//! Integration tests for the live tree and the destination picker.

mod helpers;

use docvault_entity::node::NodeId;
use docvault_service::tree::{Visit, depth_first};
use docvault_service::{FormInput, FormKind, Phase, TransferMode, compute_disabled_view};

use helpers::{TestTree, flatten, item, sample_forest};

fn disabled_ids(items: &[docvault_entity::tree::TreeItem]) -> Vec<NodeId> {
    flatten(items)
        .into_iter()
        .filter(|item| item.disabled)
        .map(|item| item.id)
        .collect()
}

#[test]
fn test_move_picker_disables_folder_and_parent() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    tree.coordinator
        .open_picker(TransferMode::Move, ids.f2())
        .expect("open picker");

    let items = tree.coordinator.picker_items().expect("picker open");
    let disabled = disabled_ids(&items);
    assert_eq!(disabled.len(), 2);
    assert!(disabled.contains(&ids.f1()));
    assert!(disabled.contains(&ids.f2()));

    assert!(!item(&items, ids.a1()).expect("A1").disabled);
    assert!(!item(&items, ids.invoices()).expect("Invoices").disabled);
}

#[test]
fn test_copy_picker_disables_only_folder() {
    let mut tree = TestTree::new();
    let ids = tree.ids;
    tree.coordinator
        .open_picker(TransferMode::Copy, ids.f2())
        .expect("open picker");

    let items = tree.coordinator.picker_items().expect("picker open");
    assert_eq!(disabled_ids(&items), vec![ids.f2()]);
    assert_eq!(tree.coordinator.phase(), Phase::PickerOpen(TransferMode::Copy));
}

#[test]
fn test_picker_matches_forest_view() {
    let (forest, ids) = sample_forest();
    let tree = TestTree::new();
    let f2 = forest[0].child_folders[0].child_folders[0].clone();

    for mode in [TransferMode::Move, TransferMode::Copy] {
        let view = compute_disabled_view(&forest, &f2, mode);
        let picker = tree
            .coordinator
            .arena()
            .picker_view(ids.f2, mode)
            .expect("picker view");

        let mut from_forest = Vec::new();
        for archive in &view {
            if archive.disabled {
                from_forest.push(NodeId::Archive(archive.id));
            }
            depth_first(
                archive.child_folders.iter(),
                |folder| folder.child_folders.iter(),
                |folder| {
                    if folder.disabled {
                        from_forest.push(NodeId::Folder(folder.id));
                    }
                    Visit::Continue
                },
            );
        }

        assert_eq!(from_forest.len(), picker.disabled_nodes().len(), "{mode}");
        assert!(from_forest.iter().all(|id| picker.is_disabled(*id)), "{mode}");
    }
}

#[test]
fn test_disable_view_leaves_other_archives_and_input_alone() {
    let (forest, ids) = sample_forest();
    let before = forest.clone();
    let f1 = forest[0].child_folders[0].clone();

    let view = compute_disabled_view(&forest, &f1, TransferMode::Move);

    assert_eq!(forest, before);
    let a2 = view.iter().find(|a| a.id == ids.a2).expect("A2");
    assert!(!a2.disabled);
    assert!(a2.child_folders.iter().all(|f| !f.disabled));
    // Top-level move: the owning archive is the parent.
    assert!(view.iter().find(|a| a.id == ids.a1).expect("A1").disabled);
}

#[tokio::test]
async fn test_archive_delete_is_soft() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator
        .run_form(FormKind::Delete, ids.a1(), &FormInput::empty())
        .await
        .expect("delete archive");

    let arena = tree.coordinator.arena();
    let node = arena.get(ids.a1()).expect("A1 still stored");
    assert!(!node.visible);
    assert!(!arena.is_visible(ids.f2()));
    assert!(arena.get(ids.f2()).is_some());

    assert_eq!(tree.rendered_names(), vec!["A2", "Misc"]);
    assert_eq!(tree.coordinator.arena().to_forest(true).len(), 2);
    assert_eq!(tree.coordinator.forest().len(), 1);
}

#[tokio::test]
async fn test_deleted_folder_is_skipped_by_visible_walk() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator
        .run_form(FormKind::Delete, ids.f1(), &FormInput::empty())
        .await
        .expect("delete folder");

    let mut seen = Vec::new();
    tree.coordinator.arena().walk_visible(|node| {
        seen.push(node.name.clone());
        Visit::Continue
    });
    assert_eq!(seen, vec!["A1", "Invoices", "A2", "Misc"]);
    assert!(tree.coordinator.arena().get(ids.f1()).is_some());
}

#[test]
fn test_select_marks_exactly_one_node() {
    let mut tree = TestTree::new();
    let ids = tree.ids;

    tree.coordinator.select(ids.f1()).expect("select F1");
    tree.coordinator.select(ids.misc()).expect("select Misc");

    let items = tree.coordinator.items();
    let selected: Vec<_> = flatten(&items)
        .into_iter()
        .filter(|item| item.selected)
        .map(|item| item.id)
        .collect();
    assert_eq!(selected, vec![ids.misc()]);
}
