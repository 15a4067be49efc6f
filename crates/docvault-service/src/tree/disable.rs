//! Disable propagation for the move/copy destination picker.
//!
//! A folder may not be dropped onto itself or anywhere inside its own
//! subtree, and moving it onto its current parent would be a no-op. The
//! picker shows those destinations as disabled.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use docvault_core::types::FolderId;
use docvault_entity::archive::Archive;
use docvault_entity::folder::Folder;
use docvault_entity::node::NodeId;
use docvault_entity::traversal::{Visit, depth_first, find_folder_mut, for_each_folder_mut};

/// Whether the picker is choosing a move or a copy destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Relocate the folder.
    Move,
    /// Duplicate the folder.
    Copy,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
            Self::Copy => write!(f, "copy"),
        }
    }
}

/// Returns a deep copy of `forest` prepared for the destination picker.
///
/// Every `disabled`/`expanded` flag is reset. Inside the archive owning
/// `selected`, the selected folder and its whole subtree are disabled; in
/// [`TransferMode::Move`] its structural parent (the archive itself for a
/// top-level folder) is disabled as well. The path from the archive down
/// to the selected folder is expanded. Other archives are left enabled.
///
/// The input forest is never touched.
pub fn compute_disabled_view(
    forest: &[Archive],
    selected: &Folder,
    mode: TransferMode,
) -> Vec<Archive> {
    let mut view = forest.to_vec();
    for archive in &mut view {
        archive.disabled = false;
        archive.expanded = false;
        for_each_folder_mut(&mut archive.child_folders, |folder| {
            folder.disabled = false;
            folder.expanded = false;
        });
    }

    let Some(archive) = view.iter_mut().find(|a| a.id == selected.archive_id) else {
        debug!(archive_id = %selected.archive_id, "Owning archive not in forest");
        return view;
    };

    // Parent link of every folder visited up to and including the target.
    let mut parents: HashMap<FolderId, Option<FolderId>> = HashMap::new();
    let found = depth_first(
        archive.child_folders.iter().map(|folder| (folder, None)),
        |(folder, _)| {
            folder
                .child_folders
                .iter()
                .map(move |child| (child, Some(folder.id)))
        },
        |(folder, parent)| {
            parents.insert(folder.id, *parent);
            if folder.id == selected.id {
                Visit::Stop
            } else {
                Visit::Continue
            }
        },
    )
    .is_some();

    if !found {
        debug!(folder_id = %selected.id, "Selected folder not in its archive");
        return view;
    }

    if let Some(target) = find_folder_mut(&mut archive.child_folders, selected.id) {
        for_each_folder_mut(std::slice::from_mut(target), |folder| folder.disabled = true);
    }

    let parent = parents.get(&selected.id).copied().flatten();
    if mode == TransferMode::Move {
        match parent {
            None => archive.disabled = true,
            Some(parent_id) => {
                if let Some(folder) = find_folder_mut(&mut archive.child_folders, parent_id) {
                    folder.disabled = true;
                }
            }
        }
    }

    archive.expanded = true;
    let mut cursor = parent;
    while let Some(id) = cursor {
        if let Some(folder) = find_folder_mut(&mut archive.child_folders, id) {
            folder.expanded = true;
        }
        cursor = parents.get(&id).copied().flatten();
    }

    view
}

/// Destination constraints for one open picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    /// Move or copy.
    pub mode: TransferMode,
    /// The folder being moved or copied.
    pub source: FolderId,
    disabled: HashSet<NodeId>,
    expanded: HashSet<NodeId>,
}

impl PickerView {
    /// Create a view from precomputed flag sets.
    pub fn new(
        mode: TransferMode,
        source: FolderId,
        disabled: HashSet<NodeId>,
        expanded: HashSet<NodeId>,
    ) -> Self {
        Self {
            mode,
            source,
            disabled,
            expanded,
        }
    }

    /// Whether `id` is shown disabled.
    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.disabled.contains(&id)
    }

    /// Whether `id` can be chosen as the destination.
    pub fn is_selectable(&self, id: NodeId) -> bool {
        !self.is_disabled(id)
    }

    /// Whether `id` is shown expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// All disabled nodes.
    pub fn disabled_nodes(&self) -> &HashSet<NodeId> {
        &self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_entity::traversal::find_folder;

    struct Fixture {
        forest: Vec<Archive>,
        f1: Folder,
        f2: Folder,
    }

    /// A1 { F1 { F2 }, Sibling }, A2 { Other }
    fn fixture() -> Fixture {
        let a1 = Archive::new("A1");
        let f2 = Folder::new(a1.id, None, "F2");
        let f1 = Folder::new(a1.id, None, "F1").with_child(f2);
        let sibling = Folder::new(a1.id, None, "Sibling");
        let a1 = a1.with_folder(f1).with_folder(sibling);
        let a2 = Archive::new("A2").with_folder(Folder::new(Default::default(), None, "Other"));

        let f1 = a1.child_folders[0].clone();
        let f2 = f1.child_folders[0].clone();
        Fixture {
            forest: vec![a1, a2],
            f1,
            f2,
        }
    }

    fn disabled_names(view: &[Archive]) -> Vec<String> {
        let mut names = Vec::new();
        for archive in view {
            if archive.disabled {
                names.push(archive.name.clone());
            }
            depth_first(
                archive.child_folders.iter(),
                |f| f.child_folders.iter(),
                |f| {
                    if f.disabled {
                        names.push(f.name.clone());
                    }
                    Visit::Continue
                },
            );
        }
        names.sort();
        names
    }

    #[test]
    fn test_move_disables_self_and_parent() {
        let fx = fixture();
        let view = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Move);
        assert_eq!(disabled_names(&view), vec!["F1", "F2"]);
    }

    #[test]
    fn test_copy_disables_only_self() {
        let fx = fixture();
        let view = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Copy);
        assert_eq!(disabled_names(&view), vec!["F2"]);
    }

    #[test]
    fn test_top_level_move_disables_archive() {
        let fx = fixture();
        let view = compute_disabled_view(&fx.forest, &fx.f1, TransferMode::Move);
        // F1's subtree (F2) is disabled along with the owning archive.
        assert_eq!(disabled_names(&view), vec!["A1", "F1", "F2"]);
    }

    #[test]
    fn test_other_archives_untouched() {
        let fx = fixture();
        let view = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Move);
        let a2 = &view[1];
        assert!(!a2.disabled);
        assert!(a2.child_folders.iter().all(|f| !f.disabled));
    }

    #[test]
    fn test_input_forest_is_not_mutated() {
        let fx = fixture();
        let before = fx.forest.clone();
        let first = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Move);
        let second = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Move);
        assert_eq!(fx.forest, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_stale_flags_are_reset() {
        let mut fx = fixture();
        fx.forest[1].disabled = true;
        fx.forest[1].child_folders[0].disabled = true;
        fx.forest[1].expanded = true;
        let view = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Copy);
        assert!(!view[1].disabled);
        assert!(!view[1].expanded);
        assert!(!view[1].child_folders[0].disabled);
    }

    #[test]
    fn test_path_to_selection_is_expanded() {
        let fx = fixture();
        let view = compute_disabled_view(&fx.forest, &fx.f2, TransferMode::Copy);
        assert!(view[0].expanded);
        assert!(find_folder(&view[0].child_folders, fx.f1.id).expect("F1").expanded);
        assert!(!find_folder(&view[0].child_folders, fx.f2.id).expect("F2").expanded);
    }

    #[test]
    fn test_unknown_selection_disables_nothing() {
        let fx = fixture();
        let stray = Folder::new(fx.forest[0].id, None, "stray");
        let view = compute_disabled_view(&fx.forest, &stray, TransferMode::Move);
        assert!(disabled_names(&view).is_empty());
    }
}
