//! Arena-backed live tree.
//!
//! Nodes live in a flat map keyed by [`NodeId`] with parent and child links
//! stored as ids, so every edit is an id-indexed patch instead of a clone
//! of the whole forest. The nested [`Archive`]/[`Folder`] structs are only
//! used at the edges: [`TreeArena::hydrate`] reads them and
//! [`TreeArena::to_forest`] writes them back.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::archive::Archive;
use docvault_entity::folder::Folder;
use docvault_entity::node::{NodeData, NodeId};
use docvault_entity::traversal::{Visit, depth_first};
use docvault_entity::tree::TreeItem;

use super::disable::{PickerView, TransferMode};

/// One node of the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaNode {
    /// Tagged domain payload.
    pub data: NodeData,
    /// Display name.
    pub name: String,
    /// Structural parent (None for an archive).
    pub parent: Option<NodeId>,
    /// Children in display order.
    pub children: Vec<NodeId>,
    /// Not selectable as a destination.
    pub disabled: bool,
    /// Expanded in the widget.
    pub expanded: bool,
    /// Currently selected.
    pub selected: bool,
    /// False once soft-deleted.
    pub visible: bool,
}

impl ArenaNode {
    fn archive(archive: &Archive, expanded: bool) -> Self {
        Self {
            data: NodeData::Archive { id: archive.id },
            name: archive.name.clone(),
            parent: None,
            children: Vec::new(),
            disabled: false,
            expanded,
            selected: false,
            visible: true,
        }
    }

    /// The node's identifier.
    pub fn id(&self) -> NodeId {
        self.data.node_id()
    }
}

/// The live archive/folder forest.
#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    nodes: HashMap<NodeId, ArenaNode>,
    roots: Vec<NodeId>,
    selected: Option<NodeId>,
}

impl TreeArena {
    /// Build an arena from a nested forest.
    ///
    /// Rejects folders whose `archive_id` does not match the archive that
    /// contains them, and any id that appears twice. Transient flags are
    /// reset; archives start expanded when `expand_archives` is set.
    pub fn hydrate(forest: &[Archive], expand_archives: bool) -> AppResult<Self> {
        let mut arena = Self::default();

        for archive in forest {
            let root = NodeId::Archive(archive.id);
            if arena.nodes.contains_key(&root) {
                return Err(AppError::validation(format!(
                    "Archive {} appears more than once",
                    archive.id
                )));
            }

            let stray = depth_first(
                archive.child_folders.iter(),
                |folder| folder.child_folders.iter(),
                |folder| {
                    if folder.archive_id == archive.id {
                        Visit::Continue
                    } else {
                        Visit::Stop
                    }
                },
            );
            if let Some(folder) = stray {
                return Err(AppError::validation(format!(
                    "Folder {} claims archive {} but is stored under archive {}",
                    folder.id, folder.archive_id, archive.id
                )));
            }

            arena.nodes.insert(root, ArenaNode::archive(archive, expand_archives));
            arena.roots.push(root);
            for folder in &archive.child_folders {
                arena
                    .insert_folder(folder, root)
                    .map_err(|e| AppError::validation(format!("Rejected forest: {}", e.message)))?;
            }
        }

        debug!(
            archives = arena.roots.len(),
            nodes = arena.nodes.len(),
            "Tree hydrated"
        );
        Ok(arena)
    }

    /// Number of nodes, hidden ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no archives.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Archive ids in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&ArenaNode> {
        self.nodes.get(&id)
    }

    /// Look up a node, failing with `NotFound`.
    pub fn require(&self, id: NodeId) -> AppResult<&ArenaNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("Node {id} is not in the tree")))
    }

    fn require_mut(&mut self, id: NodeId) -> AppResult<&mut ArenaNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Node {id} is not in the tree")))
    }

    /// Children of a node in display order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |node| node.children.as_slice())
    }

    /// Visits every node depth-first in display order, hidden ones
    /// included. Returns the id on which `visit` answered [`Visit::Stop`].
    pub fn walk(&self, mut visit: impl FnMut(&ArenaNode) -> Visit) -> Option<NodeId> {
        depth_first(
            self.roots.iter().copied(),
            |id| self.children(id).to_vec(),
            |id| self.nodes.get(&*id).map_or(Visit::SkipChildren, &mut visit),
        )
    }

    /// Like [`walk`](Self::walk) but never enters a hidden node.
    pub fn walk_visible(&self, mut visit: impl FnMut(&ArenaNode) -> Visit) -> Option<NodeId> {
        self.walk(|node| {
            if node.visible {
                visit(node)
            } else {
                Visit::SkipChildren
            }
        })
    }

    /// Ids of `id` and everything below it, in display order.
    pub fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        if self.nodes.contains_key(&id) {
            depth_first(
                std::iter::once(id),
                |id| self.children(id).to_vec(),
                |id| {
                    ids.push(*id);
                    Visit::Continue
                },
            );
        }
        ids
    }

    /// Ancestors of `id`, nearest first, ending at the archive.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.nodes.get(&id).and_then(|node| node.parent);
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.nodes.get(&parent).and_then(|node| node.parent);
        }
        chain
    }

    /// Whether `id` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Insert a folder subtree as the last child of `parent`.
    ///
    /// The subtree is re-homed to the parent's archive. Fails without
    /// touching the arena if the parent is unknown or any id is already
    /// present.
    pub fn insert_folder(&mut self, folder: &Folder, parent: NodeId) -> AppResult<NodeId> {
        let archive_id = self.require(parent)?.data.archive_id();
        self.check_new_ids(folder, &HashSet::new())?;
        self.attach(folder, parent, archive_id);
        Ok(NodeId::Folder(folder.id))
    }

    /// Replace the folder `folder_id` with `returned`, placed under `dest`.
    ///
    /// When `returned` carries no children the locally known children of the
    /// old node are carried over, hidden ones included. Nodes hidden before
    /// the move stay hidden. Fails without touching the arena if `dest` lies
    /// inside the moved subtree.
    pub fn relocate(&mut self, folder_id: FolderId, returned: &Folder, dest: NodeId) -> AppResult<NodeId> {
        let source = NodeId::Folder(folder_id);
        let old_parent = self
            .require(source)?
            .parent
            .ok_or_else(|| AppError::internal(format!("Folder {folder_id} has no parent")))?;
        let archive_id = self.require(dest)?.data.archive_id();
        if dest == source || self.is_descendant_of(dest, source) {
            return Err(AppError::validation(
                "A folder cannot be moved into its own subtree",
            ));
        }

        let grafted;
        let incoming = if returned.child_folders.is_empty() {
            let mut folder = returned.clone();
            folder.child_folders = self
                .build_folder(source, true)
                .map(|local| local.child_folders)
                .unwrap_or_default();
            grafted = folder;
            &grafted
        } else {
            returned
        };

        let old_ids: HashSet<NodeId> = self.subtree_ids(source).into_iter().collect();
        self.check_new_ids(incoming, &old_ids)?;
        let hidden: Vec<NodeId> = old_ids
            .iter()
            .filter(|id| self.nodes.get(*id).is_some_and(|node| !node.visible))
            .copied()
            .collect();

        if let Some(parent) = self.nodes.get_mut(&old_parent) {
            parent.children.retain(|child| *child != source);
        }
        for id in &old_ids {
            self.nodes.remove(id);
        }
        self.attach(incoming, dest, archive_id);
        for id in &hidden {
            if let Some(node) = self.nodes.get_mut(id) {
                node.visible = false;
            }
        }

        if let Some(selected) = self.selected {
            match self.nodes.get_mut(&selected) {
                Some(node) => node.selected = true,
                None => self.selected = None,
            }
        }

        debug!(
            folder_id = %folder_id,
            dest = %dest,
            nodes = old_ids.len(),
            "Folder relocated"
        );
        Ok(NodeId::Folder(incoming.id))
    }

    fn check_new_ids(&self, folder: &Folder, replaced: &HashSet<NodeId>) -> AppResult<()> {
        let mut seen = HashSet::new();
        let clash = depth_first(
            std::iter::once(folder),
            |folder| folder.child_folders.iter(),
            |folder| {
                let id = NodeId::Folder(folder.id);
                let taken = self.nodes.contains_key(&id) && !replaced.contains(&id);
                if taken || !seen.insert(id) {
                    Visit::Stop
                } else {
                    Visit::Continue
                }
            },
        );
        match clash {
            Some(folder) => Err(AppError::conflict(format!(
                "Folder {} is already in the tree",
                folder.id
            ))),
            None => Ok(()),
        }
    }

    fn attach(&mut self, folder: &Folder, parent: NodeId, archive_id: ArchiveId) {
        let nodes = &mut self.nodes;
        depth_first(
            std::iter::once((folder, parent)),
            |(folder, _)| {
                folder
                    .child_folders
                    .iter()
                    .map(move |child| (child, NodeId::Folder(folder.id)))
            },
            |(folder, parent)| {
                let id = NodeId::Folder(folder.id);
                nodes.insert(
                    id,
                    ArenaNode {
                        data: NodeData::Folder {
                            id: folder.id,
                            archive_id,
                            parent_id: parent.as_folder(),
                        },
                        name: folder.name.clone(),
                        parent: Some(*parent),
                        children: Vec::new(),
                        disabled: false,
                        expanded: false,
                        selected: false,
                        visible: true,
                    },
                );
                if let Some(parent_node) = nodes.get_mut(&*parent) {
                    parent_node.children.push(id);
                }
                Visit::Continue
            },
        );
    }

    /// Rename a node in place.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> AppResult<()> {
        self.require_mut(id)?.name = name.into();
        Ok(())
    }

    /// Soft-delete a node. It stays in the arena but is skipped by every
    /// visible traversal, along with its subtree.
    pub fn hide(&mut self, id: NodeId) -> AppResult<()> {
        let node = self.require_mut(id)?;
        node.visible = false;
        node.selected = false;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Whether a node and all of its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.visible)
            && self
                .ancestors(id)
                .iter()
                .all(|a| self.nodes.get(a).is_some_and(|node| node.visible))
    }

    /// Mark exactly one node as selected.
    pub fn select(&mut self, id: NodeId) -> AppResult<NodeData> {
        if !self.is_visible(id) {
            self.require(id)?;
            return Err(AppError::invalid_state(format!("Node {id} has been deleted")));
        }
        if let Some(previous) = self.selected.take() {
            if let Some(node) = self.nodes.get_mut(&previous) {
                node.selected = false;
            }
        }
        let node = self.require_mut(id)?;
        node.selected = true;
        let data = node.data;
        self.selected = Some(id);
        Ok(data)
    }

    /// The selected node, if any.
    pub fn selected(&self) -> Option<&ArenaNode> {
        self.selected.and_then(|id| self.nodes.get(&id))
    }

    /// Expand or collapse a node.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> AppResult<()> {
        self.require_mut(id)?.expanded = expanded;
        Ok(())
    }

    /// Compute the destination constraints for moving or copying a folder.
    ///
    /// Same rules as [`compute_disabled_view`](super::compute_disabled_view),
    /// expressed as id sets.
    pub fn picker_view(&self, folder_id: FolderId, mode: TransferMode) -> AppResult<PickerView> {
        let source = NodeId::Folder(folder_id);
        let node = self.require(source)?;

        let mut disabled: HashSet<NodeId> = self.subtree_ids(source).into_iter().collect();
        if mode == TransferMode::Move {
            if let Some(parent) = node.parent {
                disabled.insert(parent);
            }
        }
        let expanded: HashSet<NodeId> = self.ancestors(source).into_iter().collect();

        debug!(
            folder_id = %folder_id,
            mode = %mode,
            disabled = disabled.len(),
            "Picker view computed"
        );
        Ok(PickerView::new(mode, folder_id, disabled, expanded))
    }

    /// Nested items for every visible node, carrying the arena's flags.
    pub fn visible_items(&self) -> Vec<TreeItem> {
        self.roots
            .iter()
            .filter_map(|id| self.build_item(*id, None))
            .collect()
    }

    /// Nested items for the destination picker; flags come from `view`.
    pub fn picker_items(&self, view: &PickerView) -> Vec<TreeItem> {
        self.roots
            .iter()
            .filter_map(|id| self.build_item(*id, Some(view)))
            .collect()
    }

    fn build_item(&self, id: NodeId, view: Option<&PickerView>) -> Option<TreeItem> {
        let node = self.nodes.get(&id).filter(|node| node.visible)?;
        Some(TreeItem {
            id,
            text: node.name.clone(),
            data: node.data,
            items: node
                .children
                .iter()
                .filter_map(|child| self.build_item(*child, view))
                .collect(),
            disabled: view.map_or(node.disabled, |v| v.is_disabled(id)),
            expanded: view.map_or(node.expanded, |v| v.is_expanded(id)),
            selected: node.selected,
            visible: true,
        })
    }

    /// Nested copy of one folder's visible subtree.
    pub fn folder(&self, id: FolderId) -> Option<Folder> {
        self.build_folder(NodeId::Folder(id), false)
    }

    fn build_folder(&self, id: NodeId, include_hidden: bool) -> Option<Folder> {
        let node = self.nodes.get(&id)?;
        if !include_hidden && !node.visible {
            return None;
        }
        let NodeData::Folder {
            id,
            archive_id,
            parent_id,
        } = node.data
        else {
            return None;
        };
        Some(Folder {
            id,
            archive_id,
            parent_id,
            name: node.name.clone(),
            child_folders: node
                .children
                .iter()
                .filter_map(|child| self.build_folder(*child, include_hidden))
                .collect(),
            disabled: node.disabled,
            expanded: node.expanded,
        })
    }

    /// Write the arena back out as a nested forest.
    pub fn to_forest(&self, include_hidden: bool) -> Vec<Archive> {
        self.roots
            .iter()
            .filter_map(|root| {
                let node = self.nodes.get(root)?;
                if !include_hidden && !node.visible {
                    return None;
                }
                Some(Archive {
                    id: node.data.archive_id(),
                    name: node.name.clone(),
                    child_folders: node
                        .children
                        .iter()
                        .filter_map(|child| self.build_folder(*child, include_hidden))
                        .collect(),
                    disabled: node.disabled,
                    expanded: node.expanded,
                })
            })
            .collect()
    }
}
