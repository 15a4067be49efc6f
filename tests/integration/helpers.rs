//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use docvault_core::config::TreeConfig;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::archive::Archive;
use docvault_entity::folder::Folder;
use docvault_entity::node::NodeId;
use docvault_entity::tree::TreeItem;
use docvault_service::TreeCoordinator;
use docvault_service::tree::{Visit, depth_first};
use docvault_storage::providers::InMemoryDocumentApi;

/// Identifiers of the sample forest:
///
/// ```text
/// A1
/// ├── Docs (F1)
/// │   └── Drafts (F2)
/// └── Invoices
/// A2
/// └── Misc
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Ids {
    pub a1: ArchiveId,
    pub a2: ArchiveId,
    pub f1: FolderId,
    pub f2: FolderId,
    pub invoices: FolderId,
    pub misc: FolderId,
}

impl Ids {
    pub fn a1(&self) -> NodeId {
        NodeId::Archive(self.a1)
    }

    pub fn a2(&self) -> NodeId {
        NodeId::Archive(self.a2)
    }

    pub fn f1(&self) -> NodeId {
        NodeId::Folder(self.f1)
    }

    pub fn f2(&self) -> NodeId {
        NodeId::Folder(self.f2)
    }

    pub fn invoices(&self) -> NodeId {
        NodeId::Folder(self.invoices)
    }

    pub fn misc(&self) -> NodeId {
        NodeId::Folder(self.misc)
    }
}

/// Build the sample forest.
pub fn sample_forest() -> (Vec<Archive>, Ids) {
    let a1 = Archive::new("A1");
    let a1_id = a1.id;
    let drafts = Folder::new(a1_id, None, "Drafts");
    let docs = Folder::new(a1_id, None, "Docs").with_child(drafts);
    let invoices = Folder::new(a1_id, None, "Invoices");
    let ids_f1 = docs.id;
    let ids_f2 = docs.child_folders[0].id;
    let ids_invoices = invoices.id;
    let a1 = a1.with_folder(docs).with_folder(invoices);

    let a2 = Archive::new("A2");
    let a2_id = a2.id;
    let misc = Folder::new(a2_id, None, "Misc");
    let misc_id = misc.id;
    let a2 = a2.with_folder(misc);

    let ids = Ids {
        a1: a1_id,
        a2: a2_id,
        f1: ids_f1,
        f2: ids_f2,
        invoices: ids_invoices,
        misc: misc_id,
    };
    (vec![a1, a2], ids)
}

/// A coordinator over the sample forest, backed by the in-memory API.
pub struct TestTree {
    pub api: Arc<InMemoryDocumentApi>,
    pub coordinator: TreeCoordinator,
    pub ids: Ids,
}

impl TestTree {
    pub fn new() -> Self {
        let (forest, ids) = sample_forest();
        let api = Arc::new(InMemoryDocumentApi::with_forest(forest.clone()));
        let coordinator = TreeCoordinator::new(api.clone(), &forest, TreeConfig::default())
            .expect("Failed to hydrate sample forest");
        Self {
            api,
            coordinator,
            ids,
        }
    }

    /// Names of the rendered nodes, depth-first.
    pub fn rendered_names(&self) -> Vec<String> {
        flatten(&self.coordinator.items())
            .into_iter()
            .map(|item| item.text.clone())
            .collect()
    }
}

/// Every item of a nested tree, depth-first.
pub fn flatten(items: &[TreeItem]) -> Vec<&TreeItem> {
    let mut out = Vec::new();
    depth_first(
        items.iter(),
        |item| item.items.iter(),
        |item| {
            out.push(*item);
            Visit::Continue
        },
    );
    out
}

/// Find a rendered item by ID.
pub fn item(items: &[TreeItem], id: NodeId) -> Option<&TreeItem> {
    items.iter().find_map(|root| root.find(id))
}
