//! Stack-based depth-first traversal shared by every tree walk, from the
//! server-side forest up to the live arena.
//!
//! An explicit stack keeps deep forests off the call stack and lets a
//! visitor stop the walk as soon as it has what it needs.

use docvault_core::types::FolderId;
use crate::folder::Folder;

/// What the traversal does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// End the walk and return this node.
    Stop,
}

/// Walks `roots` depth-first in document order.
///
/// `children` expands a node into its children and `visit` inspects (and
/// may mutate) each node before expansion. Returns the node on which
/// `visit` answered [`Visit::Stop`], if any.
pub fn depth_first<T, R, C, CI, F>(roots: R, mut children: C, mut visit: F) -> Option<T>
where
    R: IntoIterator<Item = T>,
    C: FnMut(T) -> CI,
    CI: IntoIterator<Item = T>,
    F: FnMut(&mut T) -> Visit,
{
    let mut stack: Vec<T> = roots.into_iter().collect();
    stack.reverse();

    while let Some(mut node) = stack.pop() {
        match visit(&mut node) {
            Visit::Stop => return Some(node),
            Visit::SkipChildren => continue,
            Visit::Continue => {
                let mark = stack.len();
                stack.extend(children(node));
                stack[mark..].reverse();
            }
        }
    }
    None
}

/// Finds a folder by ID below `roots`.
pub fn find_folder(roots: &[Folder], id: FolderId) -> Option<&Folder> {
    depth_first(
        roots.iter(),
        |folder| folder.child_folders.iter(),
        |folder| {
            if folder.id == id {
                Visit::Stop
            } else {
                Visit::Continue
            }
        },
    )
}

/// Finds a folder by ID below `roots`, mutably.
pub fn find_folder_mut(roots: &mut [Folder], id: FolderId) -> Option<&mut Folder> {
    depth_first(
        roots.iter_mut(),
        |folder| folder.child_folders.iter_mut(),
        |folder| {
            if folder.id == id {
                Visit::Stop
            } else {
                Visit::Continue
            }
        },
    )
}

/// Applies `action` to every folder below `roots`.
pub fn for_each_folder_mut(roots: &mut [Folder], mut action: impl FnMut(&mut Folder)) {
    depth_first(
        roots.iter_mut(),
        |folder| folder.child_folders.iter_mut(),
        |folder| {
            action(&mut **folder);
            Visit::Continue
        },
    );
}
