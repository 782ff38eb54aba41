//! Tree tab model: node identities and the notification sink.
//!
//! The outer tab model is a weak collaborator of the delegate. It learns
//! about the lifecycle of tree nodes through two notifications and nothing
//! else; the structure itself stays inside [`TabStrip`](crate::TabStrip).

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique tree node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A globally unique identity for a tree node, independent of its current
/// position in the forest.
///
/// A `TreeNodeId` is created when a tab is wrapped in a tree node and dies
/// when that node is removed. Ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeNodeId(u64);

impl TreeNodeId {
    /// Returns a fresh, never-before-seen id.
    pub(crate) fn next() -> Self {
        Self(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value of this id for interop with host systems.
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Notification sink for tree node lifecycle events.
///
/// The delegate calls this on every structural change:
///
/// - [`add_tree_tab_node`](TreeTabModel::add_tree_tab_node) fires after the
///   structural invariants are re-established, so the observer can read a
///   consistent tree for the id it is told about.
/// - [`remove_tree_tab_node`](TreeTabModel::remove_tree_tab_node) fires
///   before the structural removal, for the same reason.
///
/// During bulk teardown the delegate suppresses remove notifications; use
/// [`should_handle_tab_manipulation`](crate::TreeTabStripDelegate::should_handle_tab_manipulation)
/// to skip intermediate work.
///
/// Implementations must not call back into the delegate's structural methods
/// from within a notification; doing so yields undefined ordering.
pub trait TreeTabModel: Send {
    /// A tree node with the given id now exists in the forest.
    fn add_tree_tab_node(&mut self, id: TreeNodeId);

    /// The tree node with the given id is about to be removed.
    fn remove_tree_tab_node(&mut self, id: TreeNodeId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_monotonic() {
        let a = TreeNodeId::next();
        let b = TreeNodeId::next();
        assert_ne!(a, b);
        assert!(b.as_raw() > a.as_raw());
    }
}
