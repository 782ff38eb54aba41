//! Collections: the ordered containers that make up the tab-strip forest.
//!
//! A [`TabStrip`] owns every tab and collection in an arena and exposes the
//! structural primitives the delegate builds on: local insertion/removal,
//! local and recursive indexing, and cached recursive tab counts.
//!
//! The forest has two distinguished roots. `Pinned` holds pinned tabs as a
//! flat list; `Unpinned` roots the sub-forest whose in-order leaves are
//! exactly the visible unpinned tabs. `Group` and `Split` collections are
//! managed by the outer system; `TreeNode` collections are created and
//! destroyed by the delegate.
//!
//! # Ownership
//!
//! A collection uniquely owns its children. Tabs and collections keep an
//! explicit parent id, so parent access is O(1) and the recursive tab count
//! cache can be invalidated up the chain on every attach/detach, keeping
//! insertion O(depth).

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, StripError};
use crate::model::TreeNodeId;
use crate::tab::{Tab, TabId};

new_key_type! {
    /// A unique, stable identifier for a collection in the strip.
    pub struct CollectionId;
}

impl CollectionId {
    /// Convert the CollectionId to a raw u64 value for interop.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a CollectionId from a raw u64 value.
    ///
    /// This does not check that the id refers to a live collection.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// The closed set of collection variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// The root collection for all unpinned tabs.
    Unpinned,
    /// The root collection for pinned tabs; bypasses the tree logic.
    Pinned,
    /// A tab group, managed by the outer system.
    Group,
    /// A split view, managed by the outer system.
    Split,
    /// A tree node: one current tab plus zero or more descendants.
    TreeNode,
}

/// A child slot of a collection: either a tab or a nested collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// A leaf tab.
    Tab(TabId),
    /// A nested collection.
    Collection(CollectionId),
}

/// A collection record in the strip arena.
#[derive(Debug)]
struct Collection {
    kind: CollectionKind,
    parent: Option<CollectionId>,
    children: Vec<Child>,
    /// Cached recursive leaf count; always equals the sum of leaf tabs in
    /// the sub-forest rooted here.
    tab_count: usize,
    /// The node identity, for `TreeNode` collections only.
    node_id: Option<TreeNodeId>,
    /// The distinguished current tab, for `TreeNode` collections only.
    current_tab: Option<TabId>,
}

impl Collection {
    fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            tab_count: 0,
            node_id: None,
            current_tab: None,
        }
    }
}

/// The flat tab container: an arena of tabs and collections with the two
/// distinguished roots.
///
/// `TabStrip` enforces local consistency (a child is owned by exactly one
/// parent, counts match the forest) but knows nothing about tree-node
/// discipline; that is the delegate's job.
#[derive(Debug)]
pub struct TabStrip {
    tabs: SlotMap<TabId, Tab>,
    collections: SlotMap<CollectionId, Collection>,
    pinned: CollectionId,
    unpinned: CollectionId,
}

impl Default for TabStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl TabStrip {
    /// Creates an empty strip with its `Pinned` and `Unpinned` roots.
    pub fn new() -> Self {
        let mut collections = SlotMap::with_key();
        let pinned = collections.insert(Collection::new(CollectionKind::Pinned));
        let unpinned = collections.insert(Collection::new(CollectionKind::Unpinned));
        Self {
            tabs: SlotMap::with_key(),
            collections,
            pinned,
            unpinned,
        }
    }

    /// The root collection for pinned tabs.
    pub fn pinned_root(&self) -> CollectionId {
        self.pinned
    }

    /// The root collection for unpinned tabs.
    pub fn unpinned_root(&self) -> CollectionId {
        self.unpinned
    }

    // ---- tab registry -----------------------------------------------------

    /// Registers a tab payload with the strip and returns its handle.
    ///
    /// The tab starts detached; attach it with [`add_tab`](Self::add_tab) or
    /// through the delegate.
    pub fn register_tab(&mut self, tab: Tab) -> TabId {
        assert!(tab.parent().is_none(), "cannot register an attached tab");
        let id = self.tabs.insert(tab);
        tracing::trace!(target: "tabstrip_tree::collection", ?id, "registered tab");
        id
    }

    /// Discards a detached tab payload, returning it to the caller.
    ///
    /// Returns `None` if the id is not registered. Discarding a tab that is
    /// still attached to a collection aborts.
    pub fn discard_tab(&mut self, id: TabId) -> Option<Tab> {
        let tab = self.tabs.get(id)?;
        assert!(
            tab.parent().is_none(),
            "cannot discard a tab that is still attached"
        );
        tracing::trace!(target: "tabstrip_tree::collection", ?id, "discarded tab");
        self.tabs.remove(id)
    }

    /// Read access to a tab payload.
    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    pub(crate) fn tab_mut(&mut self, id: TabId) -> &mut Tab {
        self.tabs.get_mut(id).expect("stale tab id")
    }

    /// The collection that currently owns the tab, if attached.
    pub fn tab_parent(&self, id: TabId) -> Option<CollectionId> {
        self.tabs.get(id).and_then(Tab::parent)
    }

    // ---- collection registry ----------------------------------------------

    /// Creates a detached `Group` or `Split` collection.
    pub fn create_collection(&mut self, kind: CollectionKind) -> CollectionId {
        assert!(
            matches!(kind, CollectionKind::Group | CollectionKind::Split),
            "only Group and Split collections are created directly"
        );
        let id = self.collections.insert(Collection::new(kind));
        tracing::trace!(target: "tabstrip_tree::collection", ?id, ?kind, "created collection");
        id
    }

    /// Creates a detached tree node wrapping `tab` as its current tab.
    ///
    /// The tab must be registered, detached and unpinned.
    pub fn create_tree_node(&mut self, tab: TabId) -> CollectionId {
        let record = self.tabs.get(tab).expect("stale tab id");
        assert!(record.parent().is_none(), "tab is already attached");
        assert!(!record.is_pinned(), "pinned tabs are never wrapped in a tree node");

        let mut node = Collection::new(CollectionKind::TreeNode);
        node.children.push(Child::Tab(tab));
        node.tab_count = 1;
        node.current_tab = Some(tab);
        node.node_id = Some(TreeNodeId::next());
        let id = self.collections.insert(node);
        self.tab_mut(tab).parent = Some(id);
        tracing::trace!(target: "tabstrip_tree::collection", ?id, ?tab, "created tree node");
        id
    }

    /// Destroys a detached, empty collection.
    pub fn destroy_collection(&mut self, id: CollectionId) {
        let col = self.collection(id);
        assert!(
            !matches!(col.kind, CollectionKind::Pinned | CollectionKind::Unpinned),
            "root collections live as long as the strip"
        );
        assert!(col.parent.is_none(), "cannot destroy an attached collection");
        assert!(col.children.is_empty(), "cannot destroy a non-empty collection");
        tracing::trace!(target: "tabstrip_tree::collection", ?id, "destroyed collection");
        self.collections.remove(id);
    }

    /// The kind of a collection.
    pub fn kind(&self, id: CollectionId) -> CollectionKind {
        self.collection(id).kind
    }

    /// The parent of a collection, or `None` for roots and detached ones.
    pub fn parent_of(&self, id: CollectionId) -> Option<CollectionId> {
        self.collection(id).parent
    }

    /// The node identity of a tree node collection.
    pub fn node_id(&self, id: CollectionId) -> Option<TreeNodeId> {
        self.collection(id).node_id
    }

    /// The current tab of a tree node collection.
    pub fn current_tab(&self, id: CollectionId) -> Option<TabId> {
        self.collection(id).current_tab
    }

    // ---- local structure ---------------------------------------------------

    /// Number of direct children of a collection.
    pub fn child_count(&self, id: CollectionId) -> usize {
        self.collection(id).children.len()
    }

    /// The direct child at a local index.
    pub fn child_at(&self, id: CollectionId, local_index: usize) -> Option<Child> {
        self.collection(id).children.get(local_index).copied()
    }

    /// Inserts a detached tab as a direct child at `local_index`.
    pub fn add_tab(&mut self, id: CollectionId, tab: TabId, local_index: usize) -> Result<()> {
        let len = self.collection(id).children.len();
        if local_index > len {
            return Err(StripError::InvalidIndex { index: local_index, len });
        }
        let record = self.tabs.get(tab).expect("stale tab id");
        assert!(record.parent().is_none(), "tab is already attached to a collection");

        self.collection_mut(id).children.insert(local_index, Child::Tab(tab));
        self.tab_mut(tab).parent = Some(id);
        self.adjust_counts(id, 1);
        tracing::trace!(
            target: "tabstrip_tree::collection",
            collection = ?id, ?tab, local_index, "attached tab"
        );
        Ok(())
    }

    /// Inserts a detached collection as a direct child at `local_index`.
    pub fn add_collection(
        &mut self,
        parent: CollectionId,
        child: CollectionId,
        local_index: usize,
    ) -> Result<()> {
        let len = self.collection(parent).children.len();
        if local_index > len {
            return Err(StripError::InvalidIndex { index: local_index, len });
        }
        assert!(
            self.collection(child).parent.is_none(),
            "collection is already attached"
        );
        // Attaching an ancestor under its own descendant would make a cycle.
        let mut cursor = Some(parent);
        while let Some(c) = cursor {
            assert!(c != child, "attaching a collection under its own subtree");
            cursor = self.collection(c).parent;
        }

        let delta = self.collection(child).tab_count;
        self.collection_mut(parent)
            .children
            .insert(local_index, Child::Collection(child));
        self.collection_mut(child).parent = Some(parent);
        self.adjust_counts(parent, delta as isize);
        tracing::trace!(
            target: "tabstrip_tree::collection",
            ?parent, ?child, local_index, "attached collection"
        );
        Ok(())
    }

    /// Removes a tab that is a direct child of the collection.
    ///
    /// Fails with [`StripError::NotFound`] if the tab is not a direct child.
    /// If the tab was the collection's current tab, the current tab is
    /// cleared; the delegate only does this while dissolving the node.
    pub fn maybe_remove_tab(&mut self, id: CollectionId, tab: TabId) -> Result<TabId> {
        let position = self
            .collection(id)
            .children
            .iter()
            .position(|c| *c == Child::Tab(tab))
            .ok_or(StripError::NotFound)?;

        let col = self.collection_mut(id);
        col.children.remove(position);
        if col.current_tab == Some(tab) {
            col.current_tab = None;
        }
        self.tab_mut(tab).parent = None;
        self.adjust_counts(id, -1);
        tracing::trace!(
            target: "tabstrip_tree::collection",
            collection = ?id, ?tab, "detached tab"
        );
        Ok(tab)
    }

    /// Removes a collection that is a direct child of `parent`.
    ///
    /// The child keeps its own subtree; only the parent link is severed.
    /// Fails with [`StripError::NotFound`] if it is not a direct child.
    pub fn maybe_remove_collection(
        &mut self,
        parent: CollectionId,
        child: CollectionId,
    ) -> Result<CollectionId> {
        let position = self
            .collection(parent)
            .children
            .iter()
            .position(|c| *c == Child::Collection(child))
            .ok_or(StripError::NotFound)?;

        self.collection_mut(parent).children.remove(position);
        self.collection_mut(child).parent = None;
        let delta = self.collection(child).tab_count;
        self.adjust_counts(parent, -(delta as isize));
        tracing::trace!(
            target: "tabstrip_tree::collection",
            ?parent, ?child, "detached collection"
        );
        Ok(child)
    }

    /// The local index of a tab within the collection, if it is a direct
    /// child.
    pub fn index_of_tab(&self, id: CollectionId, tab: TabId) -> Option<usize> {
        self.collection(id)
            .children
            .iter()
            .position(|c| *c == Child::Tab(tab))
    }

    /// The local index of a collection within `parent`, if it is a direct
    /// child.
    pub fn index_of_collection(&self, parent: CollectionId, child: CollectionId) -> Option<usize> {
        self.collection(parent)
            .children
            .iter()
            .position(|c| *c == Child::Collection(child))
    }

    // ---- recursive structure -----------------------------------------------

    /// The number of leaf tabs in the sub-forest rooted at the collection.
    pub fn recursive_tab_count(&self, id: CollectionId) -> usize {
        self.collection(id).tab_count
    }

    /// The total number of tabs in the strip, pinned block included.
    pub fn total_tab_count(&self) -> usize {
        self.collection(self.pinned).tab_count + self.collection(self.unpinned).tab_count
    }

    /// The tab at a recursive (flat) index below the collection.
    pub fn tab_at_recursive(&self, id: CollectionId, index: usize) -> Option<TabId> {
        let mut remaining = index;
        for child in &self.collection(id).children {
            match *child {
                Child::Tab(tab) => {
                    if remaining == 0 {
                        return Some(tab);
                    }
                    remaining -= 1;
                }
                Child::Collection(sub) => {
                    let span = self.collection(sub).tab_count;
                    if remaining < span {
                        return self.tab_at_recursive(sub, remaining);
                    }
                    remaining -= span;
                }
            }
        }
        None
    }

    /// The recursive (flat) index of a tab below the collection.
    ///
    /// Returns `None` if the tab is not in the sub-forest. Computed by
    /// climbing the parent chain, so it costs O(depth × width) rather than a
    /// full traversal.
    pub fn index_of_tab_recursive(&self, id: CollectionId, tab: TabId) -> Option<usize> {
        let mut node = self.tab_parent(tab)?;
        let mut offset = self.offset_of_child(node, Child::Tab(tab))?;
        loop {
            if node == id {
                return Some(offset);
            }
            let parent = self.collection(node).parent?;
            offset += self.offset_of_child(parent, Child::Collection(node))?;
            node = parent;
        }
    }

    /// Recursive in-order traversal: the flat visible sequence of tabs below
    /// the collection.
    pub fn flat_tabs(&self, id: CollectionId) -> Vec<TabId> {
        let mut out = Vec::with_capacity(self.collection(id).tab_count);
        self.collect_tabs(id, &mut out);
        out
    }

    /// Finds the `(collection, local_index)` insertion point that places a
    /// new tab at `flat_index` of the sub-forest rooted at `id`.
    ///
    /// Descends into sub-collections when the flat index falls strictly
    /// inside their span; at a boundary between subtrees the shallowest
    /// level wins, so boundary inserts stay at the root.
    pub(crate) fn find_insert_point(
        &self,
        id: CollectionId,
        flat_index: usize,
    ) -> (CollectionId, usize) {
        debug_assert!(flat_index <= self.collection(id).tab_count);
        let mut remaining = flat_index;
        for (local, child) in self.collection(id).children.iter().enumerate() {
            if remaining == 0 {
                return (id, local);
            }
            match *child {
                Child::Tab(_) => remaining -= 1,
                Child::Collection(sub) => {
                    let span = self.collection(sub).tab_count;
                    if remaining < span {
                        return self.find_insert_point(sub, remaining);
                    }
                    remaining -= span;
                }
            }
        }
        (id, self.collection(id).children.len())
    }

    // ---- internals ----------------------------------------------------------

    fn collection(&self, id: CollectionId) -> &Collection {
        self.collections.get(id).expect("stale collection id")
    }

    fn collection_mut(&mut self, id: CollectionId) -> &mut Collection {
        self.collections.get_mut(id).expect("stale collection id")
    }

    /// Sum of the flat spans of the children before `child` in `parent`.
    fn offset_of_child(&self, parent: CollectionId, child: Child) -> Option<usize> {
        let mut offset = 0;
        for c in &self.collection(parent).children {
            if *c == child {
                return Some(offset);
            }
            offset += match *c {
                Child::Tab(_) => 1,
                Child::Collection(sub) => self.collection(sub).tab_count,
            };
        }
        None
    }

    fn collect_tabs(&self, id: CollectionId, out: &mut Vec<TabId>) {
        for child in &self.collection(id).children {
            match *child {
                Child::Tab(tab) => out.push(tab),
                Child::Collection(sub) => self.collect_tabs(sub, out),
            }
        }
    }

    /// Applies a leaf-count delta to the collection and every ancestor.
    fn adjust_counts(&mut self, from: CollectionId, delta: isize) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let col = self.collection_mut(id);
            col.tab_count = col
                .tab_count
                .checked_add_signed(delta)
                .expect("recursive tab count underflow");
            cursor = col.parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_with_tabs(n: usize) -> (TabStrip, Vec<TabId>) {
        let mut strip = TabStrip::new();
        let tabs: Vec<_> = (0..n).map(|_| strip.register_tab(Tab::new())).collect();
        (strip, tabs)
    }

    #[test]
    fn add_and_index_tabs_locally() {
        let (mut strip, tabs) = strip_with_tabs(3);
        let root = strip.unpinned_root();
        strip.add_tab(root, tabs[0], 0).unwrap();
        strip.add_tab(root, tabs[1], 1).unwrap();
        strip.add_tab(root, tabs[2], 1).unwrap();

        assert_eq!(strip.child_count(root), 3);
        assert_eq!(strip.index_of_tab(root, tabs[2]), Some(1));
        assert_eq!(strip.child_at(root, 0), Some(Child::Tab(tabs[0])));
        assert_eq!(strip.flat_tabs(root), vec![tabs[0], tabs[2], tabs[1]]);
    }

    #[test]
    fn add_tab_past_end_is_invalid_index() {
        let (mut strip, tabs) = strip_with_tabs(1);
        let root = strip.unpinned_root();
        let err = strip.add_tab(root, tabs[0], 1).unwrap_err();
        assert_eq!(err, StripError::InvalidIndex { index: 1, len: 0 });
    }

    #[test]
    fn remove_of_non_child_is_not_found() {
        let (mut strip, tabs) = strip_with_tabs(2);
        let root = strip.unpinned_root();
        strip.add_tab(root, tabs[0], 0).unwrap();
        assert_eq!(
            strip.maybe_remove_tab(root, tabs[1]),
            Err(StripError::NotFound)
        );
        assert_eq!(
            strip.maybe_remove_collection(root, strip.pinned_root()),
            Err(StripError::NotFound)
        );
    }

    #[test]
    fn recursive_counts_follow_nesting() {
        let (mut strip, tabs) = strip_with_tabs(4);
        let root = strip.unpinned_root();
        let group = strip.create_collection(CollectionKind::Group);

        strip.add_tab(root, tabs[0], 0).unwrap();
        strip.add_collection(root, group, 1).unwrap();
        strip.add_tab(group, tabs[1], 0).unwrap();
        strip.add_tab(group, tabs[2], 1).unwrap();
        strip.add_tab(root, tabs[3], 2).unwrap();

        assert_eq!(strip.recursive_tab_count(root), 4);
        assert_eq!(strip.recursive_tab_count(group), 2);
        assert_eq!(strip.child_count(root), 3);

        strip.maybe_remove_tab(group, tabs[1]).unwrap();
        assert_eq!(strip.recursive_tab_count(root), 3);
        assert_eq!(strip.recursive_tab_count(group), 1);
    }

    #[test]
    fn recursive_index_and_lookup_agree() {
        let (mut strip, tabs) = strip_with_tabs(4);
        let root = strip.unpinned_root();
        let group = strip.create_collection(CollectionKind::Group);

        strip.add_tab(root, tabs[0], 0).unwrap();
        strip.add_collection(root, group, 1).unwrap();
        strip.add_tab(group, tabs[1], 0).unwrap();
        strip.add_tab(group, tabs[2], 1).unwrap();
        strip.add_tab(root, tabs[3], 2).unwrap();

        for (flat, tab) in strip.flat_tabs(root).into_iter().enumerate() {
            assert_eq!(strip.tab_at_recursive(root, flat), Some(tab));
            assert_eq!(strip.index_of_tab_recursive(root, tab), Some(flat));
        }
        assert_eq!(strip.tab_at_recursive(root, 4), None);
        assert_eq!(strip.index_of_tab_recursive(root, tabs[1]), Some(1));
        // A tab outside the addressed sub-forest has no recursive index.
        assert_eq!(strip.index_of_tab_recursive(group, tabs[0]), None);
    }

    #[test]
    fn detached_collection_keeps_its_subtree() {
        let (mut strip, tabs) = strip_with_tabs(2);
        let root = strip.unpinned_root();
        let group = strip.create_collection(CollectionKind::Group);
        strip.add_collection(root, group, 0).unwrap();
        strip.add_tab(group, tabs[0], 0).unwrap();
        strip.add_tab(group, tabs[1], 1).unwrap();

        strip.maybe_remove_collection(root, group).unwrap();
        assert_eq!(strip.recursive_tab_count(root), 0);
        assert_eq!(strip.recursive_tab_count(group), 2);
        assert_eq!(strip.tab_parent(tabs[0]), Some(group));
    }

    #[test]
    fn tree_node_wraps_current_tab() {
        let (mut strip, tabs) = strip_with_tabs(1);
        let node = strip.create_tree_node(tabs[0]);

        assert_eq!(strip.kind(node), CollectionKind::TreeNode);
        assert_eq!(strip.current_tab(node), Some(tabs[0]));
        assert!(strip.node_id(node).is_some());
        assert_eq!(strip.recursive_tab_count(node), 1);
        assert_eq!(strip.tab_parent(tabs[0]), Some(node));

        strip.maybe_remove_tab(node, tabs[0]).unwrap();
        assert_eq!(strip.current_tab(node), None);
        strip.destroy_collection(node);
    }

    #[test]
    fn insert_point_prefers_shallowest_boundary() {
        let (mut strip, tabs) = strip_with_tabs(3);
        let root = strip.unpinned_root();
        let group = strip.create_collection(CollectionKind::Group);

        strip.add_tab(root, tabs[0], 0).unwrap();
        strip.add_collection(root, group, 1).unwrap();
        strip.add_tab(group, tabs[1], 0).unwrap();
        strip.add_tab(group, tabs[2], 1).unwrap();

        // Boundaries stay at the root.
        assert_eq!(strip.find_insert_point(root, 0), (root, 0));
        assert_eq!(strip.find_insert_point(root, 1), (root, 1));
        assert_eq!(strip.find_insert_point(root, 3), (root, 2));
        // Strictly inside the group's span descends into it.
        assert_eq!(strip.find_insert_point(root, 2), (group, 1));
    }

    #[test]
    fn pinned_root_counts_into_total() {
        let (mut strip, tabs) = strip_with_tabs(2);
        strip.tab_mut(tabs[0]).set_pinned(true);
        strip.add_tab(strip.pinned_root(), tabs[0], 0).unwrap();
        strip.add_tab(strip.unpinned_root(), tabs[1], 0).unwrap();
        assert_eq!(strip.total_tab_count(), 2);
    }

    #[test]
    fn discard_requires_detached() {
        let (mut strip, tabs) = strip_with_tabs(1);
        let root = strip.unpinned_root();
        strip.add_tab(root, tabs[0], 0).unwrap();
        strip.maybe_remove_tab(root, tabs[0]).unwrap();
        assert!(strip.discard_tab(tabs[0]).is_some());
        assert!(strip.discard_tab(tabs[0]).is_none());
    }
}
