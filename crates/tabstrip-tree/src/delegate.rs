//! The tree tab-strip delegate.
//!
//! [`TreeTabStripDelegate`] wraps a flat [`TabStrip`] and translates the
//! ordinary "insert at flat index N / remove at flat index N / move flat
//! indices to N" operations into tree-preserving structural edits: every
//! unpinned tab lives as the current tab of exactly one tree node, and the
//! in-order traversal of the unpinned root always equals the visible flat
//! sequence.
//!
//! # Flat index space
//!
//! The delegate addresses tabs in one combined space: the pinned block
//! first (`[0, pinned_count)`), then the unpinned forest. Pinned tabs bypass
//! the tree logic entirely and are forwarded to the underlying container
//! unchanged.
//!
//! # Lifecycle
//!
//! Construction wraps every unpinned leaf tab in a fresh tree node and
//! registers each node with the [`TreeTabModel`]. Dropping the delegate (or
//! calling [`into_strip`](TreeTabStripDelegate::into_strip)) flattens every
//! tree node back out, restoring the container to its pre-construction
//! layout; remove notifications are suppressed during this bulk teardown.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use tabstrip_tree::{Tab, TabStrip, TreeTabModel, TreeTabStripDelegate};
//!
//! let mut strip = TabStrip::new();
//! let root = strip.unpinned_root();
//! let a = strip.register_tab(Tab::new());
//! strip.add_tab(root, a, 0)?;
//!
//! let model: Arc<RwLock<dyn TreeTabModel>> = Arc::new(RwLock::new(MyModel::new()));
//! let mut delegate = TreeTabStripDelegate::new(strip, Arc::downgrade(&model));
//!
//! let b = delegate.register_tab(Tab::new());
//! delegate.add_tab_recursive(b, 1, None, false, Some(a))?;
//! ```

use std::sync::Weak;

use parking_lot::RwLock;

use crate::collection::{Child, CollectionId, CollectionKind, TabStrip};
use crate::error::{Result, StripError};
use crate::model::{TreeNodeId, TreeTabModel};
use crate::tab::{Tab, TabGroupId, TabId};

/// Translates flat tab-strip mutations into tree-preserving edits.
///
/// The delegate owns the underlying [`TabStrip`] for its lifetime and holds
/// a non-owning reference to the model sink. All operations run on one
/// thread, are synchronous, and leave the tree unchanged when they fail.
pub struct TreeTabStripDelegate {
    strip: TabStrip,
    model: Weak<RwLock<dyn TreeTabModel>>,
    in_destruction: bool,
}

impl TreeTabStripDelegate {
    /// Wraps `strip`, building one tree node per unpinned leaf tab.
    ///
    /// The model is notified once per created node, after the node is in
    /// place.
    pub fn new(strip: TabStrip, model: Weak<RwLock<dyn TreeTabModel>>) -> Self {
        let mut delegate = Self {
            strip,
            model,
            in_destruction: false,
        };
        let root = delegate.strip.unpinned_root();
        delegate.build_tree_tabs(root);
        tracing::debug!(
            target: "tabstrip_tree::delegate",
            tabs = delegate.strip.total_tab_count(),
            "built tree tabs"
        );
        delegate
    }

    /// Flattens the forest and returns the underlying container.
    ///
    /// After this the strip holds the same flat layout it had before
    /// construction, with no tree node wrappers left.
    pub fn into_strip(mut self) -> TabStrip {
        self.teardown();
        std::mem::take(&mut self.strip)
    }

    /// Read access to the wrapped container.
    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    /// Registers a new tab payload with the wrapped container.
    pub fn register_tab(&mut self, tab: Tab) -> TabId {
        self.strip.register_tab(tab)
    }

    /// Discards a detached tab payload.
    pub fn discard_tab(&mut self, id: TabId) -> Option<Tab> {
        self.strip.discard_tab(id)
    }

    /// True except while the delegate is being torn down.
    ///
    /// The outer system uses this to suppress redundant structural work once
    /// destruction has begun.
    pub fn should_handle_tab_manipulation(&self) -> bool {
        !self.in_destruction
    }

    /// Total number of tabs, pinned block included.
    pub fn tab_count(&self) -> usize {
        self.strip.total_tab_count()
    }

    /// The tab at a combined flat index (pinned block first).
    pub fn tab_at(&self, flat_index: usize) -> Option<TabId> {
        let pinned_count = self.strip.recursive_tab_count(self.strip.pinned_root());
        if flat_index < pinned_count {
            self.strip.tab_at_recursive(self.strip.pinned_root(), flat_index)
        } else {
            self.strip
                .tab_at_recursive(self.strip.unpinned_root(), flat_index - pinned_count)
        }
    }

    /// The combined flat index of a tab.
    pub fn index_of_tab(&self, tab: TabId) -> Option<usize> {
        let pinned = self.strip.pinned_root();
        if let Some(i) = self.strip.index_of_tab_recursive(pinned, tab) {
            return Some(i);
        }
        self.strip
            .index_of_tab_recursive(self.strip.unpinned_root(), tab)
            .map(|i| i + self.strip.recursive_tab_count(pinned))
    }

    // ---- structural operations ---------------------------------------------

    /// Inserts a registered, detached tab so that `tab_at(flat_index)`
    /// afterwards returns it.
    ///
    /// Pinned tabs are forwarded to the pinned container unchanged. For
    /// unpinned tabs, an `opener` hint places the new tab as a descendant of
    /// the opener's tree node when the indices line up (the tab preceding
    /// `flat_index` must share the opener's root tree node); otherwise the
    /// tab becomes a fresh tree node at the insertion point. The model is
    /// notified with the new node's id after the structure is in place.
    ///
    /// Fails with [`StripError::InvalidIndex`] when `flat_index` is outside
    /// the addressed container.
    pub fn add_tab_recursive(
        &mut self,
        tab: TabId,
        flat_index: usize,
        group: Option<TabGroupId>,
        pinned: bool,
        opener: Option<TabId>,
    ) -> Result<()> {
        let pinned_root = self.strip.pinned_root();
        let unpinned_root = self.strip.unpinned_root();
        let pinned_count = self.strip.recursive_tab_count(pinned_root);

        if pinned {
            if flat_index > pinned_count {
                return Err(StripError::InvalidIndex {
                    index: flat_index,
                    len: pinned_count,
                });
            }
            let record = self.strip.tab_mut(tab);
            record.set_pinned(true);
            record.set_group(group);
            record.set_opener(opener);
            self.strip.add_tab(pinned_root, tab, flat_index)?;
            tracing::debug!(
                target: "tabstrip_tree::delegate",
                ?tab, flat_index, "added pinned tab"
            );
            return Ok(());
        }

        let total = pinned_count + self.strip.recursive_tab_count(unpinned_root);
        if flat_index < pinned_count || flat_index > total {
            return Err(StripError::InvalidIndex {
                index: flat_index,
                len: total,
            });
        }
        let unpinned_index = flat_index - pinned_count;

        let record = self.strip.tab_mut(tab);
        record.set_pinned(false);
        record.set_group(group);
        record.set_opener(opener);

        // Opener placement: only when the new tab would not be first, and
        // only when the preceding tab belongs to the opener's hierarchy.
        if let Some(opener) = opener
            && unpinned_index > 0
            && let Some((parent_node, local_index)) =
                self.opener_insert_point(opener, unpinned_index)
        {
            let node = self.strip.create_tree_node(tab);
            self.strip.add_collection(parent_node, node, local_index)?;
            let node_id = self.strip.node_id(node).expect("tree node has an id");
            tracing::debug!(
                target: "tabstrip_tree::delegate",
                ?tab, flat_index, ?opener, ?node_id, "added tab under opener"
            );
            self.notify_add(node_id);
            return Ok(());
        }

        // Bare insertion: wrap the tab in a fresh tree node at the position
        // that realizes the flat index.
        let (parent, local_index) = self.strip.find_insert_point(unpinned_root, unpinned_index);
        let node = self.strip.create_tree_node(tab);
        self.strip.add_collection(parent, node, local_index)?;
        let node_id = self.strip.node_id(node).expect("tree node has an id");
        tracing::debug!(
            target: "tabstrip_tree::delegate",
            ?tab, flat_index, ?node_id, "added tab"
        );
        self.notify_add(node_id);
        Ok(())
    }

    /// Removes and returns the tab at a combined flat index.
    ///
    /// When the tab is the current tab of a tree node, the node's surviving
    /// descendants are re-parented to the node's parent at the node's local
    /// index, keeping their visible positions and order; the node itself is
    /// destroyed. The model is told about the node's id before the removal.
    ///
    /// Fails with [`StripError::InvalidIndex`] when no tab exists at
    /// `flat_index`.
    pub fn remove_tab_at_recursive(&mut self, flat_index: usize) -> Result<TabId> {
        let total = self.strip.total_tab_count();
        if flat_index >= total {
            return Err(StripError::InvalidIndex {
                index: flat_index,
                len: total,
            });
        }

        let pinned_root = self.strip.pinned_root();
        let pinned_count = self.strip.recursive_tab_count(pinned_root);
        if flat_index < pinned_count {
            let tab = self
                .strip
                .tab_at_recursive(pinned_root, flat_index)
                .expect("index in range");
            self.strip.maybe_remove_tab(pinned_root, tab)?;
            tracing::debug!(
                target: "tabstrip_tree::delegate",
                ?tab, flat_index, "removed pinned tab"
            );
            return Ok(tab);
        }

        let unpinned_root = self.strip.unpinned_root();
        let tab = self
            .strip
            .tab_at_recursive(unpinned_root, flat_index - pinned_count)
            .expect("index in range");
        let parent = self.strip.tab_parent(tab).expect("attached tab has a parent");

        if self.strip.kind(parent) != CollectionKind::TreeNode {
            // Plain container child; no tree discipline to maintain.
            self.strip.maybe_remove_tab(parent, tab)?;
            tracing::debug!(
                target: "tabstrip_tree::delegate",
                ?tab, flat_index, "removed container tab"
            );
            return Ok(tab);
        }

        let node = parent;
        assert_eq!(
            self.strip.current_tab(node),
            Some(tab),
            "unpinned tab must be the current tab of its tree node"
        );
        let node_id = self.strip.node_id(node).expect("tree node has an id");

        // Observers hear about the id while the node is still readable.
        self.notify_remove(node_id);

        self.strip
            .maybe_remove_tab(node, tab)
            .expect("current tab is a direct child");
        self.promote_children(node);
        tracing::debug!(
            target: "tabstrip_tree::delegate",
            ?tab, flat_index, ?node_id, "removed tab and dissolved its node"
        );
        Ok(tab)
    }

    /// Relocates the tabs at `flat_indices` so they sit contiguously at
    /// `destination`, optionally changing pinned state and group membership.
    ///
    /// This decomposes into remove-then-add: each moved tab re-enters the
    /// strip as its own tree node, losing any prior nesting. `destination`
    /// is interpreted in the index space that remains after the moved tabs
    /// are detached. When `retain_collection_kinds` is true each tab keeps
    /// its previous group id; otherwise all moved tabs adopt `group`.
    ///
    /// All indices are validated before any mutation, so a failing call
    /// leaves the tree unchanged.
    pub fn move_tabs_recursive(
        &mut self,
        flat_indices: &[usize],
        destination: usize,
        group: Option<TabGroupId>,
        pinned: bool,
        retain_collection_kinds: bool,
    ) -> Result<()> {
        if flat_indices.is_empty() {
            return Ok(());
        }

        let total = self.strip.total_tab_count();
        let mut sources: Vec<usize> = flat_indices.to_vec();
        sources.sort_unstable();
        sources.dedup();
        if let Some(&worst) = sources.last()
            && worst >= total
        {
            return Err(StripError::InvalidIndex { index: worst, len: total });
        }

        let pinned_count = self.strip.recursive_tab_count(self.strip.pinned_root());
        let pinned_removed = sources.iter().filter(|&&i| i < pinned_count).count();
        let pinned_after = pinned_count - pinned_removed;
        let total_after = total - sources.len();
        if pinned {
            if destination > pinned_after {
                return Err(StripError::InvalidIndex {
                    index: destination,
                    len: pinned_after,
                });
            }
        } else if destination < pinned_after || destination > total_after {
            return Err(StripError::InvalidIndex {
                index: destination,
                len: total_after,
            });
        }

        let mut moved = Vec::with_capacity(sources.len());
        for &index in sources.iter().rev() {
            moved.push(self.remove_tab_at_recursive(index)?);
        }
        moved.reverse();

        for (offset, tab) in moved.into_iter().enumerate() {
            let tab_group = if retain_collection_kinds {
                self.strip.tab(tab).and_then(Tab::group)
            } else {
                group
            };
            self.add_tab_recursive(tab, destination + offset, tab_group, pinned, None)?;
        }
        tracing::debug!(
            target: "tabstrip_tree::delegate",
            count = sources.len(), destination, pinned, "moved tabs"
        );
        Ok(())
    }

    // ---- hierarchy predicates ----------------------------------------------

    /// The topmost tree-node ancestor of a tab, if it has one.
    ///
    /// Group and Split collections are transparent: the walk continues
    /// through them and reports the highest tree node on the chain.
    pub fn root_tree_node_of_tab(&self, tab: TabId) -> Option<CollectionId> {
        let mut topmost = None;
        let mut cursor = self.strip.tab_parent(tab);
        while let Some(collection) = cursor {
            if self.strip.kind(collection) == CollectionKind::TreeNode {
                topmost = Some(collection);
            }
            cursor = self.strip.parent_of(collection);
        }
        topmost
    }

    /// Whether two collections are tree nodes sharing the same topmost tree
    /// node ancestor.
    pub fn are_in_same_tree_hierarchy(&self, a: CollectionId, b: CollectionId) -> bool {
        if self.strip.kind(a) != CollectionKind::TreeNode
            || self.strip.kind(b) != CollectionKind::TreeNode
        {
            return false;
        }
        self.topmost_tree_node(a) == self.topmost_tree_node(b)
    }

    fn topmost_tree_node(&self, node: CollectionId) -> CollectionId {
        let mut topmost = node;
        let mut cursor = self.strip.parent_of(node);
        while let Some(collection) = cursor {
            if self.strip.kind(collection) == CollectionKind::TreeNode {
                topmost = collection;
            }
            cursor = self.strip.parent_of(collection);
        }
        topmost
    }

    // ---- internals ----------------------------------------------------------

    /// Wraps every leaf tab below `collection` in a fresh tree node,
    /// replacing it in place so sibling indices stay stable.
    fn build_tree_tabs(&mut self, collection: CollectionId) {
        for local_index in 0..self.strip.child_count(collection) {
            match self
                .strip
                .child_at(collection, local_index)
                .expect("index in range")
            {
                Child::Collection(sub) => self.build_tree_tabs(sub),
                Child::Tab(tab) => {
                    self.strip
                        .maybe_remove_tab(collection, tab)
                        .expect("direct child");
                    let node = self.strip.create_tree_node(tab);
                    self.strip
                        .add_collection(collection, node, local_index)
                        .expect("index in range");
                    let node_id = self.strip.node_id(node).expect("tree node has an id");
                    self.notify_add(node_id);
                }
            }
        }
    }

    fn teardown(&mut self) {
        if self.in_destruction {
            return;
        }
        self.in_destruction = true;
        let root = self.strip.unpinned_root();
        self.flatten_children(root);
        tracing::debug!(target: "tabstrip_tree::delegate", "flattened tree tabs");
    }

    /// Dissolves every tree node below `collection`, bottom-up, moving each
    /// node's children out to the node's former position.
    fn flatten_children(&mut self, collection: CollectionId) {
        let mut local_index = 0;
        while local_index < self.strip.child_count(collection) {
            match self
                .strip
                .child_at(collection, local_index)
                .expect("index in range")
            {
                Child::Tab(_) => local_index += 1,
                Child::Collection(sub) => {
                    self.flatten_children(sub);
                    if self.strip.kind(sub) == CollectionKind::TreeNode {
                        let moved = self.drain_node_children(collection, sub, local_index);
                        self.strip
                            .maybe_remove_collection(collection, sub)
                            .expect("direct child");
                        self.strip.destroy_collection(sub);
                        // The drained children were already flattened.
                        local_index += moved;
                    } else {
                        local_index += 1;
                    }
                }
            }
        }
    }

    /// Re-parents the remaining children of a tree node to `parent` at
    /// `local_index`, then destroys the empty node.
    fn promote_children(&mut self, node: CollectionId) {
        let parent = self
            .strip
            .parent_of(node)
            .expect("tree node always has a parent");
        let local_index = self
            .strip
            .index_of_collection(parent, node)
            .expect("direct child");
        self.drain_node_children(parent, node, local_index);
        self.strip
            .maybe_remove_collection(parent, node)
            .expect("direct child");
        self.strip.destroy_collection(node);
    }

    /// Moves every child of `node` into `parent` starting at `local_index`.
    ///
    /// Iterates in reverse so that inserting at a fixed target index
    /// preserves the original order. Returns the number of children moved.
    fn drain_node_children(
        &mut self,
        parent: CollectionId,
        node: CollectionId,
        local_index: usize,
    ) -> usize {
        let count = self.strip.child_count(node);
        for position in (0..count).rev() {
            match self.strip.child_at(node, position).expect("index in range") {
                Child::Tab(tab) => {
                    self.strip
                        .maybe_remove_tab(node, tab)
                        .expect("direct child");
                    self.strip
                        .add_tab(parent, tab, local_index)
                        .expect("index in range");
                }
                Child::Collection(sub) => {
                    self.strip
                        .maybe_remove_collection(node, sub)
                        .expect("direct child");
                    self.strip
                        .add_collection(parent, sub, local_index)
                        .expect("index in range");
                }
            }
        }
        count
    }

    /// Computes the `(tree node, local index)` placement under the opener's
    /// own tree node that realizes `unpinned_index`, or `None` when the
    /// indices cannot line up and the caller must fall back to bare
    /// insertion.
    fn opener_insert_point(
        &self,
        opener: TabId,
        unpinned_index: usize,
    ) -> Option<(CollectionId, usize)> {
        let unpinned_root = self.strip.unpinned_root();
        let preceding = self
            .strip
            .tab_at_recursive(unpinned_root, unpinned_index - 1)?;
        let opener_root = self.root_tree_node_of_tab(opener)?;
        if self.root_tree_node_of_tab(preceding) != Some(opener_root) {
            return None;
        }

        // Invariant: an unpinned tab's parent is the tree node it is the
        // current tab of.
        let opener_node = self.strip.tab_parent(opener)?;
        if self.strip.kind(opener_node) != CollectionKind::TreeNode {
            return None;
        }
        let opener_flat = self
            .strip
            .index_of_tab_recursive(unpinned_root, opener)?;

        let mut local_index = 0;
        let mut tab_count = 0;
        for position in 0..self.strip.child_count(opener_node) {
            local_index += 1;
            tab_count += match self
                .strip
                .child_at(opener_node, position)
                .expect("index in range")
            {
                Child::Tab(_) => 1,
                Child::Collection(sub) => self.strip.recursive_tab_count(sub),
            };
            if opener_flat + tab_count == unpinned_index {
                return Some((opener_node, local_index));
            }
            if opener_flat + tab_count > unpinned_index {
                // Opening an empty new tab can hand us an index that does
                // not land on a subtree boundary; fall back instead of
                // asserting.
                return None;
            }
        }
        None
    }

    fn notify_add(&self, id: TreeNodeId) {
        if let Some(model) = self.model.upgrade() {
            model.write().add_tree_tab_node(id);
        }
    }

    fn notify_remove(&self, id: TreeNodeId) {
        if self.in_destruction {
            return;
        }
        if let Some(model) = self.model.upgrade() {
            model.write().remove_tree_tab_node(id);
        }
    }
}

impl Drop for TreeTabStripDelegate {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct RecordingModel {
        added: Vec<TreeNodeId>,
        removed: Vec<TreeNodeId>,
    }

    impl TreeTabModel for RecordingModel {
        fn add_tree_tab_node(&mut self, id: TreeNodeId) {
            self.added.push(id);
        }

        fn remove_tree_tab_node(&mut self, id: TreeNodeId) {
            self.removed.push(id);
        }
    }

    fn delegate_over(
        strip: TabStrip,
    ) -> (TreeTabStripDelegate, Arc<RwLock<RecordingModel>>) {
        let model = Arc::new(RwLock::new(RecordingModel::default()));
        let sink: Arc<RwLock<dyn TreeTabModel>> = model.clone();
        let delegate = TreeTabStripDelegate::new(strip, Arc::downgrade(&sink));
        (delegate, model)
    }

    fn seeded_strip(n: usize) -> (TabStrip, Vec<TabId>) {
        let mut strip = TabStrip::new();
        let root = strip.unpinned_root();
        let tabs: Vec<_> = (0..n)
            .map(|i| {
                let tab = strip.register_tab(Tab::new());
                strip.add_tab(root, tab, i).unwrap();
                tab
            })
            .collect();
        (strip, tabs)
    }

    #[test]
    fn construction_wraps_each_leaf_in_a_node() {
        let (strip, tabs) = seeded_strip(3);
        let (delegate, model) = delegate_over(strip);

        let root = delegate.strip().unpinned_root();
        assert_eq!(delegate.strip().flat_tabs(root), tabs);
        assert_eq!(model.read().added.len(), 3);
        for tab in &tabs {
            let parent = delegate.strip().tab_parent(*tab).unwrap();
            assert_eq!(delegate.strip().kind(parent), CollectionKind::TreeNode);
            assert_eq!(delegate.strip().current_tab(parent), Some(*tab));
        }
    }

    #[test]
    fn construction_descends_into_groups() {
        let mut strip = TabStrip::new();
        let root = strip.unpinned_root();
        let group = strip.create_collection(CollectionKind::Group);
        let a = strip.register_tab(Tab::new());
        let b = strip.register_tab(Tab::new());
        strip.add_tab(root, a, 0).unwrap();
        strip.add_collection(root, group, 1).unwrap();
        strip.add_tab(group, b, 0).unwrap();

        let (delegate, model) = delegate_over(strip);
        let strip = delegate.strip();
        assert_eq!(strip.flat_tabs(strip.unpinned_root()), vec![a, b]);
        // b's node lives inside the group, which stayed in place.
        let node = strip.tab_parent(b).unwrap();
        assert_eq!(strip.kind(node), CollectionKind::TreeNode);
        assert_eq!(strip.parent_of(node), Some(group));
        assert_eq!(model.read().added.len(), 2);
    }

    #[test]
    fn opener_walk_skips_misaligned_indices() {
        let (strip, tabs) = seeded_strip(3);
        let (mut delegate, _model) = delegate_over(strip);

        // Place d under b so b's node spans flat indices 1..3.
        let d = delegate.register_tab(Tab::new());
        delegate.add_tab_recursive(d, 2, None, false, Some(tabs[1])).unwrap();

        // Opener a cannot absorb an index inside b's hierarchy.
        assert_eq!(delegate.opener_insert_point(tabs[0], 2), None);
        // Opener b can: local index 1 is right after its current tab.
        let b_node = delegate.strip().tab_parent(tabs[1]).unwrap();
        assert_eq!(delegate.opener_insert_point(tabs[1], 2), Some((b_node, 1)));
        // An index before the opener can never match.
        assert_eq!(delegate.opener_insert_point(tabs[1], 1), None);
    }

    #[test]
    fn hierarchy_predicates_walk_to_the_top() {
        let (strip, tabs) = seeded_strip(2);
        let (mut delegate, _model) = delegate_over(strip);

        let c = delegate.register_tab(Tab::new());
        delegate.add_tab_recursive(c, 1, None, false, Some(tabs[0])).unwrap();

        let a_node = delegate.strip().tab_parent(tabs[0]).unwrap();
        let c_node = delegate.strip().tab_parent(c).unwrap();
        let b_node = delegate.strip().tab_parent(tabs[1]).unwrap();

        assert_eq!(delegate.root_tree_node_of_tab(c), Some(a_node));
        assert!(delegate.are_in_same_tree_hierarchy(a_node, c_node));
        assert!(!delegate.are_in_same_tree_hierarchy(a_node, b_node));
        // Non-tree-node collections are never in a hierarchy.
        let unpinned = delegate.strip().unpinned_root();
        assert!(!delegate.are_in_same_tree_hierarchy(unpinned, a_node));
    }

    #[test]
    fn teardown_suppresses_remove_notifications() {
        let (strip, tabs) = seeded_strip(2);
        let (delegate, model) = delegate_over(strip);

        let strip = delegate.into_strip();
        let root = strip.unpinned_root();
        assert_eq!(strip.flat_tabs(root), tabs);
        assert_eq!(strip.child_count(root), 2);
        assert_eq!(model.read().added.len(), 2);
        assert!(model.read().removed.is_empty());
    }

    #[test]
    fn dropped_model_is_tolerated() {
        let (strip, _tabs) = seeded_strip(2);
        let (mut delegate, model) = delegate_over(strip);
        drop(model);

        let tab = delegate.register_tab(Tab::new());
        delegate.add_tab_recursive(tab, 2, None, false, None).unwrap();
        assert_eq!(delegate.remove_tab_at_recursive(2), Ok(tab));
    }
}
