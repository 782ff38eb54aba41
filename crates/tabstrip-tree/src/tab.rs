//! Tab handles and payloads.
//!
//! A [`Tab`] is the leaf unit of the tab-strip forest: an opaque payload the
//! caller creates and eventually discards. While attached it is owned by
//! exactly one collection; the [`TabId`] handle stays valid across structural
//! moves.

use slotmap::new_key_type;

use crate::collection::CollectionId;

new_key_type! {
    /// A unique, stable identifier for a tab payload.
    ///
    /// `TabId`s remain valid as the tab moves between collections. They
    /// become invalid when the caller discards the tab after removal.
    pub struct TabId;
}

impl TabId {
    /// Convert the TabId to a raw u64 value for interop with host systems.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a TabId from a raw u64 value.
    ///
    /// This does not check that the id refers to a live tab.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// An opaque identifier for a tab group, assigned by the outer system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabGroupId(u64);

impl TabGroupId {
    /// Creates a group id from a raw value.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this group id.
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// A tab payload: the leaf unit of the tab-strip forest.
///
/// The strip records only the structural attributes the tree logic needs;
/// everything else about a page lives with the caller, keyed by [`TabId`].
#[derive(Debug, Clone, Default)]
pub struct Tab {
    pinned: bool,
    group: Option<TabGroupId>,
    opener: Option<TabId>,
    pub(crate) parent: Option<CollectionId>,
}

impl Tab {
    /// Creates a new unpinned, ungrouped tab.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pinned flag.
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Sets the group this tab belongs to.
    pub fn with_group(mut self, group: TabGroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Sets the tab that caused this tab to be created.
    pub fn with_opener(mut self, opener: TabId) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Whether this tab is pinned. Pinned tabs bypass the tree logic.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// The group this tab belongs to, if any.
    pub fn group(&self) -> Option<TabGroupId> {
        self.group
    }

    /// The tab that opened this one, if any.
    pub fn opener(&self) -> Option<TabId> {
        self.opener
    }

    /// The collection that currently owns this tab, if attached.
    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub(crate) fn set_group(&mut self, group: Option<TabGroupId>) {
        self.group = group;
    }

    pub(crate) fn set_opener(&mut self, opener: Option<TabId>) {
        self.opener = opener;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_attributes() {
        let opener = TabId::from_raw(TabId::default().as_raw());
        let tab = Tab::new()
            .with_pinned(true)
            .with_group(TabGroupId::from_raw(7))
            .with_opener(opener);

        assert!(tab.is_pinned());
        assert_eq!(tab.group(), Some(TabGroupId::from_raw(7)));
        assert_eq!(tab.opener(), Some(opener));
        assert_eq!(tab.parent(), None);
    }

    #[test]
    fn group_id_raw_round_trip() {
        let id = TabGroupId::from_raw(42);
        assert_eq!(TabGroupId::from_raw(id.as_raw()), id);
    }
}
