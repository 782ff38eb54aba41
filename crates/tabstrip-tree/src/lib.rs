//! Tree-structured tab-strip collection engine.
//!
//! `tabstrip-tree` keeps an ordered sequence of browser tabs organized as a
//! forest of parent/child groupings while preserving a linear visible index.
//! The host owns a flat [`TabStrip`]; wrapping it in a
//! [`TreeTabStripDelegate`] turns the ordinary index-based mutations into
//! tree-preserving structural edits and reports every tree node's lifecycle
//! to a [`TreeTabModel`] sink.
//!
//! # Key Types
//!
//! - [`TabStrip`] - The flat container: an arena of tabs and collections
//!   with `Pinned` and `Unpinned` roots
//! - [`TreeTabStripDelegate`] - Translates flat inserts/removes/moves into
//!   tree edits
//! - [`TreeTabModel`] - Two-method notification sink for node add/remove
//! - [`TabId`] / [`CollectionId`] / [`TreeNodeId`] - Stable identities for
//!   tabs, collections and tree nodes
//!
//! # Invariants
//!
//! While a delegate is alive and not being torn down:
//!
//! - every unpinned tab is the current tab of exactly one tree node;
//! - the recursive in-order traversal of the unpinned root equals the
//!   visible flat sequence of unpinned tabs;
//! - pinned tabs never appear inside a tree node;
//! - every live tree node is registered with the model, and vice versa.
//!
//! # Threading
//!
//! The engine runs on a single cooperative UI thread. Operations are
//! synchronous and atomic from the caller's view; callers serialize
//! structural edits externally.
//!
//! # Logging
//!
//! Instrumented with the `tracing` crate. Container mutations log under the
//! `tabstrip_tree::collection` target and structural operations under
//! `tabstrip_tree::delegate`; install a subscriber (for example
//! `tracing_subscriber::fmt::init()`) to see them.

pub mod collection;
pub mod delegate;
pub mod error;
pub mod model;
pub mod tab;

pub use collection::{Child, CollectionId, CollectionKind, TabStrip};
pub use delegate::TreeTabStripDelegate;
pub use error::{Result, StripError};
pub use model::{TreeNodeId, TreeTabModel};
pub use tab::{Tab, TabGroupId, TabId};
