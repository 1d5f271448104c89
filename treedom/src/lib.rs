//! Ordered tree arena with non-owning parent back-references.
//!
//! Nodes live in a flat arena and are addressed by copyable [`NodeId`]
//! handles. Children are owned by their parent's ordered child list; the
//! parent link is a plain index that never extends a node's lifetime.
//! Detaching a subtree makes it unreachable without destroying identity,
//! which allows a detached branch to be re-attached elsewhere or extracted
//! into an owned [`Branch`] and grafted into another tree.

pub mod iter;
pub mod tree;

pub use iter::{Ancestors, Preorder};
pub use tree::{Branch, MoveError, NodeId, Tree};
