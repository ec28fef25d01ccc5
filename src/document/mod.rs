//! Document trees that events travel through
//!
//! The event core only needs to know a node's parents. [`NodeTree`] is that
//! seam; [`Document`] is a small arena-backed implementation used by the
//! XForms engine and by tests.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

mod tree;

pub use tree::{Document, Element, NodeId};

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors specific to tree operations
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Node not found in the tree
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Parent links loop back onto a node already on the path
    #[error("Parent cycle detected at node {0}")]
    Cycle(String),

    /// The ancestor walk did not reach a root within the allowed depth
    #[error("Ancestor path exceeds maximum depth of {max_depth}")]
    TooDeep { max_depth: usize },
}

/// Provider of node identity and parent links
pub trait NodeTree {
    /// Node handle; used as a registry key by the event manager
    type Node: Clone + Eq + Hash + Debug;

    /// The parents of `node`, empty for a root. Only the first entry is
    /// followed when walking towards the root.
    fn parents(&self, node: &Self::Node) -> TreeResult<Vec<Self::Node>>;
}

impl<T: NodeTree + ?Sized> NodeTree for &T {
    type Node = T::Node;

    fn parents(&self, node: &Self::Node) -> TreeResult<Vec<Self::Node>> {
        (**self).parents(node)
    }
}

impl<T: NodeTree + ?Sized> NodeTree for Arc<T> {
    type Node = T::Node;

    fn parents(&self, node: &Self::Node) -> TreeResult<Vec<Self::Node>> {
        (**self).parents(node)
    }
}
