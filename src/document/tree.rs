//! Arena-backed document tree
//!
//! Nodes are addressed by [`NodeId`]. Node `0` is the document root, which
//! carries no element; every other node is an element appended under an
//! existing parent, so the structure is always a proper tree.

use std::fmt;

use crate::document::{NodeTree, TreeError, TreeResult};

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name and namespace of an element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    local_name: String,
    namespace: Option<String>,
}

impl Element {
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    element: Option<Element>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of element nodes under a single document root
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only its root
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                element: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document root
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of element nodes; the root is not counted
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Check if the document holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an element without a namespace as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, local_name: &str) -> TreeResult<NodeId> {
        self.insert(parent, local_name, None)
    }

    /// Append a namespaced element as the last child of `parent`
    pub fn append_element_ns(
        &mut self,
        parent: NodeId,
        namespace: &str,
        local_name: &str,
    ) -> TreeResult<NodeId> {
        self.insert(parent, local_name, Some(namespace.to_string()))
    }

    fn insert(
        &mut self,
        parent: NodeId,
        local_name: &str,
        namespace: Option<String>,
    ) -> TreeResult<NodeId> {
        self.node(parent)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            element: Some(Element {
                local_name: local_name.to_string(),
                namespace,
            }),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);

        Ok(id)
    }

    fn node(&self, id: NodeId) -> TreeResult<&NodeData> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
    }

    /// Check if a node belongs to this document
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// The parent of a node, `None` for the root
    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// The children of a node in document order
    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// The element stored at a node, `None` for the root or unknown nodes
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0).and_then(|n| n.element.as_ref())
    }

    /// All elements with the given namespace and local name, in document order
    pub fn elements_named(&self, namespace: Option<&str>, local_name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            let data = &self.nodes[id.0];
            if let Some(element) = &data.element {
                if element.local_name == local_name && element.namespace.as_deref() == namespace {
                    found.push(id);
                }
            }
            stack.extend(data.children.iter().rev().copied());
        }

        found
    }
}

impl NodeTree for Document {
    type Node = NodeId;

    fn parents(&self, node: &NodeId) -> TreeResult<Vec<NodeId>> {
        Ok(self.parent(*node)?.into_iter().collect())
    }
}
