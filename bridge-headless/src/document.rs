//! In-memory host document.

use bridge_traits::{
    error::{BridgeError, Result},
    HostDocument, HostNode,
};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::node::MemoryNode;

/// Document holding a tree of [`MemoryNode`]s under a `<body>` root.
///
/// Only nodes attached to the tree are found by id, matching browser
/// `getElementById`.
pub struct MemoryDocument {
    body: MemoryNode,
    location: Option<String>,
    native_events: bool,
}

impl MemoryDocument {
    pub fn new(location: Option<&str>) -> Self {
        Self {
            body: MemoryNode::element("body"),
            location: location.map(str::to_string),
            native_events: false,
        }
    }

    /// Give every element created by this document a native event target.
    pub fn with_native_events(mut self, enabled: bool) -> Self {
        self.native_events = enabled;
        self
    }

    pub fn body(&self) -> &MemoryNode {
        &self.body
    }

    /// Append `node` to `<body>` and return a handle to it.
    pub fn append_to_body(&self, node: MemoryNode) -> MemoryNode {
        self.body.append(node.clone());
        node
    }

    /// Attached node with `id`, as a concrete handle.
    pub fn find(&self, id: &str) -> Option<MemoryNode> {
        self.body.find_by_id(id)
    }

    fn resolve(node: &Arc<dyn HostNode>) -> Result<MemoryNode> {
        node.as_any()
            .downcast_ref::<MemoryNode>()
            .cloned()
            .ok_or_else(|| {
                BridgeError::InvalidOperation("node does not belong to a memory document".to_string())
            })
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HostDocument for MemoryDocument {
    fn get_element_by_id(&self, id: &str) -> Option<Arc<dyn HostNode>> {
        self.find(id).map(|node| Arc::new(node) as Arc<dyn HostNode>)
    }

    fn create_element(&self, tag_name: &str) -> Result<Arc<dyn HostNode>> {
        if tag_name.is_empty() {
            return Err(BridgeError::InvalidOperation(
                "tag name cannot be empty".to_string(),
            ));
        }

        let node = MemoryNode::element(tag_name);
        let node = if self.native_events {
            node.with_native_events()
        } else {
            node
        };
        trace!(tag = tag_name, "Created element");
        Ok(Arc::new(node))
    }

    fn insert_before(&self, node: &Arc<dyn HostNode>, reference: &Arc<dyn HostNode>) -> Result<()> {
        let node = Self::resolve(node)?;
        let reference = Self::resolve(reference)?;

        let parent = reference.parent_node().ok_or_else(|| {
            BridgeError::InvalidOperation("reference node has no parent".to_string())
        })?;
        if node.contains(&parent) {
            return Err(BridgeError::InvalidOperation(
                "cannot insert a node into its own subtree".to_string(),
            ));
        }

        parent.insert_child_before(node, &reference);
        Ok(())
    }

    fn append_child(&self, parent: &Arc<dyn HostNode>, child: &Arc<dyn HostNode>) -> Result<()> {
        let parent = Self::resolve(parent)?;
        let child = Self::resolve(child)?;

        if child.contains(&parent) {
            return Err(BridgeError::InvalidOperation(
                "cannot append a node into its own subtree".to_string(),
            ));
        }

        parent.append(child);
        Ok(())
    }

    fn location(&self) -> Option<String> {
        self.location.clone()
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("location", &self.location)
            .field("native_events", &self.native_events)
            .field("body", &self.body)
            .finish()
    }
}
