//! In-memory element nodes.

use bridge_traits::{EventTarget, HostNode};
use core_runtime::EmulatedEventTarget;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

struct NodeInner {
    tag: String,
    state: RwLock<NodeState>,
}

#[derive(Default)]
struct NodeState {
    attributes: BTreeMap<String, String>,
    children: Vec<MemoryNode>,
    parent: Weak<NodeInner>,
    events: Option<Arc<dyn EventTarget>>,
}

/// Handle to an in-memory element.
///
/// Clones share the same underlying node.
#[derive(Clone)]
pub struct MemoryNode {
    inner: Arc<NodeInner>,
}

impl MemoryNode {
    /// Create a detached element. Tag names are stored lowercase.
    pub fn element(tag: &str) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                tag: tag.to_ascii_lowercase(),
                state: RwLock::new(NodeState::default()),
            }),
        }
    }

    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(self, child: MemoryNode) -> Self {
        self.append(child);
        self
    }

    /// Give the node a native event target.
    pub fn with_native_events(self) -> Self {
        self.inner.state.write().events = Some(Arc::new(EmulatedEventTarget::new()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// Whether `self` and `other` are handles to the same node.
    pub fn same_node(&self, other: &MemoryNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn child_nodes(&self) -> Vec<MemoryNode> {
        self.inner.state.read().children.clone()
    }

    pub fn parent_node(&self) -> Option<MemoryNode> {
        self.inner
            .state
            .read()
            .parent
            .upgrade()
            .map(|inner| MemoryNode { inner })
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &MemoryNode) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.same_node(self) {
                return true;
            }
            current = node.parent_node();
        }
        false
    }

    /// Depth-first search of this subtree by id.
    pub fn find_by_id(&self, id: &str) -> Option<MemoryNode> {
        if self.get_attribute("id").as_deref() == Some(id) {
            return Some(self.clone());
        }
        self.child_nodes()
            .iter()
            .find_map(|child| child.find_by_id(id))
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.inner.state.read().attributes.get(name).cloned()
    }

    /// Remove the node from its parent, if any.
    pub fn detach(&self) {
        let parent = std::mem::take(&mut self.inner.state.write().parent);
        if let Some(parent) = parent.upgrade() {
            parent
                .state
                .write()
                .children
                .retain(|child| !child.same_node(self));
        }
    }

    /// Move `child` to the end of this node's children.
    pub(crate) fn append(&self, child: MemoryNode) {
        child.detach();
        child.inner.state.write().parent = Arc::downgrade(&self.inner);
        self.inner.state.write().children.push(child);
    }

    /// Move `node` into this node's children, before `reference`.
    ///
    /// Appends when `reference` is not a child of this node.
    pub(crate) fn insert_child_before(&self, node: MemoryNode, reference: &MemoryNode) {
        node.detach();
        node.inner.state.write().parent = Arc::downgrade(&self.inner);

        let mut state = self.inner.state.write();
        let index = state
            .children
            .iter()
            .position(|child| child.same_node(reference))
            .unwrap_or(state.children.len());
        state.children.insert(index, node);
    }

    /// Serialize the subtree as markup, attributes in name order.
    pub fn to_markup(&self) -> String {
        let state = self.inner.state.read();
        let attributes: String = state
            .attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, value))
            .collect();
        let children: String = state.children.iter().map(MemoryNode::to_markup).collect();
        format!("<{tag}{attributes}>{children}</{tag}>", tag = self.inner.tag)
    }
}

impl HostNode for MemoryNode {
    fn id(&self) -> Option<String> {
        self.get_attribute("id")
    }

    fn set_id(&self, id: &str) {
        self.set_attribute("id", id);
    }

    fn node_name(&self) -> String {
        self.inner.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .state
            .write()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn children(&self) -> Vec<Arc<dyn HostNode>> {
        self.child_nodes()
            .into_iter()
            .map(|child| Arc::new(child) as Arc<dyn HostNode>)
            .collect()
    }

    fn parent(&self) -> Option<Arc<dyn HostNode>> {
        self.parent_node()
            .map(|parent| Arc::new(parent) as Arc<dyn HostNode>)
    }

    fn event_target(&self) -> Option<Arc<dyn EventTarget>> {
        self.inner.state.read().events.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("MemoryNode")
            .field("tag", &self.inner.tag)
            .field("attributes", &state.attributes)
            .field("children", &state.children.len())
            .finish()
    }
}
