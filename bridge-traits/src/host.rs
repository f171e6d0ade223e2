//! Host document abstractions.
//!
//! The media layer wraps an existing element of the host page. These traits
//! describe the handful of DOM capabilities it needs: looking elements up by
//! id, creating the wrapper element, moving nodes around, reading attributes,
//! and resolving relative URLs against the document location.

use std::any::Any;
use std::sync::Arc;

use crate::error::Result;
use crate::events::EventTarget;
use crate::platform::PlatformSendSync;

/// An element of the host document.
pub trait HostNode: PlatformSendSync {
    /// Element id, if one is set.
    fn id(&self) -> Option<String>;

    fn set_id(&self, id: &str);

    /// Lowercase tag name (e.g., `"video"`, `"source"`).
    fn node_name(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str);

    /// Element children, in document order.
    fn children(&self) -> Vec<Arc<dyn HostNode>>;

    fn parent(&self) -> Option<Arc<dyn HostNode>>;

    /// Native event-target contract, when the host provides one.
    fn event_target(&self) -> Option<Arc<dyn EventTarget>> {
        None
    }

    /// Concrete access for document implementations that own the node type.
    fn as_any(&self) -> &dyn Any;
}

/// The document that owns host nodes.
pub trait HostDocument: PlatformSendSync {
    fn get_element_by_id(&self, id: &str) -> Option<Arc<dyn HostNode>>;

    fn create_element(&self, tag_name: &str) -> Result<Arc<dyn HostNode>>;

    /// Insert `node` into `reference`'s parent, immediately before `reference`.
    fn insert_before(&self, node: &Arc<dyn HostNode>, reference: &Arc<dyn HostNode>)
        -> Result<()>;

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&self, parent: &Arc<dyn HostNode>, child: &Arc<dyn HostNode>) -> Result<()>;

    /// Absolute URL of the document, used to resolve relative media URLs.
    fn location(&self) -> Option<String>;
}
