//! XForms engine: wires the elements of a document into its event flow
//!
//! The engine owns the document and the [`EventFlowManager`] for it. On
//! construction it finds every `xforms:model` element and registers the
//! model's default actions. Model processing itself is not performed here.

use std::sync::Arc;

use log::debug;

use crate::config::FlowConfig;
use crate::document::{Document, NodeId};
use crate::events::{DomEvent, EventFlowManager, EventResult};

mod element;

pub use element::{ActionHandler, DefaultAction, ElementKind, XFormsElement};

/// The XForms namespace URI
pub const XFORMS_NAMESPACE: &str = "http://www.w3.org/2002/xforms";

/// The XML Events namespace URI
pub const XML_EVENTS_NAMESPACE: &str = "http://www.w3.org/2001/xml-events";

/// Drives an XForms document
///
/// The document is assumed not to change once the engine is built.
#[derive(Debug)]
pub struct XFormsEngine {
    manager: EventFlowManager<Arc<Document>>,
    models: Vec<Arc<XFormsElement>>,
}

impl XFormsEngine {
    /// Build an engine with the default flow configuration
    pub fn new(document: Document) -> EventResult<Self> {
        Self::with_config(document, FlowConfig::default())
    }

    /// Build an engine with an explicit flow configuration
    pub fn with_config(document: Document, config: FlowConfig) -> EventResult<Self> {
        let manager = EventFlowManager::with_config(Arc::new(document), config)?;

        let mut models = Vec::new();
        for node in manager
            .tree()
            .elements_named(Some(XFORMS_NAMESPACE), ElementKind::Model.local_name())
        {
            let model = XFormsElement::new(node, ElementKind::Model);
            model.wire(&manager)?;
            models.push(model);
        }
        debug!("XForms engine set up with {} model(s)", models.len());

        Ok(Self { manager, models })
    }

    pub fn document(&self) -> &Document {
        self.manager.tree()
    }

    pub fn manager(&self) -> &EventFlowManager<Arc<Document>> {
        &self.manager
    }

    /// Model elements in document order
    pub fn models(&self) -> &[Arc<XFormsElement>] {
        &self.models
    }

    /// The model element bound to `node`, if any
    pub fn model(&self, node: NodeId) -> Option<&Arc<XFormsElement>> {
        self.models.iter().find(|model| model.node() == node)
    }

    /// Dispatch a known XForms event to `target` and return it once the
    /// flow has finished
    pub fn dispatch(&self, target: NodeId, event_type: &str) -> EventResult<DomEvent<NodeId>> {
        let mut event = DomEvent::of_type(event_type)?;
        self.manager.dispatch_event(&target, &mut event)?;
        Ok(event)
    }
}
