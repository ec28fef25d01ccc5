//! XForms elements and their default actions
//!
//! Each element kind declares, at type-definition time, the default actions
//! it provides as a static table of (event type, handler) pairs. Wiring an
//! element walks that table and registers one default action per entry on
//! the element's node.

use std::sync::{Arc, Mutex};

use log::info;

use crate::document::{NodeId, NodeTree};
use crate::events::{DomEvent, EventError, EventFlowManager, EventResult, Listener};

/// Handler function for an element's default action
pub type ActionHandler = fn(&XFormsElement, &mut DomEvent<NodeId>) -> anyhow::Result<()>;

/// One entry of an element kind's default action table
#[derive(Debug, Clone, Copy)]
pub struct DefaultAction {
    pub event_type: &'static str,
    pub handler: ActionHandler,
}

const fn action(event_type: &'static str, handler: ActionHandler) -> DefaultAction {
    DefaultAction {
        event_type,
        handler,
    }
}

static MODEL_ACTIONS: &[DefaultAction] = &[
    action("xforms-model-construct", record_default_action),
    action("xforms-model-construct-done", record_default_action),
    action("xforms-rebuild", record_default_action),
    action("xforms-recalculate", record_default_action),
    action("xforms-revalidate", record_default_action),
    action("xforms-refresh", record_default_action),
    action("xforms-reset", record_default_action),
];

/// The XForms element types the engine wires into the event flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Model,
    Instance,
    Submission,
    Bind,
}

impl ElementKind {
    /// Local name of the element in the XForms namespace
    pub fn local_name(self) -> &'static str {
        match self {
            ElementKind::Model => "model",
            ElementKind::Instance => "instance",
            ElementKind::Submission => "submission",
            ElementKind::Bind => "bind",
        }
    }

    /// The default actions elements of this kind provide
    pub fn default_actions(self) -> &'static [DefaultAction] {
        match self {
            ElementKind::Model => MODEL_ACTIONS,
            ElementKind::Instance | ElementKind::Submission | ElementKind::Bind => &[],
        }
    }
}

/// An XForms element bound to a document node
#[derive(Debug)]
pub struct XFormsElement {
    node: NodeId,
    kind: ElementKind,
    /// Event types of the default actions run so far, in order
    handled: Mutex<Vec<String>>,
}

impl XFormsElement {
    pub fn new(node: NodeId, kind: ElementKind) -> Arc<Self> {
        Arc::new(Self {
            node,
            kind,
            handled: Mutex::new(Vec::new()),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Register this element's default actions with `manager`
    pub fn wire<T>(self: &Arc<Self>, manager: &EventFlowManager<T>) -> EventResult<()>
    where
        T: NodeTree<Node = NodeId>,
    {
        for entry in self.kind.default_actions() {
            let element = Arc::clone(self);
            let handler = entry.handler;
            manager.set_default_action(
                &self.node,
                entry.event_type,
                Listener::new(move |event| handler(&element, event)),
            )?;
        }
        Ok(())
    }

    /// Event types of the default actions this element has run
    pub fn handled_events(&self) -> EventResult<Vec<String>> {
        self.handled
            .lock()
            .map(|handled| handled.clone())
            .map_err(|e| EventError::LockError(format!("handled events of {}: {e}", self.node)))
    }
}

fn record_default_action(element: &XFormsElement, event: &mut DomEvent<NodeId>) -> anyhow::Result<()> {
    info!(
        "{:?} element at {} handling '{}'",
        element.kind,
        element.node,
        event.event_type()
    );
    element
        .handled
        .lock()
        .map_err(|_| anyhow::anyhow!("Failed to lock handled events of {}", element.node))?
        .push(event.event_type().to_string());
    Ok(())
}
