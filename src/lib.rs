// Core module of the Xformlet XForms processor
pub mod config;
pub mod document;
pub mod engine;
pub mod events;

/// Version of the Xformlet crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::config::FlowConfig;
    pub use crate::document::{Document, NodeId, NodeTree};
    pub use crate::engine::{ElementKind, XFormsElement, XFormsEngine, XFORMS_NAMESPACE};
    pub use crate::events::{
        DomEvent, EventError, EventFlowManager, EventKind, EventPhase, EventResult, Listener,
    };
}
