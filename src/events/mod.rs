//! DOM-style event flow for document trees
//!
//! The event system provides:
//! - Event kinds with fixed bubbling and cancelation flags, plus the XForms kind table
//! - Event instances carrying target, phase and cancel/stop state through a dispatch
//! - Listener handles compared by identity
//! - The flow manager running capture, target and bubble phases with default actions

mod error;
pub mod event;
pub mod kind;
mod listener;
pub mod manager;

pub use error::{EventError, EventResult};
pub use event::{DomEvent, EventPhase, EventSnapshot};
pub use kind::{EventCategory, EventKind, EventKindBuilder, EVENT_KINDS};
pub use listener::Listener;
pub use manager::EventFlowManager;
