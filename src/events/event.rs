//! The event instance handed to listeners during a dispatch

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::events::{EventKind, EventResult};

/// Specifies the event propagation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Event is traveling down from the root towards the target's parent
    Capturing = 1,

    /// Event is at the target node
    AtTarget = 2,

    /// Event is traveling up from the target's parent to the root
    Bubbling = 3,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventPhase::Capturing => "capturing",
            EventPhase::AtTarget => "at-target",
            EventPhase::Bubbling => "bubbling",
        };
        f.write_str(name)
    }
}

/// One occurrence of an event, owned by the caller and mutated by the
/// manager while it is being dispatched
///
/// Listeners only get to call [`DomEvent::prevent_default`] and
/// [`DomEvent::stop_propagation`]; everything else is written by the
/// [`EventFlowManager`](crate::events::EventFlowManager).
#[derive(Debug, Clone)]
pub struct DomEvent<N> {
    kind: EventKind,
    pub(crate) target: Option<N>,
    pub(crate) current_target: Option<N>,
    pub(crate) event_phase: Option<EventPhase>,
    pub(crate) timestamp: Option<SystemTime>,
    canceled: bool,
    stopped: bool,
}

impl<N> DomEvent<N> {
    /// Create a fresh, undispatched event of the given kind
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            current_target: None,
            event_phase: None,
            timestamp: None,
            canceled: false,
            stopped: false,
        }
    }

    /// Create an event for one of the known XForms event types
    pub fn of_type(event_type: &str) -> EventResult<Self> {
        EventKind::lookup(event_type).map(Self::new)
    }

    /// The kind this event was created from
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The event type identifier
    pub fn event_type(&self) -> &str {
        self.kind.event_type()
    }

    /// Whether the event takes part in the bubbling phase
    pub fn can_bubble(&self) -> bool {
        self.kind.can_bubble()
    }

    /// Whether `prevent_default` can cancel the default action
    pub fn cancelable(&self) -> bool {
        self.kind.cancelable()
    }

    /// The node the event was dispatched to
    pub fn target(&self) -> Option<&N> {
        self.target.as_ref()
    }

    /// The node whose listeners are currently running
    pub fn current_target(&self) -> Option<&N> {
        self.current_target.as_ref()
    }

    /// The phase the dispatch is in, `None` before dispatch
    pub fn event_phase(&self) -> Option<EventPhase> {
        self.event_phase
    }

    /// When the dispatch started
    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    /// Cancel the default action. Has no effect unless the kind is cancelable.
    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.canceled = true;
        }
    }

    /// Stop any further node visits for this dispatch
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Check if the default action was canceled
    pub fn is_default_prevented(&self) -> bool {
        self.canceled
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

impl<N: fmt::Debug> DomEvent<N> {
    /// Capture the event's classification and dispatch state
    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            event_type: self.kind.event_type().to_string(),
            can_bubble: self.kind.can_bubble(),
            cancelable: self.kind.cancelable(),
            target: self.target.as_ref().map(|n| format!("{n:?}")),
            current_target: self.current_target.as_ref().map(|n| format!("{n:?}")),
            event_phase: self.event_phase,
            timestamp_ms: self.timestamp.and_then(|t| {
                t.duration_since(UNIX_EPOCH)
                    .ok()
                    .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            }),
            canceled: self.canceled,
            stopped: self.stopped,
        }
    }
}

/// Serializable view of a [`DomEvent`], suitable for logs and traces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub event_type: String,
    pub can_bubble: bool,
    pub cancelable: bool,
    pub target: Option<String>,
    pub current_target: Option<String>,
    pub event_phase: Option<EventPhase>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: Option<u64>,
    pub canceled: bool,
    pub stopped: bool,
}

impl fmt::Display for EventSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} can_bubble={} cancelable={} target={} current={} canceled={} stopped={}>",
            self.event_type,
            self.can_bubble,
            self.cancelable,
            self.target.as_deref().unwrap_or("-"),
            self.current_target.as_deref().unwrap_or("-"),
            self.canceled,
            self.stopped
        )
    }
}
