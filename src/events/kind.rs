//! Event kinds: the fixed (type, can_bubble, cancelable) classification
//!
//! Every event carries a kind. Kinds for the XForms event set live in the
//! static [`EVENT_KINDS`] table; hosts can define their own with
//! [`EventKind::custom`] or, when the flags come from elsewhere, with
//! [`EventKindBuilder`], which refuses to produce a kind with unset fields.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::{EventError, EventResult};

use EventCategory::{Error, Initialization, Interaction, Notification};

/// Broad grouping of event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Model construction and teardown
    Initialization,
    /// Requests to the processor (rebuild, submit, focus, ...)
    Interaction,
    /// Notifications about state changes
    Notification,
    /// Error indications
    Error,
    /// Host-defined kinds
    Custom,
}

/// Classification of an event, fixed for its whole lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKind {
    event_type: Cow<'static, str>,
    can_bubble: bool,
    cancelable: bool,
    category: EventCategory,
}

impl EventKind {
    const fn table(
        event_type: &'static str,
        category: EventCategory,
        can_bubble: bool,
        cancelable: bool,
    ) -> Self {
        Self {
            event_type: Cow::Borrowed(event_type),
            can_bubble,
            cancelable,
            category,
        }
    }

    /// Define a host-specific event kind
    pub fn custom(
        event_type: impl Into<Cow<'static, str>>,
        can_bubble: bool,
        cancelable: bool,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            can_bubble,
            cancelable,
            category: EventCategory::Custom,
        }
    }

    /// Start building a kind whose fields are filled in piecemeal
    pub fn builder() -> EventKindBuilder {
        EventKindBuilder::default()
    }

    /// Look up one of the known XForms event kinds by type name
    pub fn lookup(event_type: &str) -> EventResult<Self> {
        EVENT_KINDS
            .iter()
            .find(|kind| kind.event_type == event_type)
            .cloned()
            .ok_or_else(|| EventError::Configuration(format!("unknown event type '{event_type}'")))
    }

    /// The event type identifier
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Whether events of this kind take part in the bubbling phase
    pub fn can_bubble(&self) -> bool {
        self.can_bubble
    }

    /// Whether `prevent_default` has any effect on events of this kind
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// The group this kind belongs to
    pub fn category(&self) -> EventCategory {
        self.category
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (bubbles={}, cancelable={})",
            self.event_type, self.can_bubble, self.cancelable
        )
    }
}

/// Builder for event kinds assembled from partial information
///
/// All of `event_type`, `can_bubble` and `cancelable` must be given before
/// [`EventKindBuilder::build`] succeeds.
#[derive(Debug, Clone, Default)]
pub struct EventKindBuilder {
    event_type: Option<Cow<'static, str>>,
    can_bubble: Option<bool>,
    cancelable: Option<bool>,
    category: Option<EventCategory>,
}

impl EventKindBuilder {
    /// Set the event type identifier
    pub fn event_type(mut self, event_type: impl Into<Cow<'static, str>>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Set whether events of the kind bubble
    pub fn can_bubble(mut self, can_bubble: bool) -> Self {
        self.can_bubble = Some(can_bubble);
        self
    }

    /// Set whether events of the kind can be canceled
    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = Some(cancelable);
        self
    }

    /// Defaults to [`EventCategory::Custom`] when not set
    pub fn category(mut self, category: EventCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Finish the kind, failing if any classification field is missing
    pub fn build(self) -> EventResult<EventKind> {
        let event_type = self
            .event_type
            .ok_or_else(|| EventError::Configuration("event kind has no event type".to_string()))?;
        let can_bubble = self.can_bubble.ok_or_else(|| {
            EventError::Configuration(format!("event kind '{event_type}' has no can_bubble flag"))
        })?;
        let cancelable = self.cancelable.ok_or_else(|| {
            EventError::Configuration(format!("event kind '{event_type}' has no cancelable flag"))
        })?;

        Ok(EventKind {
            event_type,
            can_bubble,
            cancelable,
            category: self.category.unwrap_or(EventCategory::Custom),
        })
    }
}

/// Every XForms event kind the processor knows about
pub static EVENT_KINDS: [EventKind; 43] = [
    // Initialization
    EventKind::table("xforms-model-construct", Initialization, true, false),
    EventKind::table("xforms-model-construct-done", Initialization, true, false),
    EventKind::table("xforms-ready", Initialization, true, false),
    EventKind::table("xforms-model-destruct", Initialization, true, false),
    // Interaction
    EventKind::table("xforms-rebuild", Interaction, true, true),
    EventKind::table("xforms-recalculate", Interaction, true, true),
    EventKind::table("xforms-revalidate", Interaction, true, true),
    EventKind::table("xforms-refresh", Interaction, true, true),
    EventKind::table("xforms-reset", Interaction, true, true),
    EventKind::table("xforms-previous", Interaction, false, true),
    EventKind::table("xforms-next", Interaction, false, true),
    EventKind::table("xforms-focus", Interaction, false, true),
    EventKind::table("xforms-help", Interaction, true, true),
    EventKind::table("xforms-hint", Interaction, true, true),
    EventKind::table("xforms-submit", Interaction, true, true),
    EventKind::table("xforms-submit-serialize", Interaction, true, false),
    // Notification
    EventKind::table("xforms-insert", Notification, true, false),
    EventKind::table("xforms-delete", Notification, true, false),
    EventKind::table("xforms-value-change", Notification, true, false),
    EventKind::table("xforms-valid", Notification, true, false),
    EventKind::table("xforms-invalid", Notification, true, false),
    EventKind::table("xforms-readonly", Notification, true, false),
    EventKind::table("xforms-readwrite", Notification, true, false),
    EventKind::table("xforms-required", Notification, true, false),
    EventKind::table("xforms-optional", Notification, true, false),
    EventKind::table("xforms-enabled", Notification, true, false),
    EventKind::table("xforms-disabled", Notification, true, false),
    EventKind::table("DOMActivate", Notification, true, true),
    EventKind::table("DOMFocusIn", Notification, true, false),
    EventKind::table("DOMFocusOut", Notification, true, false),
    EventKind::table("xforms-select", Notification, true, false),
    EventKind::table("xforms-deselect", Notification, true, false),
    EventKind::table("xforms-in-range", Notification, true, false),
    EventKind::table("xforms-out-of-range", Notification, true, false),
    EventKind::table("xforms-scroll-first", Notification, true, false),
    EventKind::table("xforms-scroll-last", Notification, true, false),
    EventKind::table("xforms-submit-done", Notification, true, false),
    // Error indications
    EventKind::table("xforms-binding-exception", Error, true, false),
    EventKind::table("xforms-compute-exception", Error, true, false),
    EventKind::table("xforms-version-exception", Error, true, false),
    EventKind::table("xforms-link-exception", Error, true, false),
    EventKind::table("xforms-output-error", Error, true, false),
    EventKind::table("xforms-submit-error", Error, true, false),
];
