//! Error types for event construction and dispatch

use crate::config::ConfigError;
use crate::document::TreeError;
use crate::events::EventPhase;

/// Result type for event operations
pub type EventResult<T> = Result<T, EventError>;

/// Errors that can occur while building or dispatching events
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The event kind is incomplete or unknown
    #[error("Event configuration error: {0}")]
    Configuration(String),

    /// The flow configuration was rejected
    #[error("Invalid flow configuration: {0}")]
    Config(#[from] ConfigError),

    /// The ancestor path of the target could not be computed
    #[error("Structural precondition violated: {0}")]
    Structural(#[from] TreeError),

    /// A listener or default action failed; the dispatch was aborted
    #[error("Listener for '{event_type}' failed during {phase} phase: {source}")]
    Listener {
        event_type: String,
        phase: EventPhase,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Failed to access a registry (lock poisoned)
    #[error("Failed to access registry: {0}")]
    LockError(String),
}

impl EventError {
    pub(crate) fn listener(
        event_type: &str,
        phase: EventPhase,
        source: anyhow::Error,
    ) -> Self {
        EventError::Listener {
            event_type: event_type.to_string(),
            phase,
            source: source.into(),
        }
    }
}
