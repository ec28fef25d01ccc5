//! Listener handles and registry entries

use std::fmt;
use std::sync::Arc;

use crate::events::DomEvent;

/// Type alias for the callable behind a listener
type ListenerFn<N> = dyn Fn(&mut DomEvent<N>) -> anyhow::Result<()> + Send + Sync;

/// A cloneable handle to an event callback
///
/// Registries compare listeners by handle identity: clones of one handle are
/// equal, handles wrapping separately created closures are not. Keep a clone
/// around if you intend to remove the listener later.
pub struct Listener<N> {
    callback: Arc<ListenerFn<N>>,
}

impl<N> Listener<N> {
    /// Wrap a callback in a new listener handle
    pub fn new(callback: impl Fn(&mut DomEvent<N>) -> anyhow::Result<()> + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback on an event
    pub fn call(&self, event: &mut DomEvent<N>) -> anyhow::Result<()> {
        (self.callback)(event)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.callback) as *const ()
    }
}

impl<N> Clone for Listener<N> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<N> PartialEq for Listener<N> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<N> Eq for Listener<N> {}

impl<N> fmt::Debug for Listener<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.addr()).finish()
    }
}

/// A registered (event type, listener, capture) tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListenerEntry<N> {
    pub(crate) event_type: String,
    pub(crate) listener: Listener<N>,
    pub(crate) capture: bool,
}

/// A registered (event type, default action) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionEntry<N> {
    pub(crate) event_type: String,
    pub(crate) listener: Listener<N>,
}
