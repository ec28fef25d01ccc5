//! Event flow manager: listener registries and the three-phase dispatch
//!
//! This module provides:
//! - A listener registry keyed by node, with capture and bubble registrations
//! - A separate default-action registry, consulted once per dispatch at the target
//! - Dispatch through capturing, at-target and bubbling phases
//!
//! ## Dispatch order
//!
//! The ancestor path is computed once, before any listener runs. Capturing
//! visits it root first, stopping at the target's parent. The target then
//! receives the event and, unless it was canceled, its default actions run.
//! Bubbling visits the path again, parent first, if the event kind bubbles.
//!
//! Capture listeners only fire on strict ancestors during capturing. Bubble
//! listeners fire at the target and on ancestors during bubbling.
//!
//! ## Re-entrancy
//!
//! Listeners may add or remove registrations, or dispatch other events, while
//! a dispatch is running. A node's listeners are read when that node is
//! visited, so changes for nodes not yet reached take effect; the path itself
//! never changes mid-dispatch. Registry locks are never held while a
//! callback runs.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::SystemTime;

use log::{debug, trace, warn};

use crate::config::FlowConfig;
use crate::document::{NodeTree, TreeError};
use crate::events::listener::{ActionEntry, ListenerEntry};
use crate::events::{DomEvent, EventError, EventPhase, EventResult, Listener};

/// Type alias for the listener registry
type ListenerMap<N> = RwLock<HashMap<N, Vec<ListenerEntry<N>>>>;

/// Type alias for the default action registry
type ActionMap<N> = RwLock<HashMap<N, Vec<ActionEntry<N>>>>;

/// Owns the listener and default-action registries for one document and
/// dispatches events through it
pub struct EventFlowManager<T: NodeTree> {
    /// The tree events travel through
    tree: T,

    /// Per-node capture and bubble listeners, in registration order
    listeners: ListenerMap<T::Node>,

    /// Per-node default actions, in registration order
    actions: ActionMap<T::Node>,

    config: FlowConfig,
}

impl<T: NodeTree> std::fmt::Debug for EventFlowManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFlowManager")
            .field("config", &self.config)
            .field("listeners", &"[EventListeners]")
            .field("actions", &"[DefaultActions]")
            .finish()
    }
}

impl<T: NodeTree> EventFlowManager<T> {
    /// Create a manager with the default configuration
    pub fn new(tree: T) -> Self {
        Self::build(tree, FlowConfig::default())
    }

    /// Create a manager with an explicit configuration, rejecting values
    /// that would make every dispatch fail
    pub fn with_config(tree: T, config: FlowConfig) -> EventResult<Self> {
        config.validate()?;
        Ok(Self::build(tree, config))
    }

    fn build(tree: T, config: FlowConfig) -> Self {
        Self {
            tree,
            listeners: RwLock::new(HashMap::new()),
            actions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// The tree this manager dispatches through
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// The configuration this manager was built with
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Register a default action for `event_type` on `target`
    ///
    /// Registering the same (event type, listener) pair twice is a no-op.
    pub fn set_default_action(
        &self,
        target: &T::Node,
        event_type: &str,
        listener: Listener<T::Node>,
    ) -> EventResult<()> {
        let mut actions = self.actions.write().map_err(|_| {
            EventError::LockError("Failed to lock default action registry".to_string())
        })?;

        let entry = ActionEntry {
            event_type: event_type.to_string(),
            listener,
        };
        let registered = actions.entry(target.clone()).or_default();
        if registered.contains(&entry) {
            trace!("Default action for '{event_type}' on {target:?} already set");
        } else {
            trace!("Setting default action for '{event_type}' on {target:?}");
            registered.push(entry);
        }

        Ok(())
    }

    /// Register a listener for `event_type` on `target`
    ///
    /// With `capture` set the listener fires while the event travels down
    /// through `target` towards one of its descendants; otherwise it fires
    /// at `target` itself and while the event bubbles back up. Registering
    /// an identical tuple twice is a no-op.
    pub fn add_event_listener(
        &self,
        target: &T::Node,
        event_type: &str,
        listener: Listener<T::Node>,
        capture: bool,
    ) -> EventResult<()> {
        let mut listeners = self.listeners.write().map_err(|_| {
            EventError::LockError("Failed to lock listener registry".to_string())
        })?;

        let entry = ListenerEntry {
            event_type: event_type.to_string(),
            listener,
            capture,
        };
        let registered = listeners.entry(target.clone()).or_default();
        if registered.contains(&entry) {
            trace!("Listener for '{event_type}' (capture={capture}) on {target:?} already registered");
        } else {
            trace!("Adding listener for '{event_type}' (capture={capture}) on {target:?}");
            registered.push(entry);
        }

        Ok(())
    }

    /// Remove a listener registered with exactly these arguments
    ///
    /// Removing something that was never registered is a no-op.
    pub fn remove_event_listener(
        &self,
        target: &T::Node,
        event_type: &str,
        listener: &Listener<T::Node>,
        capture: bool,
    ) -> EventResult<()> {
        let mut listeners = self.listeners.write().map_err(|_| {
            EventError::LockError("Failed to lock listener registry".to_string())
        })?;

        let position = listeners.get(target).and_then(|registered| {
            registered.iter().position(|entry| {
                entry.event_type == event_type
                    && entry.capture == capture
                    && entry.listener == *listener
            })
        });

        match (position, listeners.get_mut(target)) {
            (Some(index), Some(registered)) => {
                trace!("Removing listener for '{event_type}' (capture={capture}) on {target:?}");
                registered.remove(index);
            }
            _ => trace!("No listener for '{event_type}' (capture={capture}) on {target:?} to remove"),
        }

        Ok(())
    }

    /// Dispatch `event` to `target`
    ///
    /// The event is updated in place; inspect it afterwards to see whether
    /// it was canceled or stopped. An error from any listener aborts the
    /// dispatch and leaves the event mid-flow.
    pub fn dispatch_event(
        &self,
        target: &T::Node,
        event: &mut DomEvent<T::Node>,
    ) -> EventResult<()> {
        event.target = Some(target.clone());
        event.timestamp = Some(SystemTime::now());

        let event_path = self.event_path(target)?;
        debug!(
            "Dispatching '{}' to {target:?} through {} ancestor(s)",
            event.event_type(),
            event_path.len()
        );

        // Capturing phase: root down to the target's parent
        event.event_phase = Some(EventPhase::Capturing);
        self.do_event_flow(event_path.iter().rev(), EventPhase::Capturing, event)?;

        // Target phase
        if !event.is_propagation_stopped() {
            event.event_phase = Some(EventPhase::AtTarget);
            self.deliver_event(target, EventPhase::AtTarget, event)?;
            self.handle_default_action(target, event)?;
        }

        // Bubbling phase: the target's parent up to the root
        if event.can_bubble() {
            event.event_phase = Some(EventPhase::Bubbling);
            self.do_event_flow(event_path.iter(), EventPhase::Bubbling, event)?;
        }

        Ok(())
    }

    /// Ancestors of `target`, nearest first, excluding `target` itself
    fn event_path(&self, target: &T::Node) -> EventResult<Vec<T::Node>> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(target.clone());

        let mut current = target.clone();
        while let Some(parent) = self.tree.parents(&current)?.into_iter().next() {
            if !seen.insert(parent.clone()) {
                warn!("Parent cycle at {parent:?} while dispatching to {target:?}");
                return Err(TreeError::Cycle(format!("{parent:?}")).into());
            }
            if path.len() >= self.config.max_depth {
                warn!(
                    "Ancestor path of {target:?} exceeds {} nodes",
                    self.config.max_depth
                );
                return Err(TreeError::TooDeep {
                    max_depth: self.config.max_depth,
                }
                .into());
            }
            path.push(parent.clone());
            current = parent;
        }

        Ok(path)
    }

    // Walk part of the path, giving up as soon as propagation is stopped
    fn do_event_flow<'a>(
        &self,
        event_path: impl Iterator<Item = &'a T::Node>,
        phase: EventPhase,
        event: &mut DomEvent<T::Node>,
    ) -> EventResult<()>
    where
        T::Node: 'a,
    {
        for node in event_path {
            if event.is_propagation_stopped() {
                return Ok(());
            }
            self.deliver_event(node, phase, event)?;
        }
        Ok(())
    }

    // Run the matching listeners of a single node
    fn deliver_event(
        &self,
        node: &T::Node,
        phase: EventPhase,
        event: &mut DomEvent<T::Node>,
    ) -> EventResult<()> {
        event.current_target = Some(node.clone());

        let capturing = phase == EventPhase::Capturing;
        let matching: Vec<Listener<T::Node>> = {
            let listeners = self.listeners.read().map_err(|_| {
                EventError::LockError("Failed to read listener registry".to_string())
            })?;
            listeners
                .get(node)
                .map(|registered| {
                    registered
                        .iter()
                        .filter(|entry| {
                            entry.event_type == event.event_type() && entry.capture == capturing
                        })
                        .map(|entry| entry.listener.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        for listener in matching {
            trace!(
                "Invoking listener for '{}' on {node:?} ({phase})",
                event.event_type()
            );
            listener
                .call(event)
                .map_err(|e| EventError::listener(event.event_type(), phase, e))?;
        }

        Ok(())
    }

    // Run the target's default actions unless the event was canceled
    fn handle_default_action(
        &self,
        target: &T::Node,
        event: &mut DomEvent<T::Node>,
    ) -> EventResult<()> {
        if event.is_default_prevented() {
            debug!(
                "Default action for '{}' on {target:?} was prevented",
                event.event_type()
            );
            return Ok(());
        }

        let matching: Vec<Listener<T::Node>> = {
            let actions = self.actions.read().map_err(|_| {
                EventError::LockError("Failed to read default action registry".to_string())
            })?;
            actions
                .get(target)
                .map(|registered| {
                    registered
                        .iter()
                        .filter(|entry| entry.event_type == event.event_type())
                        .map(|entry| entry.listener.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        for action in matching {
            trace!(
                "Running default action for '{}' on {target:?}",
                event.event_type()
            );
            action
                .call(event)
                .map_err(|e| EventError::listener(event.event_type(), EventPhase::AtTarget, e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::document::{Document, NodeId, TreeResult};
    use crate::events::EventKind;
    use std::sync::{Arc, Mutex};

    fn chain() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let elem1 = doc.append_element(doc.root(), "elem1").unwrap();
        let elem2 = doc.append_element(elem1, "elem2").unwrap();
        let elem3 = doc.append_element(elem2, "elem3").unwrap();
        (doc, elem1, elem2, elem3)
    }

    fn bubbling() -> DomEvent<NodeId> {
        DomEvent::new(EventKind::custom("bubble-event", true, true))
    }

    type Log = Arc<Mutex<Vec<(String, NodeId, EventPhase)>>>;

    fn recorder(log: &Log, name: &str) -> Listener<NodeId> {
        let log = log.clone();
        let name = name.to_string();
        Listener::new(move |event| {
            log.lock().unwrap().push((
                name.clone(),
                *event.current_target().unwrap(),
                event.event_phase().unwrap(),
            ));
            Ok(())
        })
    }

    #[test]
    fn test_full_phase_order() {
        let (doc, elem1, elem2, elem3) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        for node in [elem1, elem2, elem3] {
            manager
                .add_event_listener(&node, "bubble-event", recorder(&log, "capture"), true)
                .unwrap();
            manager
                .add_event_listener(&node, "bubble-event", recorder(&log, "bubble"), false)
                .unwrap();
        }
        manager
            .set_default_action(&elem3, "bubble-event", recorder(&log, "default"))
            .unwrap();

        let mut event = bubbling();
        manager.dispatch_event(&elem3, &mut event).unwrap();

        let expected = vec![
            ("capture".to_string(), elem1, EventPhase::Capturing),
            ("capture".to_string(), elem2, EventPhase::Capturing),
            ("bubble".to_string(), elem3, EventPhase::AtTarget),
            ("default".to_string(), elem3, EventPhase::AtTarget),
            ("bubble".to_string(), elem2, EventPhase::Bubbling),
            ("bubble".to_string(), elem1, EventPhase::Bubbling),
        ];
        assert_eq!(*log.lock().unwrap(), expected);
        assert_eq!(event.target(), Some(&elem3));
        assert_eq!(event.current_target(), Some(&doc.root()));
        assert!(event.timestamp().is_some());
    }

    #[test]
    fn test_listener_order_is_registration_order() {
        let (doc, _, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        let first = recorder(&log, "first");
        let second = recorder(&log, "second");
        manager.add_event_listener(&elem2, "bubble-event", second.clone(), false).unwrap();
        manager.add_event_listener(&elem2, "bubble-event", first.clone(), false).unwrap();
        manager.add_event_listener(&elem2, "bubble-event", second, false).unwrap();

        manager.dispatch_event(&elem2, &mut bubbling()).unwrap();

        let names: Vec<String> = log.lock().unwrap().iter().map(|(n, ..)| n.clone()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_other_event_types_are_ignored() {
        let (doc, elem1, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager.add_event_listener(&elem1, "other-event", recorder(&log, "other"), false).unwrap();
        manager.set_default_action(&elem2, "other-event", recorder(&log, "other")).unwrap();
        manager.dispatch_event(&elem2, &mut bubbling()).unwrap();

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stop_during_capture_skips_target_and_bubble() {
        let (doc, elem1, elem2, elem3) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager
            .add_event_listener(
                &elem1,
                "bubble-event",
                Listener::new(|event| {
                    event.stop_propagation();
                    Ok(())
                }),
                true,
            )
            .unwrap();
        manager.add_event_listener(&elem2, "bubble-event", recorder(&log, "capture"), true).unwrap();
        manager.add_event_listener(&elem3, "bubble-event", recorder(&log, "target"), false).unwrap();
        manager.add_event_listener(&elem1, "bubble-event", recorder(&log, "bubble"), false).unwrap();
        manager.set_default_action(&elem3, "bubble-event", recorder(&log, "default")).unwrap();

        let mut event = bubbling();
        manager.dispatch_event(&elem3, &mut event).unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert!(event.is_propagation_stopped());
        assert_eq!(event.event_phase(), Some(EventPhase::Bubbling));
        assert_eq!(event.current_target(), Some(&elem1));
    }

    #[test]
    fn test_stop_at_target_skips_bubble_but_not_default() {
        let (doc, elem1, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager
            .add_event_listener(
                &elem2,
                "bubble-event",
                Listener::new(|event| {
                    event.stop_propagation();
                    Ok(())
                }),
                false,
            )
            .unwrap();
        manager.set_default_action(&elem2, "bubble-event", recorder(&log, "default")).unwrap();
        manager.add_event_listener(&elem1, "bubble-event", recorder(&log, "bubble"), false).unwrap();

        manager.dispatch_event(&elem2, &mut bubbling()).unwrap();

        let names: Vec<String> = log.lock().unwrap().iter().map(|(n, ..)| n.clone()).collect();
        assert_eq!(names, vec!["default"]);
    }

    #[test]
    fn test_stop_lets_current_node_finish() {
        let (doc, elem1, elem2, elem3) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager
            .add_event_listener(
                &elem2,
                "bubble-event",
                Listener::new(|event| {
                    event.stop_propagation();
                    Ok(())
                }),
                false,
            )
            .unwrap();
        manager.add_event_listener(&elem2, "bubble-event", recorder(&log, "sibling"), false).unwrap();
        manager.add_event_listener(&elem1, "bubble-event", recorder(&log, "bubble"), false).unwrap();

        manager.dispatch_event(&elem3, &mut bubbling()).unwrap();

        let names: Vec<String> = log.lock().unwrap().iter().map(|(n, ..)| n.clone()).collect();
        assert_eq!(names, vec!["sibling"]);
    }

    #[test]
    fn test_prevent_default_suppresses_default_actions() {
        let (doc, elem1, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager
            .add_event_listener(
                &elem1,
                "bubble-event",
                Listener::new(|event| {
                    event.prevent_default();
                    Ok(())
                }),
                true,
            )
            .unwrap();
        manager.set_default_action(&elem2, "bubble-event", recorder(&log, "default")).unwrap();

        let mut event = bubbling();
        manager.dispatch_event(&elem2, &mut event).unwrap();

        assert!(event.is_default_prevented());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_prevent_default_on_non_cancelable_event() {
        let (doc, elem1, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager
            .add_event_listener(
                &elem1,
                "fixed-event",
                Listener::new(|event| {
                    event.prevent_default();
                    Ok(())
                }),
                true,
            )
            .unwrap();
        manager.set_default_action(&elem2, "fixed-event", recorder(&log, "default")).unwrap();

        let mut event = DomEvent::new(EventKind::custom("fixed-event", true, false));
        manager.dispatch_event(&elem2, &mut event).unwrap();

        assert!(!event.is_default_prevented());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_default_actions_only_at_target() {
        let (doc, elem1, elem2, elem3) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        let action = recorder(&log, "default");
        manager.set_default_action(&elem1, "bubble-event", action.clone()).unwrap();
        manager.set_default_action(&elem2, "bubble-event", action.clone()).unwrap();
        manager.set_default_action(&elem3, "bubble-event", action.clone()).unwrap();
        manager.set_default_action(&elem3, "bubble-event", action).unwrap();

        manager.dispatch_event(&elem3, &mut bubbling()).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![("default".to_string(), elem3, EventPhase::AtTarget)]
        );
    }

    #[test]
    fn test_capture_and_bubble_registrations_are_independent() {
        let (doc, elem1, _, elem3) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        let listener = recorder(&log, "both");
        manager.add_event_listener(&elem1, "bubble-event", listener.clone(), true).unwrap();
        manager.add_event_listener(&elem1, "bubble-event", listener.clone(), false).unwrap();

        manager.dispatch_event(&elem3, &mut bubbling()).unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);

        manager.remove_event_listener(&elem1, "bubble-event", &listener, true).unwrap();
        log.lock().unwrap().clear();
        manager.dispatch_event(&elem3, &mut bubbling()).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![("both".to_string(), elem1, EventPhase::Bubbling)]
        );

        manager.remove_event_listener(&elem1, "bubble-event", &listener, false).unwrap();
        manager.remove_event_listener(&elem1, "bubble-event", &listener, false).unwrap();
        log.lock().unwrap().clear();
        manager.dispatch_event(&elem3, &mut bubbling()).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_listener_error_aborts_dispatch() {
        let (doc, elem1, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);
        let log: Log = Arc::default();

        manager
            .add_event_listener(
                &elem1,
                "bubble-event",
                Listener::new(|_| anyhow::bail!("listener exploded")),
                true,
            )
            .unwrap();
        manager.add_event_listener(&elem2, "bubble-event", recorder(&log, "target"), false).unwrap();

        let mut event = bubbling();
        let err = manager.dispatch_event(&elem2, &mut event).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Listener for 'bubble-event' failed during capturing phase: listener exploded"
        );

        match err {
            EventError::Listener { event_type, phase, source } => {
                assert_eq!(event_type, "bubble-event");
                assert_eq!(phase, EventPhase::Capturing);
                assert_eq!(source.to_string(), "listener exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(log.lock().unwrap().is_empty());

        // Registries are untouched; a fresh dispatch behaves the same way.
        assert!(manager.dispatch_event(&elem2, &mut bubbling()).is_err());
    }

    #[test]
    fn test_default_action_error_reports_target_phase() {
        let (doc, _, elem2, _) = chain();
        let manager = EventFlowManager::new(&doc);

        manager
            .set_default_action(
                &elem2,
                "bubble-event",
                Listener::new(|_| anyhow::bail!("boom")),
            )
            .unwrap();

        let err = manager.dispatch_event(&elem2, &mut bubbling()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Listener for 'bubble-event' failed during at-target phase: boom"
        );
    }

    #[test]
    fn test_registration_during_dispatch_reaches_unvisited_nodes() {
        let (doc, elem1, _, elem3) = chain();
        let manager = Arc::new(EventFlowManager::new(doc));
        let log: Log = Arc::default();

        let late = recorder(&log, "late");
        let registrar = {
            let manager = Arc::clone(&manager);
            Listener::new(move |_| {
                manager.add_event_listener(&elem3, "bubble-event", late.clone(), false)?;
                Ok(())
            })
        };
        manager.add_event_listener(&elem1, "bubble-event", registrar, true).unwrap();

        manager.dispatch_event(&elem3, &mut bubbling()).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![("late".to_string(), elem3, EventPhase::AtTarget)]
        );
    }

    struct Looped;

    impl NodeTree for Looped {
        type Node = u8;

        fn parents(&self, node: &u8) -> TreeResult<Vec<u8>> {
            Ok(vec![(node + 1) % 3])
        }
    }

    struct Endless;

    impl NodeTree for Endless {
        type Node = u32;

        fn parents(&self, node: &u32) -> TreeResult<Vec<u32>> {
            Ok(vec![node + 1])
        }
    }

    /// Node 10 has two parents; 20 > 21 is its first chain, 30 > 31 its second
    struct TwoParents;

    impl NodeTree for TwoParents {
        type Node = u8;

        fn parents(&self, node: &u8) -> TreeResult<Vec<u8>> {
            Ok(match node {
                10 => vec![20, 30],
                20 => vec![21],
                30 => vec![31],
                _ => Vec::new(),
            })
        }
    }

    #[test]
    fn test_parent_cycle_is_fatal() {
        let manager = EventFlowManager::new(Looped);
        let mut event = DomEvent::new(EventKind::custom("e", true, true));
        let err = manager.dispatch_event(&0, &mut event).unwrap_err();
        assert!(matches!(err, EventError::Structural(TreeError::Cycle(_))));
    }

    #[test]
    fn test_only_first_parent_is_followed() {
        let manager = EventFlowManager::new(TwoParents);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener = {
            let seen = seen.clone();
            Listener::new(move |event: &mut DomEvent<u8>| {
                seen.lock()
                    .unwrap()
                    .push((*event.current_target().unwrap(), event.event_phase().unwrap()));
                Ok(())
            })
        };
        for node in [10, 20, 21, 30, 31] {
            manager.add_event_listener(&node, "e", listener.clone(), true).unwrap();
            manager.add_event_listener(&node, "e", listener.clone(), false).unwrap();
        }

        let mut event = DomEvent::new(EventKind::custom("e", true, true));
        manager.dispatch_event(&10, &mut event).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (21, EventPhase::Capturing),
                (20, EventPhase::Capturing),
                (10, EventPhase::AtTarget),
                (20, EventPhase::Bubbling),
                (21, EventPhase::Bubbling),
            ]
        );
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        let result = EventFlowManager::with_config(Endless, FlowConfig { max_depth: 0 });
        assert!(matches!(
            result,
            Err(EventError::Config(ConfigError::InvalidValue { field: "max_depth", .. }))
        ));
    }

    #[test]
    fn test_max_depth_is_enforced() {
        let manager =
            EventFlowManager::with_config(Endless, FlowConfig { max_depth: 16 }).unwrap();
        let mut event = DomEvent::new(EventKind::custom("e", true, true));
        let err = manager.dispatch_event(&0, &mut event).unwrap_err();
        assert!(matches!(
            err,
            EventError::Structural(TreeError::TooDeep { max_depth: 16 })
        ));
    }

    #[test]
    fn test_unknown_target_is_fatal() {
        let (doc, ..) = chain();
        let mut other = Document::new();
        let mut last = other.root();
        for _ in 0..10 {
            last = other.append_element(last, "x").unwrap();
        }
        let manager = EventFlowManager::new(&doc);
        let err = manager.dispatch_event(&last, &mut bubbling()).unwrap_err();
        assert!(matches!(err, EventError::Structural(TreeError::NodeNotFound(_))));
    }
}
