// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry capability and a default per-node implementation.
//!
//! The dispatcher only ever calls [`ListenerRegistry::emit`]; it never looks
//! inside a registry. Any registry must honor the emit contract:
//!
//! - Listeners for a key run in registration order.
//! - A `once` listener is removed before it runs.
//! - Iteration stops as soon as the event's immediate-stop flag is set,
//!   including before the first listener.
//!
//! ## Minimal example
//!
//! ```
//! use understory_federated::listeners::{ListenerKey, ListenerMap, ListenerOptions, ListenerRegistry};
//!
//! let mut map: ListenerMap<u32> = ListenerMap::new();
//! let id = map.add(1, "click", |_e| {});
//! map.add_with(1, "click", ListenerOptions { capture: true, once: false }, |_e| {});
//! assert_eq!(map.listener_count(1, ListenerKey::plain("click")), 1);
//! assert_eq!(map.listener_count(1, ListenerKey::parse("clickcapture")), 1);
//! assert!(map.unregister(1, ListenerKey::plain("click"), id));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::event::FederatedEvent;

/// Suffix addressing capture-phase listeners.
pub const CAPTURE_SUFFIX: &str = "capture";

/// A listener callback. Its receiver is the event's `current_target`.
pub type Listener<N> = Box<dyn FnMut(&mut FederatedEvent<N>)>;

/// Registration options.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Remove the listener before its first invocation.
    pub once: bool,
    /// Listen during the capture phase (and at target) instead of at target and bubble.
    pub capture: bool,
}

/// Handle returned by [`ListenerRegistry::register`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Lookup key: an event type plus the capture bit.
///
/// Displays as `<type>capture` for capture keys, matching the DOM-style
/// addressing where capture listeners are named with the `capture` suffix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey<'a> {
    /// Event type without suffix.
    pub event_type: &'a str,
    /// Whether this addresses capture listeners.
    pub capture: bool,
}

impl<'a> ListenerKey<'a> {
    /// Key for bubble/target listeners.
    #[must_use]
    pub const fn plain(event_type: &'a str) -> Self {
        Self {
            event_type,
            capture: false,
        }
    }

    /// Key for capture/target listeners.
    #[must_use]
    pub const fn capture(event_type: &'a str) -> Self {
        Self {
            event_type,
            capture: true,
        }
    }

    /// Parse a suffixed name: `"clickcapture"` is the capture key for `"click"`.
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        match name.strip_suffix(CAPTURE_SUFFIX) {
            Some(base) if !base.is_empty() => Self::capture(base),
            _ => Self::plain(name),
        }
    }
}

impl fmt::Display for ListenerKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.capture {
            write!(f, "{}{CAPTURE_SUFFIX}", self.event_type)
        } else {
            f.write_str(self.event_type)
        }
    }
}

/// Per-node listener storage.
pub trait ListenerRegistry<N> {
    /// Add a listener for `event_type` on `node`.
    fn register(
        &mut self,
        node: N,
        event_type: &str,
        listener: Listener<N>,
        options: ListenerOptions,
    ) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered under `key`.
    fn unregister(&mut self, node: N, key: ListenerKey<'_>, id: ListenerId) -> bool;

    /// Invoke the listeners registered on `node` under `key`.
    fn emit(&mut self, node: N, key: ListenerKey<'_>, event: &mut FederatedEvent<N>);
}

struct Entry<N> {
    id: ListenerId,
    once: bool,
    listener: Listener<N>,
}

struct NodeListeners<N> {
    capture: HashMap<String, Vec<Entry<N>>>,
    plain: HashMap<String, Vec<Entry<N>>>,
}

impl<N> NodeListeners<N> {
    fn new() -> Self {
        Self {
            capture: HashMap::new(),
            plain: HashMap::new(),
        }
    }

    fn lists(&self, capture: bool) -> &HashMap<String, Vec<Entry<N>>> {
        if capture { &self.capture } else { &self.plain }
    }

    fn lists_mut(&mut self, capture: bool) -> &mut HashMap<String, Vec<Entry<N>>> {
        if capture {
            &mut self.capture
        } else {
            &mut self.plain
        }
    }
}

/// Default [`ListenerRegistry`]: ordered listener lists per node and key.
pub struct ListenerMap<N> {
    nodes: HashMap<N, NodeListeners<N>>,
    next_id: u64,
}

impl<N: Copy + Eq + Hash> ListenerMap<N> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Add a bubble/target listener.
    pub fn add(
        &mut self,
        node: N,
        event_type: &str,
        listener: impl FnMut(&mut FederatedEvent<N>) + 'static,
    ) -> ListenerId {
        self.register(node, event_type, Box::new(listener), ListenerOptions::default())
    }

    /// Add a listener with explicit options.
    pub fn add_with(
        &mut self,
        node: N,
        event_type: &str,
        options: ListenerOptions,
        listener: impl FnMut(&mut FederatedEvent<N>) + 'static,
    ) -> ListenerId {
        self.register(node, event_type, Box::new(listener), options)
    }

    /// Number of listeners on `node` under `key`.
    #[must_use]
    pub fn listener_count(&self, node: N, key: ListenerKey<'_>) -> usize {
        self.nodes
            .get(&node)
            .and_then(|n| n.lists(key.capture).get(key.event_type))
            .map_or(0, Vec::len)
    }

    /// Drop every listener on `node`.
    pub fn clear_node(&mut self, node: N) {
        self.nodes.remove(&node);
    }
}

impl<N: Copy + Eq + Hash> Default for ListenerMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + Hash> ListenerRegistry<N> for ListenerMap<N> {
    fn register(
        &mut self,
        node: N,
        event_type: &str,
        listener: Listener<N>,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.nodes
            .entry(node)
            .or_insert_with(NodeListeners::new)
            .lists_mut(options.capture)
            .entry(String::from(event_type))
            .or_default()
            .push(Entry {
                id,
                once: options.once,
                listener,
            });
        id
    }

    fn unregister(&mut self, node: N, key: ListenerKey<'_>, id: ListenerId) -> bool {
        let Some(list) = self
            .nodes
            .get_mut(&node)
            .and_then(|n| n.lists_mut(key.capture).get_mut(key.event_type))
        else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.id != id);
        list.len() != before
    }

    fn emit(&mut self, node: N, key: ListenerKey<'_>, event: &mut FederatedEvent<N>) {
        let Some(list) = self
            .nodes
            .get_mut(&node)
            .and_then(|n| n.lists_mut(key.capture).get_mut(key.event_type))
        else {
            return;
        };
        let mut i = 0;
        while i < list.len() && !event.propagation_immediately_stopped() {
            if list[i].once {
                let mut entry = list.remove(i);
                (entry.listener)(event);
            } else {
                (list[i].listener)(event);
                i += 1;
            }
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for ListenerMap<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerMap")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}
