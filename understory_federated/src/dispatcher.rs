// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: build the composed path and run capture → target → bubble.
//!
//! The dispatcher executes listeners for each node on an event's composed path
//! and applies the DOM propagation rules:
//!
//! - Capture runs from the root down to the target's parent under the
//!   `<type>capture` key.
//! - At the target, capture listeners run first, then plain listeners.
//! - Bubble runs from the target's parent back up to the root under the plain key.
//! - After every node, if either stop flag is set, propagation ends. No later
//!   phase runs at all.
//!
//! After propagation, [`EventDispatcher::dispatch`] also hands the event to
//! subscribers registered for its type. That side channel observes every
//! dispatch regardless of target.
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use understory_federated::dispatcher::EventDispatcher;
//! use understory_federated::event::EventKind;
//! use understory_federated::listeners::{ListenerMap, ListenerOptions};
//! use understory_federated::pool::EventPool;
//! use understory_federated::scene::SceneGraph;
//!
//! // 0 is the root; 1 is its child; 2 is the target.
//! struct Scene;
//! impl SceneGraph for Scene {
//!     type Node = u32;
//!     fn root(&self) -> u32 { 0 }
//!     fn parent_of(&self, node: u32) -> Option<u32> { node.checked_sub(1) }
//! }
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut listeners = ListenerMap::new();
//! for node in 0..=2 {
//!     let s = seen.clone();
//!     listeners.add_with(node, "tap", ListenerOptions { capture: true, once: false }, move |e| {
//!         s.borrow_mut().push(("capture", e.current_target.unwrap()));
//!     });
//!     let s = seen.clone();
//!     listeners.add(node, "tap", move |e| {
//!         s.borrow_mut().push(("plain", e.current_target.unwrap()));
//!     });
//! }
//!
//! let mut pool = EventPool::new();
//! let mut dispatcher = EventDispatcher::new(2048);
//! let mut event = pool.allocate(EventKind::Pointer);
//! event.event_type = "tap".into();
//! event.set_target(Some(2));
//! dispatcher.dispatch(&Scene, &mut listeners, &mut event, None);
//!
//! assert_eq!(event.composed_path(), &[2, 1, 0]);
//! assert_eq!(*seen.borrow(), vec![
//!     ("capture", 0), ("capture", 1),
//!     ("capture", 2), ("plain", 2),
//!     ("plain", 1), ("plain", 0),
//! ]);
//! pool.release(event).unwrap();
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::event::{FederatedEvent, Phase};
use crate::listeners::{ListenerKey, ListenerRegistry};
use crate::scene::SceneGraph;

/// Maximum number of hops taken when walking an ownership chain.
pub const PROPAGATION_LIMIT: usize = 2048;

/// A process-wide observer of every dispatch of one type.
pub type Subscriber<N> = Box<dyn FnMut(&FederatedEvent<N>)>;

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Runs the propagation algorithm and the subscriber side channel.
pub struct EventDispatcher<N> {
    propagation_limit: usize,
    subscribers: HashMap<String, Vec<(SubscriptionId, Subscriber<N>)>>,
    next_subscription: u64,
}

impl<N: Copy + Eq + Hash + fmt::Debug> EventDispatcher<N> {
    /// Create a dispatcher that truncates chain walks after `propagation_limit` hops.
    ///
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn new(propagation_limit: usize) -> Self {
        Self {
            propagation_limit: propagation_limit.max(1),
            subscribers: HashMap::new(),
            next_subscription: 0,
        }
    }

    /// Hop limit for chain walks.
    #[must_use]
    pub fn propagation_limit(&self) -> usize {
        self.propagation_limit
    }

    /// Walk from `target` up its parent chain to the root.
    ///
    /// The result starts with `target` and always ends with the root sentinel.
    /// Chains that are detached, cyclic, or deeper than the propagation limit are
    /// cut short and capped with the root, so the result holds at most
    /// `propagation_limit + 1` nodes.
    pub fn composed_path<S: SceneGraph<Node = N>>(&self, scene: &S, target: N) -> Vec<N> {
        let root = scene.root();
        let mut path = Vec::new();
        path.push(target);
        let mut current = target;
        while current != root {
            if path.len() >= self.propagation_limit {
                tracing::debug!(
                    target_node = ?target,
                    limit = self.propagation_limit,
                    "composed path truncated"
                );
                break;
            }
            match scene.parent_of(current) {
                Some(parent) => {
                    path.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        if current != root {
            path.push(root);
        }
        path
    }

    /// Fill the event's cached composed path if it is empty and a target is set.
    pub fn ensure_path<S: SceneGraph<Node = N>>(&self, scene: &S, event: &mut FederatedEvent<N>) {
        if event.path.is_empty() {
            if let Some(target) = event.target() {
                event.path = self.composed_path(scene, target);
            }
        }
    }

    /// Clear the stop flags, propagate, then notify subscribers.
    ///
    /// `type_override` replaces the event's type for listener keys and the
    /// subscriber lookup without changing `event.event_type`.
    pub fn dispatch<S, R>(
        &mut self,
        scene: &S,
        listeners: &mut R,
        event: &mut FederatedEvent<N>,
        type_override: Option<&str>,
    ) where
        S: SceneGraph<Node = N>,
        R: ListenerRegistry<N>,
    {
        event.propagation_stopped = false;
        event.propagation_immediately_stopped = false;

        self.propagate(scene, listeners, event, type_override);

        let ty = type_override.unwrap_or(&*event.event_type);
        tracing::trace!(event_type = ty, target = ?event.target(), "dispatched");
        if let Some(subscribers) = self.subscribers.get_mut(ty) {
            for (_, subscriber) in subscribers.iter_mut() {
                subscriber(event);
            }
        }
    }

    /// Run capture → target → bubble over the event's composed path.
    ///
    /// Does nothing if the event has no target.
    pub fn propagate<S, R>(
        &self,
        scene: &S,
        listeners: &mut R,
        event: &mut FederatedEvent<N>,
        type_override: Option<&str>,
    ) where
        S: SceneGraph<Node = N>,
        R: ListenerRegistry<N>,
    {
        let Some(target) = event.target() else {
            return;
        };
        self.ensure_path(scene, event);

        // Listeners may retarget the event, which clears the cache; walk a snapshot.
        let path = event.path.clone();
        Self::run_phases(listeners, event, &path, target, type_override);
        if event.path.is_empty() && event.target() == Some(target) {
            event.path = path;
        }
    }

    fn run_phases<R: ListenerRegistry<N>>(
        listeners: &mut R,
        event: &mut FederatedEvent<N>,
        path: &[N],
        target: N,
        type_override: Option<&str>,
    ) {
        event.phase = Phase::Capturing;
        for &node in path.iter().skip(1).rev() {
            event.current_target = Some(node);
            Self::notify_target(listeners, event, type_override);
            if event.halted() {
                return;
            }
        }

        event.phase = Phase::AtTarget;
        event.current_target = Some(target);
        Self::notify_target(listeners, event, type_override);
        if event.halted() {
            return;
        }

        // Target listeners may have moved `current_target`; bubble from wherever it is now.
        let start = event
            .current_target
            .and_then(|current| path.iter().position(|&n| n == current))
            .map_or(0, |i| i + 1);

        event.phase = Phase::Bubbling;
        for &node in &path[start..] {
            event.current_target = Some(node);
            Self::notify_target(listeners, event, type_override);
            if event.halted() {
                return;
            }
        }
    }

    /// Invoke the current target's listeners for the event's phase.
    ///
    /// Capturing and at-target use the capture key; at-target then also uses
    /// the plain key; bubbling (and no phase) uses only the plain key.
    pub fn notify_target<R: ListenerRegistry<N>>(
        listeners: &mut R,
        event: &mut FederatedEvent<N>,
        type_override: Option<&str>,
    ) {
        let owned: Cow<'static, str>;
        let ty: &str = match type_override {
            Some(ty) => ty,
            None => {
                owned = event.event_type.clone();
                &*owned
            }
        };

        let phase = event.phase;
        let Some(current) = event.current_target else {
            return;
        };
        let capture = matches!(phase, Phase::Capturing | Phase::AtTarget);
        listeners.emit(
            current,
            ListenerKey {
                event_type: ty,
                capture,
            },
            event,
        );

        if phase == Phase::AtTarget {
            if let Some(current) = event.current_target {
                listeners.emit(current, ListenerKey::plain(ty), event);
            }
        }
    }

    /// Observe every dispatch of `event_type` after propagation.
    pub fn subscribe(
        &mut self,
        event_type: impl Into<String>,
        subscriber: impl FnMut(&FederatedEvent<N>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers
            .entry(event_type.into())
            .or_default()
            .push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for list in self.subscribers.values_mut() {
            let before = list.len();
            list.retain(|(sid, _)| *sid != id);
            removed |= list.len() != before;
        }
        removed
    }
}

impl<N> fmt::Debug for EventDispatcher<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("propagation_limit", &self.propagation_limit)
            .field("subscribed_types", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
