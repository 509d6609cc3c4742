// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event boundary: the owner of one scene's event state.
//!
//! An [`EventBoundary`] owns the scene, its listeners, the hit tester, and
//! everything the gesture handlers share: the event pool, the dispatcher, the
//! tracking store, the mapping table, and the pending-input queue.
//!
//! ## Usage
//!
//! 1) Build the boundary with an [`EventConfig`] sized to the canvas.
//! 2) Hand raw inputs to [`EventBoundary::map_event`], or queue them with
//!    [`EventBoundary::push_input`] and drain with
//!    [`EventBoundary::process_pending`].
//! 3) Read [`EventBoundary::cursor`] after moves to update the host cursor.
//!
//! Every handler takes `&mut self`, so at most one input is in flight per
//! boundary. The pending queue is a batch buffer: the host fills it between
//! drains, and each drain maps it strictly in arrival order.

use alloc::borrow::Cow;
use alloc::collections::VecDeque;
use core::fmt;

use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::config::EventConfig;
use crate::coords::CoordinateConverter;
use crate::dispatcher::EventDispatcher;
use crate::error::EventError;
use crate::event::{EventKind, EventPayload, FederatedEvent, ManagerId, PointerData, WheelData};
use crate::hit::{EventPosition, HitTester, in_canvas};
use crate::input::{InputEvent, InputOrigin};
use crate::listeners::ListenerRegistry;
use crate::mapping::{Gesture, Mapping, MappingTable};
use crate::pool::EventPool;
use crate::scene::{Cursor, SceneGraph, step_up};
use crate::tracking::TrackingStore;

/// Cursor reported before any pointer activity.
pub const DEFAULT_CURSOR: &str = "default";

type Node<S> = <S as SceneGraph>::Node;

/// Maps raw input for one scene into federated events.
pub struct EventBoundary<S: SceneGraph, R, H> {
    pub(crate) scene: S,
    pub(crate) listeners: R,
    pub(crate) picker: H,
    pub(crate) pool: EventPool<Node<S>>,
    pub(crate) dispatcher: EventDispatcher<Node<S>>,
    pub(crate) tracking: TrackingStore<Node<S>>,
    pub(crate) mappings: MappingTable,
    pub(crate) converter: CoordinateConverter,
    pub(crate) pending: VecDeque<InputEvent<Node<S>>>,
    pub(crate) cursor: Option<Cursor>,
    pub(crate) config: EventConfig,
}

impl<S, R, H> EventBoundary<S, R, H>
where
    S: SceneGraph,
    R: ListenerRegistry<S::Node>,
    H: HitTester<S::Node>,
{
    /// Create a boundary with the default mapping table.
    pub fn new(scene: S, listeners: R, picker: H, config: EventConfig) -> Self {
        Self {
            scene,
            listeners,
            picker,
            pool: EventPool::new(),
            dispatcher: EventDispatcher::new(config.propagation_limit),
            tracking: TrackingStore::new(),
            mappings: MappingTable::with_defaults(),
            converter: CoordinateConverter::new(config.canvas_size, config.client_rect),
            pending: VecDeque::new(),
            cursor: Some(Cow::Borrowed(DEFAULT_CURSOR)),
            config,
        }
    }

    /// Identity stamped into every event this boundary allocates.
    #[must_use]
    pub fn id(&self) -> ManagerId {
        self.pool.owner()
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, for example to reparent nodes between inputs.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The listener registry.
    #[must_use]
    pub fn listeners(&self) -> &R {
        &self.listeners
    }

    /// Mutable access to the listener registry.
    pub fn listeners_mut(&mut self) -> &mut R {
        &mut self.listeners
    }

    /// The hit tester.
    #[must_use]
    pub fn picker(&self) -> &H {
        &self.picker
    }

    /// The dispatcher, for [`subscribe`](EventDispatcher::subscribe).
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher<S::Node> {
        &mut self.dispatcher
    }

    /// The event pool.
    #[must_use]
    pub fn pool(&self) -> &EventPool<S::Node> {
        &self.pool
    }

    /// Per-pointer tracking state.
    #[must_use]
    pub fn tracking(&self) -> &TrackingStore<S::Node> {
        &self.tracking
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// The coordinate converter for this boundary's surface.
    #[must_use]
    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    /// Update the canvas size and client rectangle after a resize.
    pub fn set_surface(&mut self, canvas_size: Size, client_rect: Option<Rect>) {
        self.config.canvas_size = canvas_size;
        self.config.client_rect = client_rect;
        self.converter.set_surface(canvas_size, client_rect);
    }

    /// Cursor requested by the node under the pointer, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Map raw `event_type` to `gesture`. Lower `priority` runs first.
    pub fn add_event_mapping(&mut self, event_type: &str, gesture: Gesture, priority: i32) {
        self.mappings.add(event_type, gesture, priority);
    }

    /// Run every gesture mapped to the input's type.
    ///
    /// Unmapped types are dropped with a warning.
    pub async fn map_event(&mut self, input: InputEvent<S::Node>) -> Result<(), EventError> {
        let handlers: SmallVec<[Mapping; 2]> =
            SmallVec::from_slice(self.mappings.handlers(&input.event_type));
        if handlers.is_empty() {
            tracing::warn!(event_type = &*input.event_type, "no mapping for event type");
            return Ok(());
        }
        for mapping in handlers {
            self.run_gesture(mapping.gesture, &input).await?;
        }
        self.evict_idle(input.time_stamp);
        Ok(())
    }

    /// Queue an input for [`process_pending`](Self::process_pending).
    pub fn push_input(&mut self, input: InputEvent<S::Node>) {
        self.pending.push_back(input);
    }

    /// Number of queued inputs.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Map queued inputs one at a time, in arrival order.
    ///
    /// Stops at the first error; inputs after it stay queued.
    pub async fn process_pending(&mut self) -> Result<(), EventError> {
        while let Some(input) = self.pending.pop_front() {
            self.map_event(input).await?;
        }
        Ok(())
    }

    /// Resolve a position to a node.
    ///
    /// Positions outside the canvas resolve to `None` without consulting the
    /// picker. Inside the canvas, a miss resolves to the root.
    pub async fn hit_test(&self, position: EventPosition) -> Option<S::Node> {
        if !in_canvas(position.viewport, self.config.canvas_size) {
            return None;
        }
        self.picker
            .pick(position)
            .await
            .or_else(|| Some(self.scene.root()))
    }

    /// The deepest node of a stored composed path that is still attached.
    ///
    /// Walks from the root end of `path` towards its target while each entry
    /// is the root or a child of the entry before it.
    #[must_use]
    pub fn find_mounted_target(&self, path: &[S::Node]) -> Option<S::Node> {
        let (&last, rest) = path.split_last()?;
        let root = self.scene.root();
        let mut current = last;
        for &node in rest.iter().rev() {
            if node == root || self.scene.parent_of(node) == Some(current) {
                current = node;
            } else {
                break;
            }
        }
        Some(current)
    }

    /// Copy a pointer event into a fresh pooled event of `event_type`.
    ///
    /// The target and cached composed path are copied by value.
    pub fn clone_pointer_event(
        &mut self,
        from: &FederatedEvent<S::Node>,
        event_type: impl Into<Cow<'static, str>>,
    ) -> FederatedEvent<S::Node> {
        let mut event = self.pool.allocate(EventKind::Pointer);
        copy_event(&mut event, from);
        event.event_type = event_type.into();
        event.payload = as_pointer(&from.payload);
        event
    }

    /// Copy a wheel event into a fresh pooled event.
    pub fn clone_wheel_event(&mut self, from: &FederatedEvent<S::Node>) -> FederatedEvent<S::Node> {
        let mut event = self.pool.allocate(EventKind::Wheel);
        copy_event(&mut event, from);
        event.payload = as_wheel(&from.payload);
        event
    }

    /// Dispatch an event allocated by this boundary.
    pub fn dispatch_event(
        &mut self,
        event: &mut FederatedEvent<S::Node>,
        type_override: Option<&str>,
    ) {
        self.dispatcher
            .dispatch(&self.scene, &mut self.listeners, event, type_override);
    }

    /// Return an event to the pool.
    pub fn release_event(&mut self, event: FederatedEvent<S::Node>) -> Result<(), EventError> {
        self.pool.release(event)
    }

    pub(crate) async fn resolve_target(&self, from: &InputEvent<S::Node>) -> Option<S::Node> {
        match from.origin {
            InputOrigin::Element(node) => Some(node),
            InputOrigin::Outside => None,
            InputOrigin::Canvas => self.hit_test(from.position()).await,
        }
    }

    /// A pooled pointer event populated from raw input, aimed at `target`.
    pub(crate) fn pointer_event(
        &mut self,
        from: &InputEvent<S::Node>,
        event_type: Cow<'static, str>,
        target: Option<S::Node>,
    ) -> FederatedEvent<S::Node> {
        let mut event = self.pool.allocate(EventKind::Pointer);
        copy_input(&mut event, from);
        event.event_type = event_type;
        event.payload = as_pointer(&from.payload);
        event.set_target(target);
        event
    }

    /// A pooled wheel event populated from raw input, aimed at `target`.
    pub(crate) fn wheel_event(
        &mut self,
        from: &InputEvent<S::Node>,
        target: Option<S::Node>,
    ) -> FederatedEvent<S::Node> {
        let mut event = self.pool.allocate(EventKind::Wheel);
        copy_input(&mut event, from);
        event.event_type = from.event_type.clone();
        event.payload = as_wheel(&from.payload);
        event.set_target(target);
        event
    }

    pub(crate) fn ensure_path(&self, event: &mut FederatedEvent<S::Node>) {
        self.dispatcher.ensure_path(&self.scene, event);
    }

    /// Run the current target's listeners without walking the path.
    pub(crate) fn notify(&mut self, event: &mut FederatedEvent<S::Node>, event_type: &str) {
        EventDispatcher::notify_target(&mut self.listeners, event, Some(event_type));
    }

    /// Notify `event` on `start` and each ancestor up to and including the
    /// root, stopping early at the first node for which `stop` holds.
    ///
    /// Returns the node the walk stopped at, or `None` if it passed the root.
    pub(crate) fn walk_up(
        &mut self,
        event: &mut FederatedEvent<S::Node>,
        start: Option<S::Node>,
        retarget: bool,
        event_types: &[&str],
        stop: impl Fn(S::Node) -> bool,
    ) -> Option<S::Node> {
        let mut current = start;
        let mut hops = 0;
        while let Some(node) = current {
            if stop(node) {
                break;
            }
            if hops >= self.dispatcher.propagation_limit() {
                tracing::debug!(start = ?start, "ancestor walk truncated");
                break;
            }
            if retarget {
                event.set_target(Some(node));
            }
            event.current_target = Some(node);
            for ty in event_types {
                self.notify(event, ty);
            }
            current = step_up(&self.scene, node);
            hops += 1;
        }
        current
    }

    fn evict_idle(&mut self, now: f64) {
        let Some(timeout) = self.config.tracking_idle_timeout else {
            return;
        };
        let evicted = self.tracking.evict_idle(now, timeout);
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.tracking.len(), "evicted idle pointers");
        }
    }

    /// Run one gesture handler.
    pub(crate) async fn run_gesture(
        &mut self,
        gesture: Gesture,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        match gesture {
            Gesture::PointerDown => self.on_pointer_down(from).await,
            Gesture::PointerUp => self.on_pointer_up(from).await,
            Gesture::PointerMove => self.on_pointer_move(from).await,
            Gesture::PointerOut => self.on_pointer_out(from).await,
            Gesture::PointerOver => self.on_pointer_over(from).await,
            Gesture::PointerUpOutside => self.on_pointer_up_outside(from).await,
            Gesture::Wheel => self.on_wheel(from).await,
        }
    }
}

impl<S: SceneGraph, R, H> fmt::Debug for EventBoundary<S, R, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBoundary")
            .field("pool", &self.pool)
            .field("dispatcher", &self.dispatcher)
            .field("tracking", &self.tracking)
            .field("mappings", &self.mappings)
            .field("pending", &self.pending.len())
            .field("cursor", &self.cursor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Pointer payload for `payload`, keeping its mouse fields when it is not a pointer.
fn as_pointer(payload: &EventPayload) -> EventPayload {
    match payload {
        EventPayload::Pointer(p) => EventPayload::Pointer(*p),
        other => EventPayload::Pointer(PointerData {
            mouse: *other.mouse(),
            ..PointerData::default()
        }),
    }
}

/// Wheel payload for `payload`, keeping its mouse fields when it is not a wheel.
fn as_wheel(payload: &EventPayload) -> EventPayload {
    match payload {
        EventPayload::Wheel(w) => EventPayload::Wheel(*w),
        other => EventPayload::Wheel(WheelData {
            mouse: *other.mouse(),
            ..WheelData::default()
        }),
    }
}

fn copy_input<N: Copy + Eq>(to: &mut FederatedEvent<N>, from: &InputEvent<N>) {
    to.time_stamp = from.time_stamp;
    to.detail = from.detail;
    to.is_trusted = from.is_trusted;
    to.page = from.page;
    to.viewport = from.viewport;
    to.native_event.clone_from(&from.native_event);
}

fn copy_event<N: Copy + Eq>(to: &mut FederatedEvent<N>, from: &FederatedEvent<N>) {
    to.event_type = from.event_type.clone();
    to.time_stamp = from.time_stamp;
    to.detail = from.detail;
    to.is_trusted = from.is_trusted;
    to.page = from.page;
    to.viewport = from.viewport;
    to.native_event.clone_from(&from.native_event);
    to.set_target(from.target());
    to.path.extend_from_slice(&from.path);
}
