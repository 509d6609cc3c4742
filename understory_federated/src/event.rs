// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Federated event records.
//!
//! A [`FederatedEvent`] is a shared header (type, target, phase, cached composed
//! path, propagation flags) plus a tagged [`EventPayload`] selecting among
//! pointer, wheel, and mouse-only data. Events are allocated from and released
//! to an [`EventPool`](crate::pool::EventPool); the pool records its owner in
//! every event it creates so releases can be validated.
//!
//! Positions are [`kurbo::Point`] values. Cloning an event copies them by value;
//! no two events ever share position storage.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use kurbo::Point;

/// Event type names synthesized by the gesture handlers.
///
/// Capture-phase listeners use the same names with the `capture` suffix, see
/// [`ListenerKey`](crate::listeners::ListenerKey).
pub mod event_types {
    /// Pointer pressed.
    pub const POINTER_DOWN: &str = "pointerdown";
    /// Pointer released.
    pub const POINTER_UP: &str = "pointerup";
    /// Pointer released away from the node it was pressed on.
    pub const POINTER_UP_OUTSIDE: &str = "pointerupoutside";
    /// Pointer moved.
    pub const POINTER_MOVE: &str = "pointermove";
    /// Pointer moved onto a node.
    pub const POINTER_OVER: &str = "pointerover";
    /// Pointer moved off a node.
    pub const POINTER_OUT: &str = "pointerout";
    /// Pointer entered a node or one of its descendants (does not bubble).
    pub const POINTER_ENTER: &str = "pointerenter";
    /// Pointer left a node and all of its descendants (does not bubble).
    pub const POINTER_LEAVE: &str = "pointerleave";
    /// Press and release on the same node by a mouse or touch pointer.
    pub const CLICK: &str = "click";
    /// Press and release on the same node by any pointer.
    pub const POINTER_TAP: &str = "pointertap";
    /// Wheel rotation.
    pub const WHEEL: &str = "wheel";

    /// Primary mouse button pressed.
    pub const MOUSE_DOWN: &str = "mousedown";
    /// Primary mouse button released.
    pub const MOUSE_UP: &str = "mouseup";
    /// Primary mouse button released outside the pressed node.
    pub const MOUSE_UP_OUTSIDE: &str = "mouseupoutside";
    /// Mouse moved.
    pub const MOUSE_MOVE: &str = "mousemove";
    /// Mouse moved onto a node.
    pub const MOUSE_OVER: &str = "mouseover";
    /// Mouse moved off a node.
    pub const MOUSE_OUT: &str = "mouseout";
    /// Mouse entered a node.
    pub const MOUSE_ENTER: &str = "mouseenter";
    /// Mouse left a node.
    pub const MOUSE_LEAVE: &str = "mouseleave";
    /// Secondary mouse button pressed.
    pub const RIGHT_DOWN: &str = "rightdown";
    /// Secondary mouse button released.
    pub const RIGHT_UP: &str = "rightup";
    /// Secondary mouse button released outside the pressed node.
    pub const RIGHT_UP_OUTSIDE: &str = "rightupoutside";

    /// Touch contact started.
    pub const TOUCH_START: &str = "touchstart";
    /// Touch contact ended.
    pub const TOUCH_END: &str = "touchend";
    /// Touch contact ended outside the touched node.
    pub const TOUCH_END_OUTSIDE: &str = "touchendoutside";
    /// Touch contact moved.
    pub const TOUCH_MOVE: &str = "touchmove";
}

/// Propagation phase of an event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not being dispatched.
    #[default]
    None,
    /// Walking from the root towards the target.
    Capturing,
    /// At the target itself.
    AtTarget,
    /// Walking from the target back to the root.
    Bubbling,
}

/// Kind of event record. Keys the event pool's free lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer events (mouse, pen, touch).
    Pointer,
    /// Wheel events.
    Wheel,
    /// Mouse-only events.
    Mouse,
}

impl EventKind {
    /// Every kind, in pool slot order.
    pub const ALL: [Self; 3] = [Self::Pointer, Self::Wheel, Self::Mouse];

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Pointer => 0,
            Self::Wheel => 1,
            Self::Mouse => 2,
        }
    }
}

/// Device behind a pointer event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// A mouse.
    #[default]
    Mouse,
    /// A pen or stylus.
    Pen,
    /// A touch contact.
    Touch,
    /// Anything else the host reports.
    Unknown,
}

impl PointerType {
    /// Mouse and pen pointers receive the `mouse*` variants.
    #[must_use]
    pub const fn is_mouse_like(self) -> bool {
        matches!(self, Self::Mouse | Self::Pen)
    }
}

/// Unit of wheel deltas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeltaMode {
    /// Deltas are in pixels.
    #[default]
    Pixel,
    /// Deltas are in lines.
    Line,
    /// Deltas are in pages.
    Page,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during an input event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT   = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Meta / Command / Windows.
        const META  = 0b0100;
        /// Shift.
        const SHIFT = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags::bitflags! {
    /// Flags a host can attach to an input's [`Detail`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DetailFlags: u8 {
        /// Suppress `click` and `pointertap` for this `pointerup`.
        const PREVENT_CLICK = 0b0001;
    }
}

/// Extra event detail: nothing, a click count, or host flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Detail {
    /// No detail.
    #[default]
    None,
    /// Consecutive click count for `click` / `pointertap`.
    Count(u32),
    /// Host-provided flags.
    Flags(DetailFlags),
}

impl Detail {
    /// The click count, if this detail carries one.
    #[must_use]
    pub const fn count(self) -> Option<u32> {
        match self {
            Self::Count(n) => Some(n),
            _ => None,
        }
    }

    /// Whether the host asked for click synthesis to be skipped.
    #[must_use]
    pub const fn prevents_click(self) -> bool {
        match self {
            Self::Flags(flags) => flags.contains(DetailFlags::PREVENT_CLICK),
            _ => false,
        }
    }
}

/// Button index of the secondary (right) mouse button.
pub const RIGHT_BUTTON: i16 = 2;

/// Mouse data shared by pointer, wheel, and mouse-only payloads.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MouseData {
    /// Button that changed state (`0` primary, `1` auxiliary, `2` secondary).
    pub button: i16,
    /// Bitmask of buttons currently held.
    pub buttons: u16,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Position in client (window) space.
    pub client: Point,
    /// Position in canvas (world) space.
    pub canvas: Point,
    /// Position in screen space.
    pub screen: Point,
    /// Position in global space.
    pub global: Point,
    /// Position relative to the target's padding edge.
    pub offset: Point,
    /// Movement since the previous event of this pointer.
    pub movement: Point,
}

impl MouseData {
    /// Whether the changed button is the secondary button.
    #[must_use]
    pub const fn is_right_button(&self) -> bool {
        self.button == RIGHT_BUTTON
    }
}

/// Pointer payload.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerData {
    /// Mouse fields.
    pub mouse: MouseData,
    /// Host-assigned pointer id; keys the tracking store.
    pub pointer_id: u32,
    /// Device type.
    pub pointer_type: PointerType,
    /// Whether this is the primary pointer of its type.
    pub is_primary: bool,
    /// Contact width.
    pub width: f64,
    /// Contact height.
    pub height: f64,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f64,
    /// Normalized barrel pressure in `[-1, 1]`.
    pub tangential_pressure: f64,
    /// Tilt along the x axis in degrees.
    pub tilt_x: f64,
    /// Tilt along the y axis in degrees.
    pub tilt_y: f64,
    /// Rotation in degrees.
    pub twist: f64,
}

/// Wheel payload.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelData {
    /// Mouse fields.
    pub mouse: MouseData,
    /// Horizontal scroll amount.
    pub delta_x: f64,
    /// Vertical scroll amount.
    pub delta_y: f64,
    /// Depth scroll amount.
    pub delta_z: f64,
    /// Unit of the deltas.
    pub delta_mode: DeltaMode,
}

/// Kind-specific event data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// Pointer data.
    Pointer(PointerData),
    /// Wheel data.
    Wheel(WheelData),
    /// Mouse-only data.
    Mouse(MouseData),
}

impl EventPayload {
    /// A zeroed payload of the given kind.
    #[must_use]
    pub fn empty(kind: EventKind) -> Self {
        match kind {
            EventKind::Pointer => Self::Pointer(PointerData::default()),
            EventKind::Wheel => Self::Wheel(WheelData::default()),
            EventKind::Mouse => Self::Mouse(MouseData::default()),
        }
    }

    /// The kind tag of this payload.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Pointer(_) => EventKind::Pointer,
            Self::Wheel(_) => EventKind::Wheel,
            Self::Mouse(_) => EventKind::Mouse,
        }
    }

    /// Mouse fields, present in every variant.
    #[must_use]
    pub const fn mouse(&self) -> &MouseData {
        match self {
            Self::Pointer(p) => &p.mouse,
            Self::Wheel(w) => &w.mouse,
            Self::Mouse(m) => m,
        }
    }

    /// Mutable mouse fields.
    pub fn mouse_mut(&mut self) -> &mut MouseData {
        match self {
            Self::Pointer(p) => &mut p.mouse,
            Self::Wheel(w) => &mut w.mouse,
            Self::Mouse(m) => m,
        }
    }

    /// Pointer data, if this is a pointer payload.
    #[must_use]
    pub const fn pointer(&self) -> Option<&PointerData> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Wheel data, if this is a wheel payload.
    #[must_use]
    pub const fn wheel(&self) -> Option<&WheelData> {
        match self {
            Self::Wheel(w) => Some(w),
            _ => None,
        }
    }
}

/// Opaque handle to the host's native event. Never interpreted here.
pub type NativeEvent = Rc<dyn Any>;

/// Identity of the boundary (and pool) that allocated an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ManagerId(usize);

impl ManagerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pooled, reusable event record.
///
/// The composed path is computed lazily by the dispatcher and cached here
/// until the target changes. When set, `composed_path()[0]` is the target and
/// the last element is the root sentinel.
pub struct FederatedEvent<N> {
    /// Event type, for example `"pointerdown"`.
    pub event_type: Cow<'static, str>,
    /// Node whose listeners are currently running.
    pub current_target: Option<N>,
    /// Timestamp in milliseconds, taken from the raw input.
    pub time_stamp: f64,
    /// Click count or host flags.
    pub detail: Detail,
    /// Whether the host produced this event from real user input.
    pub is_trusted: bool,
    /// Position in page space.
    pub page: Point,
    /// Position relative to the canvas's top-left corner.
    pub viewport: Point,
    /// Kind-specific data.
    pub payload: EventPayload,
    /// Backing native event.
    pub native_event: Option<NativeEvent>,
    target: Option<N>,
    pub(crate) phase: Phase,
    pub(crate) path: Vec<N>,
    pub(crate) propagation_stopped: bool,
    pub(crate) propagation_immediately_stopped: bool,
    manager: ManagerId,
}

impl<N: Copy + Eq> FederatedEvent<N> {
    pub(crate) fn new(manager: ManagerId, kind: EventKind) -> Self {
        Self {
            event_type: Cow::Borrowed(""),
            current_target: None,
            time_stamp: 0.0,
            detail: Detail::None,
            is_trusted: false,
            page: Point::ZERO,
            viewport: Point::ZERO,
            payload: EventPayload::empty(kind),
            native_event: None,
            target: None,
            phase: Phase::None,
            path: Vec::new(),
            propagation_stopped: false,
            propagation_immediately_stopped: false,
            manager,
        }
    }

    /// Put the routing state back to its initial values. Keeps the path's capacity.
    pub(crate) fn reset(&mut self) {
        self.phase = Phase::None;
        self.current_target = None;
        self.path.clear();
        self.target = None;
    }

    /// The node the event is aimed at.
    #[must_use]
    pub fn target(&self) -> Option<N> {
        self.target
    }

    /// Retarget the event. Invalidates the cached composed path.
    pub fn set_target(&mut self, target: Option<N>) {
        if self.target != target {
            self.path.clear();
        }
        self.target = target;
    }

    /// Current propagation phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The cached composed path (target first, root last).
    ///
    /// Empty until the dispatcher computes it, and after the target changes.
    #[must_use]
    pub fn composed_path(&self) -> &[N] {
        &self.path
    }

    /// Stop propagation after the current node's listeners finish.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation immediately, skipping remaining listeners on this node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_immediately_stopped = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called during this dispatch.
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether [`stop_immediate_propagation`](Self::stop_immediate_propagation) was called during this dispatch.
    #[must_use]
    pub fn propagation_immediately_stopped(&self) -> bool {
        self.propagation_immediately_stopped
    }

    pub(crate) fn halted(&self) -> bool {
        self.propagation_stopped || self.propagation_immediately_stopped
    }

    /// Identity of the boundary that allocated this event.
    #[must_use]
    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    /// Pool kind, derived from the payload tag.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Pointer data, if this is a pointer event.
    #[must_use]
    pub fn pointer(&self) -> Option<&PointerData> {
        self.payload.pointer()
    }

    /// Wheel data, if this is a wheel event.
    #[must_use]
    pub fn wheel(&self) -> Option<&WheelData> {
        self.payload.wheel()
    }
}

impl<N: fmt::Debug> fmt::Debug for FederatedEvent<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederatedEvent")
            .field("event_type", &self.event_type)
            .field("target", &self.target)
            .field("current_target", &self.current_target)
            .field("phase", &self.phase)
            .field("path", &self.path)
            .field("propagation_stopped", &self.propagation_stopped)
            .field(
                "propagation_immediately_stopped",
                &self.propagation_immediately_stopped,
            )
            .field("time_stamp", &self.time_stamp)
            .field("detail", &self.detail)
            .field("payload", &self.payload)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}
