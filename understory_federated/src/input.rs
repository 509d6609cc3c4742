// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input records handed to the boundary by the host's input loop.

use alloc::borrow::Cow;

use kurbo::Point;

use crate::event::{Detail, EventPayload, NativeEvent, PointerData, WheelData, event_types};
use crate::hit::EventPosition;

/// Where a raw input came from, which decides how its target is resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputOrigin<N> {
    /// The canvas itself; the target is found by hit testing.
    #[default]
    Canvas,
    /// An overlay element the host already resolved. Hit testing is skipped.
    Element(N),
    /// Somewhere other than the canvas; the target is `None`.
    Outside,
}

/// A raw input event, normalized by the host.
#[derive(Clone, Debug)]
pub struct InputEvent<N> {
    /// Raw type, used to look up the mapping table.
    pub event_type: Cow<'static, str>,
    /// Timestamp in milliseconds.
    pub time_stamp: f64,
    /// Host detail, for example [`DetailFlags::PREVENT_CLICK`](crate::event::DetailFlags::PREVENT_CLICK).
    pub detail: Detail,
    /// Whether this came from real user input.
    pub is_trusted: bool,
    /// Position in page space.
    pub page: Point,
    /// Position relative to the canvas's top-left corner.
    pub viewport: Point,
    /// Kind-specific data.
    pub payload: EventPayload,
    /// How to resolve the target.
    pub origin: InputOrigin<N>,
    /// Backing native event, carried through untouched.
    pub native_event: Option<NativeEvent>,
}

impl<N> InputEvent<N> {
    /// A raw pointer input of the given type.
    pub fn pointer(event_type: impl Into<Cow<'static, str>>, data: PointerData) -> Self {
        Self::new(event_type.into(), EventPayload::Pointer(data))
    }

    /// A raw `wheel` input.
    pub fn wheel(data: WheelData) -> Self {
        Self::new(Cow::Borrowed(event_types::WHEEL), EventPayload::Wheel(data))
    }

    fn new(event_type: Cow<'static, str>, payload: EventPayload) -> Self {
        Self {
            event_type,
            time_stamp: 0.0,
            detail: Detail::None,
            is_trusted: true,
            page: Point::ZERO,
            viewport: Point::ZERO,
            payload,
            origin: InputOrigin::Canvas,
            native_event: None,
        }
    }

    /// Set the timestamp in milliseconds.
    #[must_use]
    pub fn with_time_stamp(mut self, time_stamp: f64) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    /// Set the viewport position.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Point) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the detail.
    #[must_use]
    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = detail;
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: InputOrigin<N>) -> Self {
        self.origin = origin;
        self
    }

    /// Attach the host's native event.
    #[must_use]
    pub fn with_native_event(mut self, native: NativeEvent) -> Self {
        self.native_event = Some(native);
        self
    }

    /// Positions used for hit testing.
    #[must_use]
    pub fn position(&self) -> EventPosition {
        let mouse = self.payload.mouse();
        EventPosition {
            client: mouse.client,
            viewport: self.viewport,
            canvas: mouse.canvas,
        }
    }
}
