// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing capability.
//!
//! Picking may need the rendered scene (a GPU readback, a worker), so
//! [`HitTester::pick`] returns a future. Async closures and functions of the
//! shape `Fn(EventPosition) -> impl Future<Output = Option<N>>` implement the
//! trait directly; [`Immediate`] adapts a synchronous picker.
//!
//! The boundary never calls the picker for positions outside the canvas; see
//! [`in_canvas`].

use core::future::{Future, ready};

use kurbo::{Point, Size};

/// Positions of an input in the spaces a picker may want.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EventPosition {
    /// Client (window) space.
    pub client: Point,
    /// Relative to the canvas's top-left corner.
    pub viewport: Point,
    /// Canvas (world) space.
    pub canvas: Point,
}

/// Resolves a position to the topmost node under it.
pub trait HitTester<N> {
    /// The node at `position`, or `None` if nothing is there.
    fn pick(&self, position: EventPosition) -> impl Future<Output = Option<N>>;
}

impl<N, F, Fut> HitTester<N> for F
where
    F: Fn(EventPosition) -> Fut,
    Fut: Future<Output = Option<N>>,
{
    fn pick(&self, position: EventPosition) -> impl Future<Output = Option<N>> {
        self(position)
    }
}

/// A synchronous picker, resolved without suspending.
#[derive(Copy, Clone, Debug)]
pub struct Immediate<F>(pub F);

impl<N, F> HitTester<N> for Immediate<F>
where
    F: Fn(EventPosition) -> Option<N>,
{
    fn pick(&self, position: EventPosition) -> impl Future<Output = Option<N>> {
        ready((self.0)(position))
    }
}

/// Whether a viewport position lies on a canvas of `size`, edges included.
#[must_use]
pub fn in_canvas(viewport: Point, size: Size) -> bool {
    viewport.x >= 0.0 && viewport.y >= 0.0 && viewport.x <= size.width && viewport.y <= size.height
}
