// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary configuration.

use kurbo::{Rect, Size};

use crate::dispatcher::PROPAGATION_LIMIT;

/// Default double-click window in milliseconds.
pub const CLICK_INTERVAL: f64 = 200.0;

/// Default idle time, in milliseconds, before an inactive pointer's tracking entry is dropped.
pub const TRACKING_IDLE_TIMEOUT: f64 = 30_000.0;

/// Settings for an [`EventBoundary`](crate::boundary::EventBoundary).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EventConfig {
    /// Canvas size in viewport pixels. Bounds hit testing and NDC mapping.
    pub canvas_size: Size,
    /// The canvas's bounding rectangle in client space. `None` places it at the origin.
    pub client_rect: Option<Rect>,
    /// Maximum hops for chain walks.
    pub propagation_limit: usize,
    /// Maximum gap between clicks of one run, in milliseconds.
    pub click_interval: f64,
    /// Idle time before tracking entries are evicted. `None` keeps them forever.
    pub tracking_idle_timeout: Option<f64>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::ZERO,
            client_rect: None,
            propagation_limit: PROPAGATION_LIMIT,
            click_interval: CLICK_INTERVAL,
            tracking_idle_timeout: Some(TRACKING_IDLE_TIMEOUT),
        }
    }
}

impl EventConfig {
    /// Default settings for a canvas of `canvas_size`.
    #[must_use]
    pub fn new(canvas_size: Size) -> Self {
        Self {
            canvas_size,
            ..Self::default()
        }
    }

    /// Set the client-space bounding rectangle.
    #[must_use]
    pub fn with_client_rect(mut self, rect: Rect) -> Self {
        self.client_rect = Some(rect);
        self
    }

    /// Set the chain-walk limit. Clamped to at least one hop.
    #[must_use]
    pub fn with_propagation_limit(mut self, limit: usize) -> Self {
        self.propagation_limit = limit.max(1);
        self
    }

    /// Set the double-click window.
    #[must_use]
    pub fn with_click_interval(mut self, millis: f64) -> Self {
        self.click_interval = millis;
        self
    }

    /// Set or disable tracking eviction.
    #[must_use]
    pub fn with_tracking_idle_timeout(mut self, millis: Option<f64>) -> Self {
        self.tracking_idle_timeout = millis;
        self
    }
}
