// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer tracking: press paths, click history, and the last hover path.
//!
//! Entries are created lazily the first time a pointer id is seen. They are
//! mutated in place by the gesture handlers and removed only by
//! [`TrackingStore::evict_idle`], which drops entries that hold no hover path,
//! no held button, and have been quiet for longer than a timeout.
//!
//! A press path outlives its release: it is dropped only when a release
//! resolves outside the pressed node, so repeated ups still find it.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};

/// The most recent click on one button.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClickHistory<N> {
    /// Consecutive clicks on `target`, each within the click interval of the last.
    pub click_count: u32,
    /// Target of the most recent click.
    pub target: N,
    /// Time of the most recent click, in milliseconds.
    pub time_stamp: f64,
}

/// State kept for one pointer id.
#[derive(Clone, Debug)]
pub struct TrackingData<N> {
    /// Composed path captured at press time, per button.
    pub press_targets_by_button: HashMap<i16, Vec<N>>,
    /// Buttons pressed and not yet released.
    pub held_buttons: HashSet<i16>,
    /// Click history per button.
    pub clicks_by_button: HashMap<i16, ClickHistory<N>>,
    /// Composed path last seen under the pointer, if it is over the scene.
    pub over_targets: Option<Vec<N>>,
    /// Timestamp of the last input for this pointer.
    pub last_activity: f64,
}

impl<N: Copy + Eq> TrackingData<N> {
    fn new(now: f64) -> Self {
        Self {
            press_targets_by_button: HashMap::new(),
            held_buttons: HashSet::new(),
            clicks_by_button: HashMap::new(),
            over_targets: None,
            last_activity: now,
        }
    }

    /// Record a click on `target` and return the updated run length.
    ///
    /// The run continues when the previous click on `button` hit the same
    /// target less than `interval` milliseconds ago; otherwise it restarts at 1.
    pub fn record_click(&mut self, button: i16, target: N, now: f64, interval: f64) -> u32 {
        let click_count = match self.clicks_by_button.get(&button) {
            Some(prev) if prev.target == target && now - prev.time_stamp < interval => {
                prev.click_count + 1
            }
            _ => 1,
        };
        self.clicks_by_button.insert(
            button,
            ClickHistory {
                click_count,
                target,
                time_stamp: now,
            },
        );
        click_count
    }

    /// Whether this entry can be dropped without losing gesture state.
    #[must_use]
    pub fn is_idle(&self, now: f64, timeout: f64) -> bool {
        self.over_targets.is_none()
            && self.held_buttons.is_empty()
            && now - self.last_activity > timeout
    }
}

/// Tracking data keyed by pointer id.
pub struct TrackingStore<N> {
    entries: HashMap<u32, TrackingData<N>>,
}

impl<N: Copy + Eq> TrackingStore<N> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Tracking data for `pointer_id`, if any has been recorded.
    #[must_use]
    pub fn get(&self, pointer_id: u32) -> Option<&TrackingData<N>> {
        self.entries.get(&pointer_id)
    }

    /// Tracking data for `pointer_id`, created if missing, marked active at `now`.
    pub fn entry(&mut self, pointer_id: u32, now: f64) -> &mut TrackingData<N> {
        let data = self
            .entries
            .entry(pointer_id)
            .or_insert_with(|| TrackingData::new(now));
        data.last_activity = now;
        data
    }

    /// Forget `pointer_id`.
    pub fn remove(&mut self, pointer_id: u32) -> Option<TrackingData<N>> {
        self.entries.remove(&pointer_id)
    }

    /// Drop every idle entry. Returns how many were removed.
    pub fn evict_idle(&mut self, now: f64, timeout: f64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, data| !data.is_idle(now, timeout));
        before - self.entries.len()
    }

    /// Number of tracked pointers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pointer is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Copy + Eq> Default for TrackingStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: fmt::Debug> fmt::Debug for TrackingStore<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
