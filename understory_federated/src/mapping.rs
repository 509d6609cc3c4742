// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw-to-synthetic mapping table.
//!
//! Each raw input type maps to an ordered list of [`Gesture`] handlers. Lower
//! priority runs first; equal priorities keep registration order.

use alloc::string::String;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::event::event_types;

/// A gesture handler on the boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Press: `pointerdown` plus touch/mouse variants, records the press path.
    PointerDown,
    /// Release: `pointerup`, outside walks, click synthesis.
    PointerUp,
    /// Motion: out/leave/over/enter transitions, then `pointermove`.
    PointerMove,
    /// Pointer left the canvas.
    PointerOut,
    /// Pointer entered the canvas.
    PointerOver,
    /// Release reported outside the canvas.
    PointerUpOutside,
    /// Wheel rotation.
    Wheel,
}

/// One entry in the mapping table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mapping {
    /// Handler to run.
    pub gesture: Gesture,
    /// Sort key; lower runs first.
    pub priority: i32,
}

/// Ordered raw-type → handler mappings.
#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    mappings: HashMap<String, SmallVec<[Mapping; 2]>>,
}

impl MappingTable {
    /// An empty table. Every input is unmapped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table the boundary starts with.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (ty, gesture) in [
            (event_types::POINTER_DOWN, Gesture::PointerDown),
            (event_types::POINTER_UP, Gesture::PointerUp),
            (event_types::POINTER_MOVE, Gesture::PointerMove),
            (event_types::POINTER_OUT, Gesture::PointerOut),
            (event_types::POINTER_LEAVE, Gesture::PointerOut),
            (event_types::POINTER_OVER, Gesture::PointerOver),
            (event_types::POINTER_UP_OUTSIDE, Gesture::PointerUpOutside),
            (event_types::WHEEL, Gesture::Wheel),
        ] {
            table.add(ty, gesture, 0);
        }
        table
    }

    /// Map `event_type` to `gesture`.
    pub fn add(&mut self, event_type: &str, gesture: Gesture, priority: i32) {
        let list = self.mappings.entry(String::from(event_type)).or_default();
        list.push(Mapping { gesture, priority });
        // Stable, so ties stay in registration order.
        list.sort_by_key(|m| m.priority);
    }

    /// Handlers for `event_type` in run order. Empty if unmapped.
    #[must_use]
    pub fn handlers(&self, event_type: &str) -> &[Mapping] {
        self.mappings
            .get(event_type)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }
}
