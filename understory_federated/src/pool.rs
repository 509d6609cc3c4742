// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event pool: per-kind LIFO free lists of released events.
//!
//! ## Usage
//!
//! 1) [`EventPool::allocate`] pops a released event of the requested kind, or
//!    builds a new one. Either way the routing state (phase, target, current
//!    target, composed path) is reset before the event is returned.
//! 2) Fill in the event and dispatch it.
//! 3) [`EventPool::release`] hands it back. Only the pool that allocated an
//!    event may take it back; anything else is [`EventError::ForeignEvent`].
//!
//! The pool never shrinks. Its size is bounded by how many events are alive at
//! once, which the input rate bounds.

use alloc::vec::Vec;
use core::fmt;

use crate::error::EventError;
use crate::event::{EventKind, FederatedEvent, ManagerId};

/// Free lists of [`FederatedEvent`]s, one per [`EventKind`].
pub struct EventPool<N> {
    owner: ManagerId,
    free: [Vec<FederatedEvent<N>>; 3],
}

impl<N: Copy + Eq> EventPool<N> {
    /// Create an empty pool with a fresh owner identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            owner: ManagerId::next(),
            free: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Identity stamped into every event this pool creates.
    #[must_use]
    pub fn owner(&self) -> ManagerId {
        self.owner
    }

    /// Take an event of `kind`, reusing a released one when available.
    pub fn allocate(&mut self, kind: EventKind) -> FederatedEvent<N> {
        let mut event = self.free[kind.slot()]
            .pop()
            .unwrap_or_else(|| FederatedEvent::new(self.owner, kind));
        event.reset();
        event
    }

    /// Return an event to its kind's free list.
    pub fn release(&mut self, event: FederatedEvent<N>) -> Result<(), EventError> {
        if event.manager() != self.owner {
            return Err(EventError::ForeignEvent {
                owner: self.owner,
                manager: event.manager(),
            });
        }
        self.free[event.kind().slot()].push(event);
        Ok(())
    }

    /// Number of released events waiting for reuse.
    #[must_use]
    pub fn free_count(&self, kind: EventKind) -> usize {
        self.free[kind.slot()].len()
    }
}

impl<N: Copy + Eq> Default for EventPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for EventPool<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPool")
            .field("owner", &self.owner)
            .field("free_pointer", &self.free[0].len())
            .field("free_wheel", &self.free[1].len())
            .field("free_mouse", &self.free[2].len())
            .finish()
    }
}
