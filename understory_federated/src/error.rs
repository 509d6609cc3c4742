// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the event boundary.

use crate::event::ManagerId;

/// Errors raised by the event pool and the gesture handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// An event was released to a pool that did not allocate it.
    ///
    /// This is a programming error; the handler that hit it is aborted.
    #[error("event allocated by boundary {manager} was released to boundary {owner}")]
    ForeignEvent {
        /// The pool the event was released to.
        owner: ManagerId,
        /// The boundary that allocated the event.
        manager: ManagerId,
    },
}
