// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_federated --heading-base-level=0

//! Understory Federated: DOM-style events for scene graphs.
//!
//! ## Overview
//!
//! This crate turns raw pointer and wheel input into federated events and
//! propagates them over any tree that implements [`SceneGraph`].
//! Propagation follows the DOM model: capture from the root down, the target
//! itself, then bubble back up. Listeners are addressed by event type, with a
//! `capture` suffix for the capture phase.
//!
//! It does not render and does not implement picking geometry. Bring a
//! [`HitTester`] (which may be async) and a [`ListenerRegistry`] (or use
//! [`ListenerMap`]).
//!
//! ## Pieces
//!
//! - [`event`]: the [`FederatedEvent`] record and its tagged payload.
//! - [`pool`]: per-kind free lists so events are reused rather than reallocated.
//! - [`dispatcher`]: composed paths and capture → target → bubble.
//! - [`gestures`]: down/up/move/over/out/wheel handlers synthesizing
//!   `click`, `pointertap`, enter/leave and the outside variants.
//! - [`tracking`]: per-pointer press paths, click history, and hover path.
//! - [`boundary`]: the owner that ties the above together and serializes input.
//! - [`coords`]: client ↔ viewport ↔ canvas conversion through a camera.
//!
//! ## Workflow
//!
//! 1) Implement [`SceneGraph`] for your tree (parent links plus a root).
//! 2) Build an [`EventBoundary`] with your scene, listeners, and hit tester.
//! 3) Register listeners through [`EventBoundary::listeners_mut`].
//! 4) Feed raw input to [`EventBoundary::map_event`] from your input loop.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use kurbo::{Point, Size};
//! use understory_federated::{
//!     EventBoundary, EventConfig, InputEvent, ListenerMap, PointerData, SceneGraph,
//!     hit::{EventPosition, Immediate},
//! };
//!
//! // 0 is the canvas root; 1 is a button on it.
//! struct Scene;
//! impl SceneGraph for Scene {
//!     type Node = u32;
//!     fn root(&self) -> u32 { 0 }
//!     fn parent_of(&self, node: u32) -> Option<u32> { (node == 1).then_some(0) }
//! }
//!
//! let picker = Immediate(|p: EventPosition| (p.viewport.x < 100.0).then_some(1));
//! let config = EventConfig::new(Size::new(800.0, 600.0));
//! let mut boundary = EventBoundary::new(Scene, ListenerMap::new(), picker, config);
//!
//! let clicks = Rc::new(RefCell::new(Vec::new()));
//! let c = clicks.clone();
//! boundary.listeners_mut().add(0, "click", move |e| {
//!     c.borrow_mut().push((e.target(), e.detail.count()));
//! });
//!
//! let at = Point::new(40.0, 40.0);
//! let down = InputEvent::pointer("pointerdown", PointerData::default()).with_viewport(at);
//! let up = InputEvent::pointer("pointerup", PointerData::default())
//!     .with_viewport(at)
//!     .with_time_stamp(50.0);
//! pollster::block_on(async {
//!     boundary.map_event(down).await?;
//!     boundary.map_event(up).await
//! })
//! .unwrap();
//!
//! // The click bubbled from the button to the root.
//! assert_eq!(*clicks.borrow(), vec![(Some(1), Some(1))]);
//! ```
//!
//! ## Serialized input
//!
//! Gesture handlers borrow the boundary mutably for their whole run, hit test
//! included, so two inputs can never interleave on one boundary. Hosts that
//! collect input while a drain is running buffer it on their side, then hand
//! the batch to [`EventBoundary::push_input`] between drains;
//! [`EventBoundary::process_pending`] maps it strictly in arrival order.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod boundary;
pub mod config;
pub mod coords;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gestures;
pub mod hit;
pub mod input;
pub mod listeners;
pub mod mapping;
pub mod pool;
pub mod scene;
pub mod tracking;

pub use boundary::EventBoundary;
pub use config::EventConfig;
pub use dispatcher::{EventDispatcher, PROPAGATION_LIMIT};
pub use error::EventError;
pub use event::{
    Detail, DetailFlags, EventKind, EventPayload, FederatedEvent, Modifiers, MouseData, Phase,
    PointerData, PointerType, WheelData, event_types,
};
pub use hit::HitTester;
pub use input::{InputEvent, InputOrigin};
pub use listeners::{ListenerKey, ListenerMap, ListenerRegistry};
pub use mapping::Gesture;
pub use scene::SceneGraph;
