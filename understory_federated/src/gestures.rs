// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture handlers: raw pointer and wheel input → federated event sequences.
//!
//! | raw input          | synthesized                                                        |
//! |--------------------|--------------------------------------------------------------------|
//! | `pointerdown`      | `pointerdown`, then `touchstart` / `mousedown` / `rightdown`        |
//! | `pointerup`        | `pointerup`, then `touchend` / `mouseup` / `rightup`; `*upoutside` walk; `click` + `pointertap` |
//! | `pointermove`      | `pointerout` + `pointerleave` walk, `pointerover` + `pointerenter` walk, `pointermove` |
//! | `pointerout`       | `pointerout`, `pointerleave` walk to the root                       |
//! | `pointerover`      | `pointerover`, `pointerenter` walk to the root                      |
//! | `pointerupoutside` | `pointerupoutside` walk from the press target to the root           |
//! | `wheel`            | `wheel`                                                             |
//!
//! Mouse and pen pointers also get the `mouse*` variants; touch pointers get
//! `touch*` where one exists. Handlers ignore inputs of the wrong family.

use alloc::borrow::Cow;

use smallvec::SmallVec;

use crate::boundary::EventBoundary;
use crate::error::EventError;
use crate::event::{Detail, EventPayload, Phase, PointerData, PointerType, event_types as ty};
use crate::hit::HitTester;
use crate::input::InputEvent;
use crate::listeners::ListenerRegistry;
use crate::scene::{SceneGraph, is_ancestor, nearest_cursor};

type Names = SmallVec<[&'static str; 2]>;

fn names(first: &'static str, second: Option<&'static str>) -> Names {
    let mut names = Names::new();
    names.push(first);
    names.extend(second);
    names
}

/// The touch or mouse companion of a pointer event, if this device has one.
fn variant(
    pointer: &PointerData,
    touch: Option<&'static str>,
    right: &'static str,
    mouse: &'static str,
) -> Option<&'static str> {
    match pointer.pointer_type {
        PointerType::Touch => touch,
        PointerType::Mouse | PointerType::Pen if pointer.mouse.is_right_button() => Some(right),
        PointerType::Mouse | PointerType::Pen => Some(mouse),
        PointerType::Unknown => None,
    }
}

impl<S, R, H> EventBoundary<S, R, H>
where
    S: SceneGraph,
    R: ListenerRegistry<S::Node>,
    H: HitTester<S::Node>,
{
    pub(crate) async fn on_pointer_down(
        &mut self,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        let Some(&pointer) = from.payload.pointer() else {
            return Ok(());
        };
        let target = self.resolve_target(from).await;
        let mut e = self.pointer_event(from, from.event_type.clone(), target);

        self.dispatch_event(&mut e, Some(ty::POINTER_DOWN));
        if let Some(name) = variant(
            &pointer,
            Some(ty::TOUCH_START),
            ty::RIGHT_DOWN,
            ty::MOUSE_DOWN,
        ) {
            self.dispatch_event(&mut e, Some(name));
        }

        self.ensure_path(&mut e);
        let data = self.tracking.entry(pointer.pointer_id, from.time_stamp);
        data.held_buttons.insert(pointer.mouse.button);
        if !e.path.is_empty() {
            data.press_targets_by_button
                .insert(pointer.mouse.button, e.path.clone());
        }
        self.release_event(e)
    }

    pub(crate) async fn on_pointer_up(
        &mut self,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        let Some(&pointer) = from.payload.pointer() else {
            return Ok(());
        };
        let now = from.time_stamp;
        let button = pointer.mouse.button;
        let target = self.resolve_target(from).await;
        let mut e = self.pointer_event(from, from.event_type.clone(), target);

        self.dispatch_event(&mut e, Some(ty::POINTER_UP));
        if let Some(name) = variant(&pointer, Some(ty::TOUCH_END), ty::RIGHT_UP, ty::MOUSE_UP) {
            self.dispatch_event(&mut e, Some(name));
        }
        self.ensure_path(&mut e);

        let data = self.tracking.entry(pointer.pointer_id, now);
        data.held_buttons.remove(&button);
        let press_path = data.press_targets_by_button.get(&button).cloned();
        let press_target = press_path
            .as_deref()
            .and_then(|path| self.find_mounted_target(path));

        let mut click_target = press_target;
        if let Some(press) = press_target {
            if !e.path.contains(&press) {
                self.tracking
                    .entry(pointer.pointer_id, now)
                    .press_targets_by_button
                    .remove(&button);
                let up_path = e.path.clone();
                let outside = names(
                    ty::POINTER_UP_OUTSIDE,
                    variant(
                        &pointer,
                        Some(ty::TOUCH_END_OUTSIDE),
                        ty::RIGHT_UP_OUTSIDE,
                        ty::MOUSE_UP_OUTSIDE,
                    ),
                );
                e.phase = Phase::Bubbling;
                click_target =
                    self.walk_up(&mut e, Some(press), false, &outside, |n| up_path.contains(&n));
            }
        }

        if let Some(click_target) = click_target {
            let mut click = self.clone_pointer_event(&e, ty::CLICK);
            click.set_target(Some(click_target));
            let count = self
                .tracking
                .entry(pointer.pointer_id, now)
                .record_click(button, click_target, now, self.config.click_interval);
            click.detail = Detail::Count(count);

            if !e.detail.prevents_click() {
                if matches!(pointer.pointer_type, PointerType::Mouse | PointerType::Touch) {
                    self.dispatch_event(&mut click, Some(ty::CLICK));
                }
                self.dispatch_event(&mut click, Some(ty::POINTER_TAP));
            }
            self.release_event(click)?;
        }
        self.release_event(e)
    }

    pub(crate) async fn on_pointer_move(
        &mut self,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        let Some(&pointer) = from.payload.pointer() else {
            return Ok(());
        };
        let now = from.time_stamp;
        let mouse_like = pointer.pointer_type.is_mouse_like();
        let limit = self.dispatcher.propagation_limit();
        let target = self.resolve_target(from).await;
        let mut e = self.pointer_event(from, from.event_type.clone(), target);
        self.ensure_path(&mut e);

        let previous = self
            .tracking
            .entry(pointer.pointer_id, now)
            .over_targets
            .take();
        let out = previous
            .as_deref()
            .and_then(|path| self.find_mounted_target(path));

        if previous.is_some() && out != target {
            let mut out_event = self.pointer_event(from, Cow::Borrowed(ty::POINTER_OUT), out);
            self.dispatch_event(&mut out_event, Some(ty::POINTER_OUT));
            if mouse_like {
                self.dispatch_event(&mut out_event, Some(ty::MOUSE_OUT));
            }

            if let Some(out) = out.filter(|n| !e.path.contains(n)) {
                let mut leave = self.pointer_event(from, Cow::Borrowed(ty::POINTER_LEAVE), Some(out));
                leave.phase = Phase::AtTarget;
                let leave_names = names(ty::POINTER_LEAVE, mouse_like.then_some(ty::MOUSE_LEAVE));
                self.walk_up(&mut leave, Some(out), true, &leave_names, |n| e.path.contains(&n));
                self.release_event(leave)?;
            }
            self.release_event(out_event)?;
        }

        if let Some(over_target) = target.filter(|&t| out != Some(t)) {
            let mut over = self.clone_pointer_event(&e, ty::POINTER_OVER);
            self.dispatch_event(&mut over, Some(ty::POINTER_OVER));
            if mouse_like {
                self.dispatch_event(&mut over, Some(ty::MOUSE_OVER));
            }

            // Moving from a descendant up to one of its ancestors is not an enter.
            let did_enter = out.is_none_or(|o| !is_ancestor(&self.scene, over_target, o, limit));
            if did_enter {
                let mut enter = self.clone_pointer_event(&e, ty::POINTER_ENTER);
                enter.phase = Phase::AtTarget;
                let enter_names = names(ty::POINTER_ENTER, mouse_like.then_some(ty::MOUSE_ENTER));
                let old_path = previous.as_deref().unwrap_or_default();
                self.walk_up(&mut enter, Some(over_target), true, &enter_names, |n| {
                    old_path.contains(&n)
                });
                self.release_event(enter)?;
            }
            self.release_event(over)?;
        }

        self.dispatch_event(&mut e, Some(ty::POINTER_MOVE));
        if let Some(name) = variant(&pointer, Some(ty::TOUCH_MOVE), ty::MOUSE_MOVE, ty::MOUSE_MOVE) {
            self.dispatch_event(&mut e, Some(name));
        }
        if mouse_like {
            self.cursor = nearest_cursor(&self.scene, e.target(), limit);
        }

        self.ensure_path(&mut e);
        self.tracking.entry(pointer.pointer_id, now).over_targets =
            (!e.path.is_empty()).then(|| e.path.clone());
        self.release_event(e)
    }

    /// The pointer left the canvas.
    pub(crate) async fn on_pointer_out(
        &mut self,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        let Some(&pointer) = from.payload.pointer() else {
            return Ok(());
        };
        let mouse_like = pointer.pointer_type.is_mouse_like();

        let previous = self
            .tracking
            .entry(pointer.pointer_id, from.time_stamp)
            .over_targets
            .take();
        if let Some(previous) = previous {
            let out = self.find_mounted_target(&previous);
            let mut out_event = self.pointer_event(from, Cow::Borrowed(ty::POINTER_OUT), out);
            self.dispatch_event(&mut out_event, Some(ty::POINTER_OUT));
            if mouse_like {
                self.dispatch_event(&mut out_event, Some(ty::MOUSE_OUT));
            }

            let mut leave = self.pointer_event(from, Cow::Borrowed(ty::POINTER_LEAVE), out);
            leave.phase = Phase::AtTarget;
            let leave_names = names(ty::POINTER_LEAVE, mouse_like.then_some(ty::MOUSE_LEAVE));
            self.walk_up(&mut leave, out, true, &leave_names, |_| false);

            self.release_event(out_event)?;
            self.release_event(leave)?;
        }
        self.cursor = None;
        Ok(())
    }

    /// The pointer entered the canvas.
    pub(crate) async fn on_pointer_over(
        &mut self,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        let Some(&pointer) = from.payload.pointer() else {
            return Ok(());
        };
        let mouse_like = pointer.pointer_type.is_mouse_like();
        let target = self.resolve_target(from).await;
        let mut e = self.pointer_event(from, from.event_type.clone(), target);

        self.dispatch_event(&mut e, Some(ty::POINTER_OVER));
        if mouse_like {
            self.dispatch_event(&mut e, Some(ty::MOUSE_OVER));
        }
        if pointer.pointer_type == PointerType::Mouse {
            let limit = self.dispatcher.propagation_limit();
            self.cursor = nearest_cursor(&self.scene, target, limit);
        }

        if target.is_some() {
            let mut enter = self.clone_pointer_event(&e, ty::POINTER_ENTER);
            enter.phase = Phase::AtTarget;
            let enter_names = names(ty::POINTER_ENTER, mouse_like.then_some(ty::MOUSE_ENTER));
            self.walk_up(&mut enter, target, true, &enter_names, |_| false);
            self.release_event(enter)?;
        }

        self.ensure_path(&mut e);
        self.tracking
            .entry(pointer.pointer_id, from.time_stamp)
            .over_targets = (!e.path.is_empty()).then(|| e.path.clone());
        self.release_event(e)
    }

    /// A release reported outside the canvas.
    pub(crate) async fn on_pointer_up_outside(
        &mut self,
        from: &InputEvent<S::Node>,
    ) -> Result<(), EventError> {
        let Some(&pointer) = from.payload.pointer() else {
            return Ok(());
        };
        let data = self.tracking.entry(pointer.pointer_id, from.time_stamp);
        data.held_buttons.remove(&pointer.mouse.button);
        let press_path = data.press_targets_by_button.remove(&pointer.mouse.button);
        let press_target = press_path
            .as_deref()
            .and_then(|path| self.find_mounted_target(path));

        let target = self.resolve_target(from).await;
        let mut e = self.pointer_event(from, from.event_type.clone(), target);

        if press_target.is_some() {
            let outside = names(
                ty::POINTER_UP_OUTSIDE,
                variant(&pointer, None, ty::RIGHT_UP_OUTSIDE, ty::MOUSE_UP_OUTSIDE),
            );
            e.phase = Phase::Bubbling;
            self.walk_up(&mut e, press_target, false, &outside, |_| false);
        }
        self.release_event(e)
    }

    pub(crate) async fn on_wheel(&mut self, from: &InputEvent<S::Node>) -> Result<(), EventError> {
        if !matches!(from.payload, EventPayload::Wheel(_)) {
            return Ok(());
        }
        let target = self.resolve_target(from).await;
        let mut e = self.wheel_event(from, target);
        self.dispatch_event(&mut e, None);
        self.release_event(e)
    }
}
