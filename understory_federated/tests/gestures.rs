// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture synthesis through a full `EventBoundary`.
//!
//! The scene used throughout:
//!
//! ```text
//! 0 (root)
//! ├── 1 (A)
//! │   └── 2 (B, cursor "pointer")
//! │       └── 3 (C)
//! └── 4 (P)
//!     ├── 5 (X)
//!     └── 6 (Y)
//! ```
//!
//! The picker resolves whatever node the test puts "under" the pointer.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Point, Size};
use understory_federated::event::event_types as ty;
use understory_federated::hit::{EventPosition, Immediate};
use understory_federated::listeners::ListenerOptions;
use understory_federated::scene::Cursor;
use understory_federated::{
    Detail, DetailFlags, EventBoundary, EventConfig, EventKind, Gesture, InputEvent, InputOrigin,
    ListenerMap, Phase, PointerData, PointerType, SceneGraph, WheelData,
};

struct Tree {
    parents: HashMap<u32, u32>,
    cursors: HashMap<u32, &'static str>,
}

impl Tree {
    fn new() -> Self {
        Self {
            parents: HashMap::from([(1, 0), (2, 1), (3, 2), (4, 0), (5, 4), (6, 4)]),
            cursors: HashMap::from([(2, "pointer")]),
        }
    }
}

impl SceneGraph for Tree {
    type Node = u32;

    fn root(&self) -> u32 {
        0
    }

    fn parent_of(&self, node: u32) -> Option<u32> {
        self.parents.get(&node).copied()
    }

    fn cursor(&self, node: u32) -> Option<Cursor> {
        self.cursors.get(&node).map(|c| Cow::Borrowed(*c))
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    ty: &'static str,
    node: u32,
    target: Option<u32>,
    phase: Phase,
    detail: Detail,
}

type Picker = Immediate<Box<dyn Fn(EventPosition) -> Option<u32>>>;

struct Fixture {
    boundary: EventBoundary<Tree, ListenerMap<u32>, Picker>,
    under: Rc<Cell<Option<u32>>>,
    picks: Rc<Cell<usize>>,
    log: Rc<RefCell<Vec<Entry>>>,
}

const RECORDED: &[&str] = &[
    ty::POINTER_DOWN,
    ty::POINTER_UP,
    ty::POINTER_UP_OUTSIDE,
    ty::POINTER_MOVE,
    ty::POINTER_OVER,
    ty::POINTER_OUT,
    ty::POINTER_ENTER,
    ty::POINTER_LEAVE,
    ty::CLICK,
    ty::POINTER_TAP,
    ty::WHEEL,
    ty::MOUSE_DOWN,
    ty::MOUSE_UP,
    ty::MOUSE_UP_OUTSIDE,
    ty::MOUSE_MOVE,
    ty::MOUSE_OVER,
    ty::MOUSE_OUT,
    ty::MOUSE_ENTER,
    ty::MOUSE_LEAVE,
    ty::RIGHT_DOWN,
    ty::RIGHT_UP,
    ty::RIGHT_UP_OUTSIDE,
    ty::TOUCH_START,
    ty::TOUCH_END,
    ty::TOUCH_END_OUTSIDE,
    ty::TOUCH_MOVE,
];

impl Fixture {
    fn new() -> Self {
        Self::with_config(EventConfig::new(Size::new(800.0, 600.0)))
    }

    fn with_config(config: EventConfig) -> Self {
        let under = Rc::new(Cell::new(None));
        let picks = Rc::new(Cell::new(0));
        let (u, p) = (under.clone(), picks.clone());
        let picker: Picker = Immediate(Box::new(move |_: EventPosition| {
            p.set(p.get() + 1);
            u.get()
        }));
        let mut boundary = EventBoundary::new(Tree::new(), ListenerMap::new(), picker, config);

        let log = Rc::new(RefCell::new(Vec::new()));
        for node in 0..=6 {
            for &name in RECORDED {
                let log = log.clone();
                boundary.listeners_mut().add(node, name, move |e| {
                    log.borrow_mut().push(Entry {
                        ty: name,
                        node,
                        target: e.target(),
                        phase: e.phase(),
                        detail: e.detail,
                    });
                });
            }
        }
        Self {
            boundary,
            under,
            picks,
            log,
        }
    }

    fn run(&mut self, input: InputEvent<u32>) {
        pollster::block_on(self.boundary.map_event(input)).unwrap();
    }

    /// Put `node` under the pointer and send a raw pointer input there.
    fn send(&mut self, name: &'static str, node: u32, time_stamp: f64) {
        self.send_with(name, node, time_stamp, mouse());
    }

    fn send_with(&mut self, name: &'static str, node: u32, time_stamp: f64, data: PointerData) {
        self.under.set(Some(node));
        self.run(
            InputEvent::pointer(name, data)
                .with_viewport(Point::new(10.0, 10.0))
                .with_time_stamp(time_stamp),
        );
    }

    fn click(&mut self, node: u32, time_stamp: f64) {
        self.send(ty::POINTER_DOWN, node, time_stamp);
        self.send(ty::POINTER_UP, node, time_stamp + 10.0);
    }

    /// Nodes where `name` ran with the node as its target.
    fn at_target(&self, name: &str) -> Vec<u32> {
        self.log
            .borrow()
            .iter()
            .filter(|e| e.ty == name && e.phase == Phase::AtTarget)
            .map(|e| e.node)
            .collect()
    }

    /// Every node `name` ran on, in order.
    fn visited(&self, name: &str) -> Vec<u32> {
        self.log
            .borrow()
            .iter()
            .filter(|e| e.ty == name)
            .map(|e| e.node)
            .collect()
    }

    fn details(&self, name: &str) -> Vec<Detail> {
        self.log
            .borrow()
            .iter()
            .filter(|e| e.ty == name && e.phase == Phase::AtTarget)
            .map(|e| e.detail)
            .collect()
    }

    fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

fn mouse() -> PointerData {
    PointerData {
        pointer_id: 1,
        pointer_type: PointerType::Mouse,
        is_primary: true,
        ..PointerData::default()
    }
}

fn device(pointer_type: PointerType) -> PointerData {
    PointerData {
        pointer_type,
        ..mouse()
    }
}

#[test]
fn single_click_emits_click_and_tap_once() {
    let mut fx = Fixture::new();
    fx.click(3, 0.0);

    assert_eq!(fx.at_target(ty::POINTER_DOWN), [3]);
    assert_eq!(fx.at_target(ty::MOUSE_DOWN), [3]);
    assert_eq!(fx.at_target(ty::MOUSE_UP), [3]);
    assert_eq!(fx.at_target(ty::CLICK), [3]);
    assert_eq!(fx.at_target(ty::POINTER_TAP), [3]);
    assert_eq!(fx.details(ty::CLICK), [Detail::Count(1)]);
    assert_eq!(fx.details(ty::POINTER_TAP), [Detail::Count(1)]);
    // The click bubbles like any other event.
    assert_eq!(fx.visited(ty::CLICK), [3, 2, 1, 0]);
    assert!(
        fx.log
            .borrow()
            .iter()
            .filter(|e| e.ty == ty::CLICK)
            .all(|e| e.target == Some(3))
    );
}

#[test]
fn double_click_counts_then_resets() {
    let mut fx = Fixture::new();
    fx.click(3, 0.0);
    fx.click(3, 50.0);
    fx.click(3, 400.0);

    assert_eq!(
        fx.details(ty::POINTER_TAP),
        [Detail::Count(1), Detail::Count(2), Detail::Count(1)]
    );
}

#[test]
fn clicks_on_different_targets_do_not_chain() {
    let mut fx = Fixture::new();
    fx.click(3, 0.0);
    fx.click(5, 20.0);
    assert_eq!(fx.details(ty::POINTER_TAP), [Detail::Count(1), Detail::Count(1)]);
}

#[test]
fn release_outside_walks_up_to_the_up_path() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_DOWN, 3, 0.0);
    fx.clear();
    fx.send(ty::POINTER_UP, 1, 10.0);

    assert_eq!(fx.visited(ty::POINTER_UP_OUTSIDE), [3, 2]);
    assert_eq!(fx.visited(ty::MOUSE_UP_OUTSIDE), [3, 2]);
    assert!(fx.visited(ty::TOUCH_END_OUTSIDE).is_empty());
    // The walk stopped at A, which becomes the click target.
    assert_eq!(fx.at_target(ty::CLICK), [1]);
    assert!(
        fx.boundary
            .tracking()
            .get(1)
            .unwrap()
            .press_targets_by_button
            .is_empty()
    );
}

#[test]
fn release_inside_keeps_the_press_path() {
    let mut fx = Fixture::new();
    fx.click(3, 0.0);
    let data = fx.boundary.tracking().get(1).unwrap();
    assert_eq!(data.press_targets_by_button[&0], [3, 2, 1, 0]);
    assert!(data.held_buttons.is_empty());

    // A repeated up still resolves against the earlier press.
    fx.clear();
    fx.send(ty::POINTER_UP, 3, 50.0);
    assert_eq!(fx.details(ty::POINTER_TAP), [Detail::Count(2)]);

    // So does a later release reported outside the canvas.
    fx.clear();
    fx.run(
        InputEvent::pointer(ty::POINTER_UP_OUTSIDE, mouse())
            .with_origin(InputOrigin::Outside)
            .with_time_stamp(60.0),
    );
    assert_eq!(fx.visited(ty::POINTER_UP_OUTSIDE), [3, 2, 1, 0]);
    assert!(
        fx.boundary
            .tracking()
            .get(1)
            .unwrap()
            .press_targets_by_button
            .is_empty()
    );
}

#[test]
fn release_off_canvas_has_no_click() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_DOWN, 3, 0.0);
    fx.clear();
    fx.run(
        InputEvent::pointer(ty::POINTER_UP, mouse())
            .with_origin(InputOrigin::Outside)
            .with_time_stamp(10.0),
    );

    assert_eq!(fx.visited(ty::POINTER_UP_OUTSIDE), [3, 2, 1, 0]);
    assert!(fx.visited(ty::CLICK).is_empty());
    assert!(fx.visited(ty::POINTER_TAP).is_empty());
}

#[test]
fn sibling_hover_leaves_and_enters_only_the_siblings() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_MOVE, 5, 0.0);
    fx.clear();
    fx.send(ty::POINTER_MOVE, 6, 10.0);

    assert_eq!(fx.at_target(ty::POINTER_OUT), [5]);
    assert_eq!(fx.visited(ty::POINTER_LEAVE), [5]);
    assert_eq!(fx.visited(ty::MOUSE_LEAVE), [5]);
    assert_eq!(fx.at_target(ty::POINTER_OVER), [6]);
    assert_eq!(fx.visited(ty::POINTER_ENTER), [6]);
    assert_eq!(fx.visited(ty::MOUSE_ENTER), [6]);
    assert_eq!(fx.at_target(ty::POINTER_MOVE), [6]);
    assert_eq!(fx.at_target(ty::MOUSE_MOVE), [6]);

    // Order within one move: out, leave, over, enter, move.
    let order: Vec<&str> = fx
        .log
        .borrow()
        .iter()
        .filter(|e| e.phase == Phase::AtTarget && e.ty.starts_with("pointer"))
        .map(|e| e.ty)
        .collect();
    assert_eq!(
        order,
        [
            ty::POINTER_OUT,
            ty::POINTER_LEAVE,
            ty::POINTER_OVER,
            ty::POINTER_ENTER,
            ty::POINTER_MOVE
        ]
    );
}

#[test]
fn first_move_enters_the_whole_chain() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_MOVE, 3, 0.0);

    assert!(fx.visited(ty::POINTER_OUT).is_empty());
    assert_eq!(fx.at_target(ty::POINTER_OVER), [3]);
    assert_eq!(fx.visited(ty::POINTER_ENTER), [3, 2, 1, 0]);
    assert_eq!(
        fx.boundary.tracking().get(1).unwrap().over_targets.as_deref(),
        Some(&[3, 2, 1, 0][..])
    );
}

#[test]
fn moving_up_to_an_ancestor_is_not_an_enter() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_MOVE, 3, 0.0);
    fx.clear();
    fx.send(ty::POINTER_MOVE, 2, 10.0);

    assert_eq!(fx.at_target(ty::POINTER_OUT), [3]);
    assert_eq!(fx.visited(ty::POINTER_LEAVE), [3]);
    assert_eq!(fx.at_target(ty::POINTER_OVER), [2]);
    assert!(fx.visited(ty::POINTER_ENTER).is_empty());
}

#[test]
fn moving_within_a_target_only_moves() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_MOVE, 3, 0.0);
    fx.clear();
    fx.send(ty::POINTER_MOVE, 3, 10.0);

    assert!(fx.visited(ty::POINTER_OUT).is_empty());
    assert!(fx.visited(ty::POINTER_OVER).is_empty());
    assert_eq!(fx.at_target(ty::POINTER_MOVE), [3]);
}

#[test]
fn touch_moves_get_touch_variants() {
    let mut fx = Fixture::new();
    fx.send_with(ty::POINTER_MOVE, 3, 0.0, device(PointerType::Touch));

    assert_eq!(fx.at_target(ty::TOUCH_MOVE), [3]);
    assert!(fx.visited(ty::MOUSE_MOVE).is_empty());
    assert!(fx.visited(ty::MOUSE_ENTER).is_empty());
    assert_eq!(fx.visited(ty::POINTER_ENTER), [3, 2, 1, 0]);
}

#[test]
fn leaving_the_canvas_leaves_every_ancestor() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_MOVE, 3, 0.0);
    assert_eq!(fx.boundary.cursor(), Some("pointer"));
    fx.clear();

    fx.send(ty::POINTER_LEAVE, 0, 10.0);

    assert_eq!(fx.at_target(ty::POINTER_OUT), [3]);
    assert_eq!(fx.at_target(ty::MOUSE_OUT), [3]);
    assert_eq!(fx.visited(ty::POINTER_LEAVE), [3, 2, 1, 0]);
    assert_eq!(fx.boundary.cursor(), None);
    assert!(fx.boundary.tracking().get(1).unwrap().over_targets.is_none());
}

#[test]
fn leaving_without_hover_only_clears_cursor() {
    let mut fx = Fixture::new();
    assert_eq!(fx.boundary.cursor(), Some("default"));
    fx.send(ty::POINTER_OUT, 0, 0.0);

    assert!(fx.log.borrow().is_empty());
    assert_eq!(fx.boundary.cursor(), None);
}

#[test]
fn entering_the_canvas_enters_every_ancestor() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_OVER, 3, 0.0);

    assert_eq!(fx.at_target(ty::POINTER_OVER), [3]);
    assert_eq!(fx.at_target(ty::MOUSE_OVER), [3]);
    assert_eq!(fx.visited(ty::POINTER_ENTER), [3, 2, 1, 0]);
    assert_eq!(fx.visited(ty::MOUSE_ENTER), [3, 2, 1, 0]);
    assert_eq!(fx.boundary.cursor(), Some("pointer"));
    assert_eq!(
        fx.boundary.tracking().get(1).unwrap().over_targets.as_deref(),
        Some(&[3, 2, 1, 0][..])
    );
}

#[test]
fn pen_over_keeps_cursor() {
    let mut fx = Fixture::new();
    fx.send_with(ty::POINTER_OVER, 3, 0.0, device(PointerType::Pen));
    assert_eq!(fx.boundary.cursor(), Some("default"));
    assert_eq!(fx.at_target(ty::MOUSE_OVER), [3]);
}

#[test]
fn cursor_follows_nearest_ancestor_attribute() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_MOVE, 3, 0.0);
    assert_eq!(fx.boundary.cursor(), Some("pointer"));
    fx.send(ty::POINTER_MOVE, 5, 10.0);
    assert_eq!(fx.boundary.cursor(), None);
}

#[test]
fn native_up_outside_walks_from_press_to_root() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_DOWN, 3, 0.0);
    fx.clear();
    fx.run(
        InputEvent::pointer(ty::POINTER_UP_OUTSIDE, mouse())
            .with_origin(InputOrigin::Outside)
            .with_time_stamp(10.0),
    );

    assert_eq!(fx.visited(ty::POINTER_UP_OUTSIDE), [3, 2, 1, 0]);
    assert_eq!(fx.visited(ty::MOUSE_UP_OUTSIDE), [3, 2, 1, 0]);
    assert!(
        fx.boundary
            .tracking()
            .get(1)
            .unwrap()
            .press_targets_by_button
            .is_empty()
    );

    // Nothing pressed any more: a second report is silent.
    fx.clear();
    fx.run(
        InputEvent::pointer(ty::POINTER_UP_OUTSIDE, mouse())
            .with_origin(InputOrigin::Outside)
            .with_time_stamp(20.0),
    );
    assert!(fx.log.borrow().is_empty());
}

#[test]
fn touch_pointers_get_touch_variants() {
    let mut fx = Fixture::new();
    fx.send_with(ty::POINTER_DOWN, 3, 0.0, device(PointerType::Touch));
    fx.send_with(ty::POINTER_UP, 3, 10.0, device(PointerType::Touch));

    assert_eq!(fx.at_target(ty::TOUCH_START), [3]);
    assert_eq!(fx.at_target(ty::TOUCH_END), [3]);
    assert!(fx.visited(ty::MOUSE_DOWN).is_empty());
    assert_eq!(fx.at_target(ty::CLICK), [3]);
    assert_eq!(fx.at_target(ty::POINTER_TAP), [3]);
}

#[test]
fn pen_taps_without_click() {
    let mut fx = Fixture::new();
    fx.send_with(ty::POINTER_DOWN, 3, 0.0, device(PointerType::Pen));
    fx.send_with(ty::POINTER_UP, 3, 10.0, device(PointerType::Pen));

    assert_eq!(fx.at_target(ty::MOUSE_DOWN), [3]);
    assert!(fx.visited(ty::CLICK).is_empty());
    assert_eq!(fx.at_target(ty::POINTER_TAP), [3]);
}

#[test]
fn right_button_uses_right_variants() {
    let mut fx = Fixture::new();
    let mut data = mouse();
    data.mouse.button = 2;
    fx.send_with(ty::POINTER_DOWN, 3, 0.0, data);
    fx.send_with(ty::POINTER_UP, 3, 10.0, data);

    assert_eq!(fx.at_target(ty::RIGHT_DOWN), [3]);
    assert_eq!(fx.at_target(ty::RIGHT_UP), [3]);
    assert!(fx.visited(ty::MOUSE_DOWN).is_empty());
    assert!(fx.visited(ty::MOUSE_UP).is_empty());
}

#[test]
fn prevent_click_suppresses_click_and_tap() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_DOWN, 3, 0.0);
    fx.run(
        InputEvent::pointer(ty::POINTER_UP, mouse())
            .with_viewport(Point::new(10.0, 10.0))
            .with_time_stamp(10.0)
            .with_detail(Detail::Flags(DetailFlags::PREVENT_CLICK)),
    );

    assert_eq!(fx.at_target(ty::POINTER_UP), [3]);
    assert!(fx.visited(ty::CLICK).is_empty());
    assert!(fx.visited(ty::POINTER_TAP).is_empty());
}

#[test]
fn detached_press_target_resolves_to_mounted_ancestor() {
    let mut fx = Fixture::new();
    fx.send(ty::POINTER_DOWN, 3, 0.0);
    fx.boundary.scene_mut().parents.remove(&3);
    fx.clear();
    fx.send(ty::POINTER_UP, 1, 10.0);

    assert_eq!(fx.visited(ty::POINTER_UP_OUTSIDE), [2]);
    assert_eq!(fx.at_target(ty::CLICK), [1]);
}

#[test]
fn out_of_canvas_positions_skip_the_picker() {
    let mut fx = Fixture::new();
    let outside = EventPosition {
        viewport: Point::new(-5.0, 10.0),
        ..EventPosition::default()
    };
    assert_eq!(pollster::block_on(fx.boundary.hit_test(outside)), None);
    assert_eq!(fx.picks.get(), 0);

    fx.run(
        InputEvent::pointer(ty::POINTER_DOWN, mouse())
            .with_viewport(Point::new(-5.0, 10.0))
            .with_time_stamp(0.0),
    );
    assert_eq!(fx.picks.get(), 0);
    assert!(fx.log.borrow().is_empty());
    assert!(
        fx.boundary
            .tracking()
            .get(1)
            .unwrap()
            .press_targets_by_button
            .is_empty()
    );
}

#[test]
fn element_origin_skips_the_picker() {
    let mut fx = Fixture::new();
    fx.run(
        InputEvent::pointer(ty::POINTER_DOWN, mouse())
            .with_origin(InputOrigin::Element(5))
            .with_time_stamp(0.0),
    );
    assert_eq!(fx.picks.get(), 0);
    assert_eq!(fx.at_target(ty::POINTER_DOWN), [5]);
}

#[test]
fn empty_picks_target_the_root() {
    let mut fx = Fixture::new();
    fx.under.set(None);
    fx.run(
        InputEvent::pointer(ty::POINTER_DOWN, mouse())
            .with_viewport(Point::new(10.0, 10.0))
            .with_time_stamp(0.0),
    );
    assert_eq!(fx.picks.get(), 1);
    assert_eq!(fx.at_target(ty::POINTER_DOWN), [0]);
}

#[test]
fn unmapped_inputs_are_dropped() {
    let mut fx = Fixture::new();
    fx.send("keydown", 3, 0.0);

    assert!(fx.log.borrow().is_empty());
    assert_eq!(fx.picks.get(), 0);
    assert!(fx.boundary.tracking().is_empty());
}

#[test]
fn custom_mappings_run_in_priority_order() {
    let mut fx = Fixture::new();
    // Registered up-first; priority puts down first, so the pair forms a click.
    fx.boundary.add_event_mapping("tap", Gesture::PointerUp, 1);
    fx.boundary.add_event_mapping("tap", Gesture::PointerDown, 0);
    fx.send("tap", 3, 0.0);

    assert_eq!(fx.at_target(ty::POINTER_DOWN), [3]);
    assert_eq!(fx.at_target(ty::POINTER_UP), [3]);
    assert_eq!(fx.at_target(ty::CLICK), [3]);
}

#[test]
fn pointer_gestures_ignore_wheel_input() {
    let mut fx = Fixture::new();
    fx.boundary
        .add_event_mapping(ty::WHEEL, Gesture::PointerDown, 1);
    fx.under.set(Some(3));
    fx.run(
        InputEvent::wheel(WheelData::default())
            .with_viewport(Point::new(10.0, 10.0))
            .with_time_stamp(0.0),
    );
    assert_eq!(fx.at_target(ty::WHEEL), [3]);
    assert!(fx.visited(ty::POINTER_DOWN).is_empty());
}

#[test]
fn wheel_reaches_the_hit_target_with_deltas() {
    let mut fx = Fixture::new();
    let deltas = Rc::new(RefCell::new(Vec::new()));
    let d = deltas.clone();
    fx.boundary.listeners_mut().add(3, ty::WHEEL, move |e| {
        d.borrow_mut().push(e.wheel().map(|w| w.delta_y));
    });
    fx.under.set(Some(3));
    fx.run(
        InputEvent::wheel(WheelData {
            delta_y: 3.0,
            ..WheelData::default()
        })
        .with_viewport(Point::new(10.0, 10.0)),
    );

    assert_eq!(*deltas.borrow(), [Some(3.0)]);
    assert_eq!(fx.visited(ty::WHEEL), [3, 2, 1, 0]);
    assert_eq!(fx.boundary.pool().free_count(EventKind::Wheel), 1);
}

#[test]
fn queued_inputs_run_in_arrival_order() {
    let mut fx = Fixture::new();
    fx.under.set(Some(3));
    for (name, t) in [(ty::POINTER_DOWN, 0.0), (ty::POINTER_UP, 10.0)] {
        fx.boundary.push_input(
            InputEvent::pointer(name, mouse())
                .with_viewport(Point::new(10.0, 10.0))
                .with_time_stamp(t),
        );
    }
    assert_eq!(fx.boundary.pending_len(), 2);
    assert!(fx.log.borrow().is_empty());

    pollster::block_on(fx.boundary.process_pending()).unwrap();

    assert_eq!(fx.boundary.pending_len(), 0);
    assert_eq!(fx.at_target(ty::CLICK), [3]);
}

#[test]
fn stopping_one_dispatch_does_not_stop_its_companion() {
    let mut fx = Fixture::new();
    fx.boundary.listeners_mut().add_with(
        0,
        ty::POINTER_DOWN,
        ListenerOptions {
            once: false,
            capture: true,
        },
        |e| e.stop_propagation(),
    );
    fx.send(ty::POINTER_DOWN, 3, 0.0);

    assert!(fx.visited(ty::POINTER_DOWN).is_empty());
    assert_eq!(fx.at_target(ty::MOUSE_DOWN), [3]);
}

#[test]
fn subscribers_see_every_tap() {
    let mut fx = Fixture::new();
    let taps = Rc::new(RefCell::new(Vec::new()));
    let t = taps.clone();
    fx.boundary
        .dispatcher_mut()
        .subscribe(ty::POINTER_TAP, move |e| t.borrow_mut().push(e.target()));
    fx.click(3, 0.0);
    fx.click(5, 100.0);

    assert_eq!(*taps.borrow(), [Some(3), Some(5)]);
}

#[test]
fn pooled_events_are_reused_across_gestures() {
    let mut fx = Fixture::new();
    fx.click(3, 0.0);
    let after_first = fx.boundary.pool().free_count(EventKind::Pointer);
    assert!(after_first > 0);
    fx.click(3, 500.0);
    fx.send(ty::POINTER_MOVE, 5, 600.0);
    fx.send(ty::POINTER_MOVE, 6, 610.0);
    let after_more = fx.boundary.pool().free_count(EventKind::Pointer);
    fx.send(ty::POINTER_MOVE, 5, 620.0);
    fx.send(ty::POINTER_MOVE, 6, 630.0);
    assert_eq!(fx.boundary.pool().free_count(EventKind::Pointer), after_more);
}

#[test]
fn idle_pointers_are_evicted() {
    let mut fx = Fixture::with_config(
        EventConfig::new(Size::new(800.0, 600.0)).with_tracking_idle_timeout(Some(1_000.0)),
    );
    let touch = PointerData {
        pointer_id: 7,
        ..device(PointerType::Touch)
    };
    fx.send_with(ty::POINTER_DOWN, 3, 0.0, touch);
    fx.send_with(ty::POINTER_UP, 3, 10.0, touch);
    assert!(fx.boundary.tracking().get(7).is_some());

    fx.send(ty::POINTER_MOVE, 3, 5_000.0);

    assert!(fx.boundary.tracking().get(7).is_none());
    assert!(fx.boundary.tracking().get(1).is_some());
}

#[test]
fn pressed_pointers_are_never_evicted() {
    let mut fx = Fixture::with_config(
        EventConfig::new(Size::new(800.0, 600.0)).with_tracking_idle_timeout(Some(1_000.0)),
    );
    let touch = PointerData {
        pointer_id: 7,
        ..device(PointerType::Touch)
    };
    fx.send_with(ty::POINTER_DOWN, 3, 0.0, touch);
    fx.send(ty::POINTER_MOVE, 3, 5_000.0);
    assert!(fx.boundary.tracking().get(7).is_some());
}

#[test]
fn zero_propagation_limit_still_walks_the_target() {
    let mut config = EventConfig::new(Size::new(800.0, 600.0));
    config.propagation_limit = 0;
    let mut fx = Fixture::with_config(config);
    fx.send(ty::POINTER_MOVE, 3, 0.0);

    assert_eq!(fx.visited(ty::POINTER_ENTER), [3]);
}
