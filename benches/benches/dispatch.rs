// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_federated::dispatcher::EventDispatcher;
use understory_federated::hit::{EventPosition, Immediate};
use understory_federated::listeners::{ListenerMap, ListenerOptions};
use understory_federated::pool::EventPool;
use understory_federated::{
    EventBoundary, EventConfig, EventKind, InputEvent, PROPAGATION_LIMIT, PointerData, SceneGraph,
    event_types,
};

/// A single chain: node `n` is the child of `n - 1`, and 0 is the root.
struct Chain;

impl SceneGraph for Chain {
    type Node = u32;

    fn root(&self) -> u32 {
        0
    }

    fn parent_of(&self, node: u32) -> Option<u32> {
        node.checked_sub(1)
    }
}

/// Two siblings (1, 2) under one parent (3), itself a child of the root.
struct Siblings;

impl SceneGraph for Siblings {
    type Node = u32;

    fn root(&self) -> u32 {
        0
    }

    fn parent_of(&self, node: u32) -> Option<u32> {
        match node {
            1 | 2 => Some(3),
            3 => Some(0),
            _ => None,
        }
    }
}

fn listeners_on_chain(depth: u32) -> ListenerMap<u32> {
    let mut map = ListenerMap::new();
    for node in 0..=depth {
        map.add(node, "tap", |e| {
            black_box(e.current_target);
        });
        map.add_with(
            node,
            "tap",
            ListenerOptions {
                once: false,
                capture: true,
            },
            |e| {
                black_box(e.current_target);
            },
        );
    }
    map
}

fn bench_dispatch_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("federated/dispatch");

    for depth in [8_u32, 64, 512] {
        let mut listeners = listeners_on_chain(depth);
        let mut dispatcher = EventDispatcher::new(PROPAGATION_LIMIT);
        let mut pool = EventPool::new();
        group.throughput(Throughput::Elements(u64::from(depth) + 1));

        group.bench_function(BenchmarkId::new("three_phase", depth), |b| {
            b.iter(|| {
                let mut event = pool.allocate(EventKind::Pointer);
                event.event_type = "tap".into();
                event.set_target(Some(depth));
                dispatcher.dispatch(&Chain, &mut listeners, &mut event, None);
                pool.release(black_box(event)).unwrap();
            });
        });

        group.bench_function(BenchmarkId::new("composed_path", depth), |b| {
            b.iter(|| black_box(dispatcher.composed_path(&Chain, black_box(depth))));
        });
    }

    group.finish();
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("federated/gestures");
    let config = EventConfig::new(Size::new(800.0, 600.0));
    let at = Point::new(10.0, 10.0);

    group.bench_function("hover_between_siblings", |b| {
        let picker = Immediate(|p: EventPosition| Some(if p.canvas.x < 0.5 { 1 } else { 2 }));
        let mut boundary = EventBoundary::new(Siblings, ListenerMap::new(), picker, config);
        let mut t = 0.0;
        let mut side = 0.0;
        b.iter(|| {
            t += 1.0;
            side = 1.0 - side;
            let mut data = PointerData::default();
            data.mouse.canvas = Point::new(side, 0.0);
            let input = InputEvent::pointer(event_types::POINTER_MOVE, data)
                .with_viewport(at)
                .with_time_stamp(t);
            pollster::block_on(boundary.map_event(input)).unwrap();
        });
    });

    group.bench_function("click", |b| {
        let picker = Immediate(|_: EventPosition| Some(1));
        let mut boundary = EventBoundary::new(Siblings, ListenerMap::new(), picker, config);
        let mut t = 0.0;
        b.iter(|| {
            for ty in [event_types::POINTER_DOWN, event_types::POINTER_UP] {
                t += 1.0;
                let input = InputEvent::pointer(ty, PointerData::default())
                    .with_viewport(at)
                    .with_time_stamp(t);
                pollster::block_on(boundary.map_event(input)).unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch_depth, bench_gestures);
criterion_main!(benches);
