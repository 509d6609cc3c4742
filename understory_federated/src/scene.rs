// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph capability consumed by the dispatcher and gesture handlers.
//!
//! The engine never owns or mutates the scene. It only needs parent links, a
//! root sentinel where chain walks end, and an optional cursor attribute.

use alloc::borrow::Cow;
use core::fmt::Debug;
use core::hash::Hash;

/// A cursor name, for example `"pointer"` or `"grab"`.
pub type Cursor = Cow<'static, str>;

/// Read access to a tree of event targets.
pub trait SceneGraph {
    /// Node handle. Compared by identity.
    type Node: Copy + Eq + Hash + Debug;

    /// The root sentinel (document or canvas) that terminates chain walks.
    fn root(&self) -> Self::Node;

    /// Parent of `node`, or `None` for the root and for detached nodes.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Cursor attribute set directly on `node`, if any.
    fn cursor(&self, node: Self::Node) -> Option<Cursor> {
        let _ = node;
        None
    }
}

/// Next node when walking towards the root; `None` after the root.
pub(crate) fn step_up<S: SceneGraph>(scene: &S, node: S::Node) -> Option<S::Node> {
    if node == scene.root() {
        None
    } else {
        scene.parent_of(node)
    }
}

/// Whether `ancestor` is a strict ancestor of `node`, looking at most `limit` hops up.
pub(crate) fn is_ancestor<S: SceneGraph>(
    scene: &S,
    ancestor: S::Node,
    node: S::Node,
    limit: usize,
) -> bool {
    let mut current = step_up(scene, node);
    for _ in 0..limit {
        match current {
            Some(n) if n == ancestor => return true,
            Some(n) => current = step_up(scene, n),
            None => return false,
        }
    }
    false
}

/// Nearest cursor attribute on `node` or one of its ancestors.
pub(crate) fn nearest_cursor<S: SceneGraph>(
    scene: &S,
    node: Option<S::Node>,
    limit: usize,
) -> Option<Cursor> {
    let mut current = node;
    for _ in 0..limit {
        let n = current?;
        if let Some(cursor) = scene.cursor(n) {
            return Some(cursor);
        }
        current = step_up(scene, n);
    }
    None
}
