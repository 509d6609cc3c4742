// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate conversion between client, viewport, and canvas (world) space.
//!
//! - Client ↔ viewport is a 2D offset by the rendering surface's origin in
//!   client space.
//! - Viewport → canvas maps the position to normalized device coordinates
//!   (y up) and applies the camera's `world_transform * projection_inverse`.
//! - Canvas → viewport applies `projection * view`, then maps NDC back to
//!   viewport pixels with a vertical flip.
//!
//! All conversions are pure. The camera is supplied per call.

use core::ops::Mul;

use kurbo::{Point, Rect, Size, Vec2};

use crate::input::InputEvent;

/// A 4×4 matrix, column-major (`cols[column][row]`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mat4 {
    /// Columns.
    pub cols: [[f64; 4]; 4],
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// A translation by `(x, y, z)`.
    #[must_use]
    pub const fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [x, y, z, 1.0];
        m
    }

    /// A non-uniform scale.
    #[must_use]
    pub const fn scale(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = x;
        m.cols[1][1] = y;
        m.cols[2][2] = z;
        m
    }

    /// Transform a point, dividing by the resulting `w` unless it is zero.
    #[must_use]
    pub fn transform_point3(&self, p: [f64; 3]) -> [f64; 3] {
        let v = [p[0], p[1], p[2], 1.0];
        let mut out = [0.0; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|col| self.cols[col][row] * v[col]).sum();
        }
        let w = if out[3] == 0.0 { 1.0 } else { out[3] };
        [out[0] / w, out[1] / w, out[2] / w]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut cols = [[0.0; 4]; 4];
        for (c, col) in cols.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Self { cols }
    }
}

/// The transforms a camera exposes for coordinate conversion.
pub trait Camera {
    /// World → clip projection.
    fn projection(&self) -> Mat4;
    /// Clip → camera inverse projection.
    fn projection_inverse(&self) -> Mat4;
    /// World → camera view transform.
    fn view(&self) -> Mat4;
    /// Camera → world transform (inverse of [`view`](Self::view)).
    fn world_transform(&self) -> Mat4;
}

/// A camera with precomputed matrices.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FixedCamera {
    /// See [`Camera::projection`].
    pub projection: Mat4,
    /// See [`Camera::projection_inverse`].
    pub projection_inverse: Mat4,
    /// See [`Camera::view`].
    pub view: Mat4,
    /// See [`Camera::world_transform`].
    pub world_transform: Mat4,
}

impl FixedCamera {
    /// An orthographic 2D camera looking at `center` with `zoom`, y pointing down.
    ///
    /// At zoom 1 centered on the middle of the canvas, canvas and viewport
    /// coordinates coincide.
    #[must_use]
    pub fn orthographic_2d(size: Size, center: Point, zoom: f64) -> Self {
        let sx = 2.0 * zoom / size.width;
        let sy = -2.0 * zoom / size.height;
        Self {
            projection: Mat4::scale(sx, sy, 1.0),
            projection_inverse: Mat4::scale(1.0 / sx, 1.0 / sy, 1.0),
            view: Mat4::translation(-center.x, -center.y, 0.0),
            world_transform: Mat4::translation(center.x, center.y, 0.0),
        }
    }
}

impl Camera for FixedCamera {
    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn projection_inverse(&self) -> Mat4 {
        self.projection_inverse
    }

    fn view(&self) -> Mat4 {
        self.view
    }

    fn world_transform(&self) -> Mat4 {
        self.world_transform
    }
}

/// Converts positions for one rendering surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateConverter {
    canvas_size: Size,
    client_origin: Point,
}

impl CoordinateConverter {
    /// A converter for a canvas of `canvas_size` whose bounding rectangle in
    /// client space is `client_rect` (`None` places it at the client origin).
    #[must_use]
    pub fn new(canvas_size: Size, client_rect: Option<Rect>) -> Self {
        Self {
            canvas_size,
            client_origin: client_rect.map_or(Point::ZERO, |r| r.origin()),
        }
    }

    /// Canvas size in viewport pixels.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Update after the surface is resized or moved.
    pub fn set_surface(&mut self, canvas_size: Size, client_rect: Option<Rect>) {
        *self = Self::new(canvas_size, client_rect);
    }

    /// Client → viewport.
    #[must_use]
    pub fn client_to_viewport(&self, client: Point) -> Point {
        client - self.client_origin.to_vec2()
    }

    /// Viewport → client.
    #[must_use]
    pub fn viewport_to_client(&self, viewport: Point) -> Point {
        viewport + self.client_origin.to_vec2()
    }

    /// Viewport → canvas (world).
    #[must_use]
    pub fn viewport_to_canvas(&self, viewport: Point, camera: &impl Camera) -> Point {
        let Size { width, height } = self.canvas_size;
        let ndc = [
            viewport.x / width * 2.0 - 1.0,
            (1.0 - viewport.y / height) * 2.0 - 1.0,
            0.0,
        ];
        let m = camera.world_transform() * camera.projection_inverse();
        let [x, y, _] = m.transform_point3(ndc);
        Point::new(x, y)
    }

    /// Canvas (world) → viewport.
    #[must_use]
    pub fn canvas_to_viewport(&self, canvas: Point, camera: &impl Camera) -> Point {
        let Size { width, height } = self.canvas_size;
        let m = camera.projection() * camera.view();
        let [x, y, _] = m.transform_point3([canvas.x, canvas.y, 0.0]);
        Point::new((x + 1.0) / 2.0 * width, (1.0 - (y + 1.0) / 2.0) * height)
    }

    /// Client → canvas (world).
    #[must_use]
    pub fn client_to_canvas(&self, client: Point, camera: &impl Camera) -> Point {
        self.viewport_to_canvas(self.client_to_viewport(client), camera)
    }

    /// Offset of the surface in client space.
    #[must_use]
    pub fn client_offset(&self) -> Vec2 {
        self.client_origin.to_vec2()
    }

    /// Fill an input's viewport and canvas positions from its client position.
    pub fn locate<N>(&self, input: &mut InputEvent<N>, camera: &impl Camera) {
        let viewport = self.client_to_viewport(input.payload.mouse().client);
        input.viewport = viewport;
        input.payload.mouse_mut().canvas = self.viewport_to_canvas(viewport, camera);
    }
}
