//! CPU tessellation of 2D shapes into colored triangles.
//!
//! All coordinates are screen pixels (origin top-left, y down). Every shape
//! appends to one triangle list, so draw order is submission order.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::f32::consts::TAU;

use crate::color::Rgba;

/// Vertex of the canvas triangle list
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Gradient stop: offset in 0..=1 and color at that offset
pub type Stop = (f32, Rgba);

/// Triangle list accumulated for one frame
#[derive(Debug, Clone)]
pub struct Canvas {
    vertices: Vec<Vertex>,
    size: Vec2,
    segments: usize,
}

impl Canvas {
    /// Canvas of `size` pixels; curves are approximated with `segments` edges
    pub fn new(size: Vec2, segments: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(64 * 1024),
            size,
            segments: segments.max(8),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push(&mut self, position: Vec2, color: Rgba) {
        self.vertices.push(Vertex {
            position: position.to_array(),
            color: color.to_array(),
        });
    }

    fn shaded_triangle(&mut self, a: (Vec2, Rgba), b: (Vec2, Rgba), c: (Vec2, Rgba)) {
        if a.1.a <= 0.0 && b.1.a <= 0.0 && c.1.a <= 0.0 {
            return;
        }
        self.push(a.0, a.1);
        self.push(b.0, b.1);
        self.push(c.0, c.1);
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
        self.shaded_triangle((a, color), (b, color), (c, color));
    }

    /// Quad `a b c d` (in winding order) with per-corner colors
    fn shaded_quad(&mut self, corners: [Vec2; 4], colors: [Rgba; 4]) {
        let [a, b, c, d] = corners;
        self.shaded_triangle((a, colors[0]), (b, colors[1]), (c, colors[2]));
        self.shaded_triangle((a, colors[0]), (c, colors[2]), (d, colors[3]));
    }

    pub fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgba) {
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.shaded_quad(corners, [color; 4]);
    }

    /// Quad shaded from its first edge (`corners[0]→[1]`, offset 0) to its
    /// opposite edge (`corners[3]→[2]`, offset 1)
    pub fn fill_gradient_quad(&mut self, corners: [Vec2; 4], stops: &[Stop]) {
        let [a, b, c, d] = corners;
        for pair in stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            let top = (a.lerp(d, t0), b.lerp(c, t0));
            let bottom = (a.lerp(d, t1), b.lerp(c, t1));
            self.shaded_quad([top.0, top.1, bottom.1, bottom.0], [c0, c0, c1, c1]);
        }
    }

    /// Convex polygon as a triangle fan
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if color.a <= 0.0 || points.len() < 3 {
            return;
        }
        for pair in points[1..].windows(2) {
            self.triangle(points[0], pair[0], pair[1], color);
        }
    }

    fn ellipse_point(&self, center: Vec2, radii: Vec2, angle: f32, i: usize) -> Vec2 {
        let t = i as f32 / self.segments as f32 * TAU;
        center + Vec2::from_angle(angle).rotate(Vec2::new(t.cos() * radii.x, t.sin() * radii.y))
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, angle: f32, color: Rgba) {
        if color.a <= 0.0 || radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        for i in 0..self.segments {
            let p0 = self.ellipse_point(center, radii, angle, i);
            let p1 = self.ellipse_point(center, radii, angle, i + 1);
            self.triangle(center, p0, p1, color);
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill_ellipse(center, Vec2::splat(radius), 0.0, color);
    }

    /// Band between two concentric ellipses, colors blended across it
    fn ellipse_band(
        &mut self,
        center: Vec2,
        inner: (Vec2, Rgba),
        outer: (Vec2, Rgba),
        angle: f32,
    ) {
        if inner.1.a <= 0.0 && outer.1.a <= 0.0 {
            return;
        }
        for i in 0..self.segments {
            let corners = [
                self.ellipse_point(center, inner.0, angle, i),
                self.ellipse_point(center, outer.0, angle, i),
                self.ellipse_point(center, outer.0, angle, i + 1),
                self.ellipse_point(center, inner.0, angle, i + 1),
            ];
            self.shaded_quad(corners, [inner.1, outer.1, outer.1, inner.1]);
        }
    }

    /// Elliptical radial gradient; `radii` is the extent at offset 1
    pub fn fill_radial(&mut self, center: Vec2, radii: Vec2, stops: &[Stop]) {
        let Some(&(first_offset, first)) = stops.first() else {
            return;
        };
        if radii.x <= 0.0 || radii.y <= 0.0 || stops.iter().all(|(_, c)| c.a <= 0.0) {
            return;
        }

        if first_offset > 0.0 {
            self.fill_ellipse(center, radii * first_offset, 0.0, first);
        }
        for pair in stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t0 <= 0.0 {
                // Fan from the center so the gradient has no hole
                for i in 0..self.segments {
                    let p0 = self.ellipse_point(center, radii * t1, 0.0, i);
                    let p1 = self.ellipse_point(center, radii * t1, 0.0, i + 1);
                    self.shaded_triangle((center, c0), (p0, c1), (p1, c1));
                }
            } else {
                self.ellipse_band(center, (radii * t0, c0), (radii * t1, c1), 0.0);
            }
        }
    }

    pub fn radial_glow(&mut self, center: Vec2, radius: f32, stops: &[Stop]) {
        self.fill_radial(center, Vec2::splat(radius), stops);
    }

    pub fn stroke_ellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        angle: f32,
        width: f32,
        color: Rgba,
    ) {
        if color.a <= 0.0 || width <= 0.0 {
            return;
        }
        let half = Vec2::splat(width * 0.5);
        let inner = (radii - half).max(Vec2::ZERO);
        self.ellipse_band(center, (inner, color), (radii + half, color), angle);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.stroke_ellipse(center, Vec2::splat(radius), 0.0, width, color);
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        let Some(direction) = (b - a).try_normalize() else {
            return;
        };
        if color.a <= 0.0 || width <= 0.0 {
            return;
        }
        let normal = direction.perp() * (width * 0.5);
        self.shaded_quad([a + normal, b + normal, b - normal, a - normal], [color; 4]);
    }

    /// Open polyline through `points`; repeat the first point to close it
    pub fn polyline(&mut self, points: impl IntoIterator<Item = Vec2>, width: f32, color: Rgba) {
        let mut points = points.into_iter();
        let Some(mut previous) = points.next() else {
            return;
        };
        for point in points {
            self.line(previous, point, width, color);
            previous = point;
        }
    }
}
