//! Lyon-backed 2D drawing surface.
//!
//! Simulations paint into a `Canvas` during `draw`; the host copies the flat
//! triangle buffer, the field image and the text labels to the browser.
//!
//! # Usage
//!
//! ```ignore
//! canvas.clear(Color::WHITE);
//! canvas.fill_circle(Vec2::new(100.0, 100.0), 12.0, Color::RED);
//! let ink = canvas.ink();
//! canvas.line(a, b, 2.0, ink);
//! canvas.label(Vec2::new(10.0, 20.0), "t = 1.00 s", ink);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};
use serde::Serialize;

use super::color::{diverging, Color};
use crate::core::field::ScalarField;
use crate::extensions::pool::MeshPool;

/// Per-vertex data: position + RGBA. 6 floats = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct CanvasVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl CanvasVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Text drawn by the host on top of the tessellated geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: [u8; 4],
}

/// RGBA8 image with one pixel per field cell, stretched over `dest`.
#[derive(Debug, Clone, Default)]
pub struct FieldImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    /// Destination rectangle on the surface: x, y, width, height.
    pub dest: [f32; 4],
}

/// Tessellated unit of circle geometry, centred at the origin.
#[derive(Debug)]
struct CircleMesh {
    radius: f32,
    /// Triangle list.
    points: Vec<Vec2>,
}

/// Circle meshes are pooled in buckets this many pixels wide.
const CIRCLE_BUCKET: f32 = 2.0;
/// Ink used until the host sets a theme colour.
const DEFAULT_INK: Color = Color::rgb(0.16, 0.16, 0.19);
const TOLERANCE: f32 = 0.5;

struct FillCtor {
    color: Color,
}

impl FillVertexConstructor<CanvasVertex> for FillCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> CanvasVertex {
        let p = vertex.position();
        CanvasVertex { x: p.x, y: p.y, r: self.color.r, g: self.color.g, b: self.color.b, a: self.color.a }
    }
}

struct StrokeCtor {
    color: Color,
}

impl StrokeVertexConstructor<CanvasVertex> for StrokeCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> CanvasVertex {
        let p = vertex.position();
        CanvasVertex { x: p.x, y: p.y, r: self.color.r, g: self.color.g, b: self.color.b, a: self.color.a }
    }
}

/// Drawing surface for one frame.
pub struct Canvas {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<CanvasVertex, u32>,
    buffer: Vec<f32>,
    circles: MeshPool<CircleMesh>,
    field: Option<FieldImage>,
    labels: Vec<TextLabel>,
    background: Color,
    ink: Color,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * CanvasVertex::FLOATS),
            circles: MeshPool::new(CIRCLE_BUCKET),
            field: None,
            labels: Vec::new(),
            background: Color::WHITE,
            ink: DEFAULT_INK,
        }
    }

    /// Drop last frame's content. Pooled meshes return to the free lists.
    pub fn clear(&mut self, background: Color) {
        self.buffer.clear();
        self.labels.clear();
        self.field = None;
        self.circles.release_all();
        self.background = background;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Outline and label colour that reads against the current background.
    pub fn ink(&self) -> Color {
        self.ink
    }

    pub fn set_ink(&mut self, ink: Color) {
        self.ink = ink;
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / CanvasVertex::FLOATS
    }

    /// Raw pointer to the flat float buffer (for zero-copy reads from JS).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn field_image(&self) -> Option<&FieldImage> {
        self.field.as_ref()
    }

    /// Number of distinct circle meshes tessellated so far.
    pub fn pooled_meshes(&self) -> usize {
        self.circles.len()
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn push_vertex(&mut self, p: Vec2, color: Color) {
        self.buffer.extend_from_slice(&[p.x, p.y, color.r, color.g, color.b, color.a]);
    }

    pub fn fill_path(&mut self, path: &Path, color: Color) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillCtor { color }),
        );
        match result {
            Ok(_) => self.flush_geometry(),
            Err(e) => {
                log::warn!("fill tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    pub fn stroke_path(&mut self, path: &Path, width: f32, color: Color) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeCtor { color }),
        );
        match result {
            Ok(_) => self.flush_geometry(),
            Err(e) => {
                log::warn!("stroke tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn polyline_path(points: &[Vec2], closed: bool) -> Option<Path> {
        let (first, rest) = points.split_first()?;
        if !first.is_finite() || rest.iter().any(|p| !p.is_finite()) {
            return None;
        }
        let mut builder = Path::builder();
        builder.begin(point(first.x, first.y));
        for p in rest {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(closed);
        Some(builder.build())
    }

    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = Self::polyline_path(points, true) {
            self.fill_path(&path, color);
        }
    }

    pub fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, color: Color) {
        let points = [
            pos,
            Vec2::new(pos.x + width, pos.y),
            Vec2::new(pos.x + width, pos.y + height),
            Vec2::new(pos.x, pos.y + height),
        ];
        self.fill_polygon(&points, color);
    }

    /// Fill a circle using a pooled mesh from the nearest radius bucket,
    /// rescaled to the exact radius.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let tess = &mut self.fill_tess;
        let handle = self.circles.acquire(radius, |r| tessellate_circle(tess, r));
        let Some(mesh) = self.circles.get(handle) else {
            return;
        };
        let k = radius / mesh.radius;
        let start = self.buffer.len();
        self.buffer.reserve(mesh.points.len() * CanvasVertex::FLOATS);
        for p in &mesh.points {
            let q = center + *p * k;
            self.buffer.extend_from_slice(&[q.x, q.y, color.r, color.g, color.b, color.a]);
        }
        debug_assert_eq!((self.buffer.len() - start) % CanvasVertex::FLOATS, 0);
    }

    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        if let Some(path) = Self::polyline_path(points, false) {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = Self::polyline_path(points, true) {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.stroke_path(&path, width, color);
    }

    pub fn stroke_rect(&mut self, pos: Vec2, width: f32, height: f32, line_width: f32, color: Color) {
        let points = [
            pos,
            Vec2::new(pos.x + width, pos.y),
            Vec2::new(pos.x + width, pos.y + height),
            Vec2::new(pos.x, pos.y + height),
        ];
        self.stroke_polygon(&points, line_width, color);
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        self.stroke_polyline(&[a, b], width, color);
    }

    /// Line with a filled triangular head at `to`. Zero-length arrows draw nothing.
    pub fn arrow(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let dir = (to - from).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let head = (width * 4.0).max(6.0);
        let base = to - dir * head;
        self.line(from, base, width, color);
        let side = dir.perp() * head * 0.5;
        self.push_vertex(to, color);
        self.push_vertex(base + side, color);
        self.push_vertex(base - side, color);
    }

    pub fn label(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        self.labels.push(TextLabel {
            x: pos.x,
            y: pos.y,
            text: text.into(),
            color: color.to_rgba8(),
        });
    }

    /// Paint a scalar field as an image covering its grid, one pixel per cell.
    pub fn paint_field(&mut self, field: &ScalarField) {
        let (w, h) = (field.cols(), field.rows());
        let mut image = self.field.take().unwrap_or_default();
        image.width = w;
        image.height = h;
        image.pixels.clear();
        image.pixels.reserve(w * h * 4);
        for v in field.values() {
            image.pixels.extend_from_slice(&diverging(*v).to_rgba8());
        }
        let cell = field.cell_size();
        image.dest = [0.0, 0.0, w as f32 * cell, h as f32 * cell];
        self.field = Some(image);
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

fn tessellate_circle(tess: &mut FillTessellator, radius: f32) -> CircleMesh {
    let mut builder = Path::builder();
    builder.add_circle(point(0.0, 0.0), radius, lyon::path::Winding::Positive);
    let path = builder.build();

    let mut geometry: VertexBuffers<CanvasVertex, u32> = VertexBuffers::new();
    let result = tess.tessellate_path(
        &path,
        &FillOptions::tolerance(TOLERANCE),
        &mut BuffersBuilder::new(&mut geometry, FillCtor { color: Color::WHITE }),
    );
    let points = match result {
        Ok(_) => geometry
            .indices
            .iter()
            .map(|&i| {
                let v = geometry.vertices[i as usize];
                Vec2::new(v.x, v.y)
            })
            .collect(),
        Err(e) => {
            log::warn!("circle tessellation failed: {:?}", e);
            Vec::new()
        }
    };
    CircleMesh { radius, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn vertex_is_24_bytes() {
        assert_eq!(size_of::<CanvasVertex>(), CanvasVertex::STRIDE_BYTES);
    }

    #[test]
    fn rect_is_two_triangles() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(Vec2::ZERO, 100.0, 50.0, Color::BLUE);
        assert_eq!(canvas.vertex_count(), 6);
    }

    #[test]
    fn circles_reuse_pooled_meshes_across_frames() {
        let mut canvas = Canvas::new();
        for _ in 0..3 {
            canvas.clear(Color::WHITE);
            canvas.fill_circle(Vec2::new(50.0, 50.0), 10.0, Color::RED);
            canvas.fill_circle(Vec2::new(80.0, 50.0), 10.3, Color::RED);
        }
        assert_eq!(canvas.pooled_meshes(), 2);
        assert!(canvas.vertex_count() > 0);
        assert_eq!(canvas.vertex_count() % 3, 0);
    }

    #[test]
    fn circle_is_scaled_to_exact_radius() {
        let mut canvas = Canvas::new();
        canvas.fill_circle(Vec2::ZERO, 11.0, Color::RED);
        let max_r = canvas
            .buffer()
            .chunks(CanvasVertex::FLOATS)
            .map(|v| Vec2::new(v[0], v[1]).length())
            .fold(0.0, f32::max);
        assert!((max_r - 11.0).abs() < 0.05, "max radius {}", max_r);
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut canvas = Canvas::new();
        canvas.fill_circle(Vec2::ZERO, 0.0, Color::RED);
        canvas.fill_circle(Vec2::new(f32::NAN, 0.0), 5.0, Color::RED);
        canvas.arrow(Vec2::ONE, Vec2::ONE, 2.0, Color::RED);
        canvas.fill_polygon(&[Vec2::ZERO, Vec2::ONE], Color::RED);
        canvas.stroke_polyline(&[Vec2::ZERO, Vec2::new(f32::INFINITY, 1.0)], 1.0, Color::RED);
        assert_eq!(canvas.vertex_count(), 0);
    }

    #[test]
    fn ink_survives_clear() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.ink(), DEFAULT_INK);
        canvas.set_ink(Color::WHITE);
        canvas.clear(Color::BLACK);
        assert_eq!(canvas.ink(), Color::WHITE);
    }

    #[test]
    fn clear_drops_frame_content() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(Vec2::ZERO, 10.0, 10.0, Color::BLUE);
        canvas.label(Vec2::ZERO, "x", Color::BLACK);
        canvas.paint_field(&ScalarField::new(8.0, 8.0, 4.0));
        canvas.clear(Color::BLACK);
        assert_eq!(canvas.vertex_count(), 0);
        assert!(canvas.labels().is_empty());
        assert!(canvas.field_image().is_none());
        assert_eq!(canvas.background(), Color::BLACK);
    }

    #[test]
    fn field_image_has_one_pixel_per_cell() {
        let mut canvas = Canvas::new();
        canvas.paint_field(&ScalarField::new(40.0, 20.0, 4.0));
        let image = canvas.field_image().unwrap();
        assert_eq!((image.width, image.height), (10, 5));
        assert_eq!(image.pixels.len(), 10 * 5 * 4);
        assert_eq!(image.dest, [0.0, 0.0, 40.0, 20.0]);
    }
}
