use glam::Vec2;

use crate::api::types::SurfaceSize;

/// Maps a y-up world rectangle onto a y-down pixel surface.
/// Aspect ratio is preserved; the world rectangle is centred in the margin box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View2D {
    /// Pixels per world unit.
    pub scale: f32,
    /// Screen position of the world origin.
    pub origin: Vec2,
}

impl View2D {
    /// Fit `world_min..world_max` into the surface leaving `margin` pixels.
    pub fn fit(surface: SurfaceSize, world_min: Vec2, world_max: Vec2, margin: f32) -> Self {
        let span = (world_max - world_min).max(Vec2::splat(f32::EPSILON));
        let avail = Vec2::new(
            (surface.width - 2.0 * margin).max(1.0),
            (surface.height - 2.0 * margin).max(1.0),
        );
        let scale = (avail.x / span.x).min(avail.y / span.y);
        let used = span * scale;
        let left = margin + (avail.x - used.x) / 2.0;
        let bottom = surface.height - margin - (avail.y - used.y) / 2.0;
        Self {
            scale,
            origin: Vec2::new(left - world_min.x * scale, bottom + world_min.y * scale),
        }
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(self.origin.x + world.x * self.scale, self.origin.y - world.y * self.scale)
    }

    pub fn length(&self, world: f32) -> f32 {
        world * self.scale
    }
}
