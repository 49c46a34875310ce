//! Fixed-step explicit integration and boundary handling.
//!
//! Integration is semi-implicit Euler: velocity first, then position with the
//! new velocity. Boundaries are applied after integration by clamping the
//! position and reflecting the offending velocity component.

use glam::Vec2;

/// Advance a scalar state by one step.
#[inline]
pub fn step_scalar(x: &mut f32, v: &mut f32, a: f32, dt: f32) {
    *v += a * dt;
    *x += *v * dt;
}

/// Advance a 2D state by one step.
#[inline]
pub fn step_vec2(pos: &mut Vec2, vel: &mut Vec2, acc: Vec2, dt: f32) {
    *vel += acc * dt;
    *pos += *vel * dt;
}

/// Speed below which a body touching a boundary is considered at rest.
/// Twice the speed gravity adds in one step, so a resting body never
/// bounces off the velocity it picked up during the step itself.
#[inline]
pub fn settle_speed(gravity: f32, dt: f32) -> f32 {
    2.0 * gravity.abs() * dt
}

/// Reflect a velocity component off a boundary, scaled by restitution.
/// Rebounds slower than `settle_speed` are zeroed.
#[inline]
fn rebound(v: f32, restitution: f32, settle_speed: f32) -> f32 {
    let out = -v * restitution.clamp(0.0, 1.0);
    if out.abs() < settle_speed {
        0.0
    } else {
        out
    }
}

/// Keep a vertical coordinate at or above `floor` (y-up world).
/// Returns true when the body touched the floor this step.
pub fn floor_contact(y: &mut f32, vy: &mut f32, floor: f32, restitution: f32, settle_speed: f32) -> bool {
    if *y > floor {
        return false;
    }
    *y = floor;
    if *vy < 0.0 {
        *vy = rebound(*vy, restitution, settle_speed);
    } else if *vy < settle_speed {
        *vy = 0.0;
    }
    true
}

/// Axis-aligned box that circular bodies are confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

/// Which walls a body touched during `Bounds::confine`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub x: bool,
    pub y: bool,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Clamp a circle of `radius` inside the box, reflecting the velocity
    /// component that points out of the wall it crossed.
    pub fn confine(
        &self,
        pos: &mut Vec2,
        vel: &mut Vec2,
        radius: f32,
        restitution: f32,
        settle_speed: f32,
    ) -> WallHits {
        let lo = self.min + Vec2::splat(radius);
        let hi = (self.max - Vec2::splat(radius)).max(lo);
        let mut hits = WallHits::default();

        if pos.x < lo.x {
            pos.x = lo.x;
            if vel.x < 0.0 {
                vel.x = rebound(vel.x, restitution, settle_speed);
            }
            hits.x = true;
        } else if pos.x > hi.x {
            pos.x = hi.x;
            if vel.x > 0.0 {
                vel.x = rebound(vel.x, restitution, settle_speed);
            }
            hits.x = true;
        }

        if pos.y < lo.y {
            pos.y = lo.y;
            if vel.y < 0.0 {
                vel.y = rebound(vel.y, restitution, settle_speed);
            }
            hits.y = true;
        } else if pos.y > hi.y {
            pos.y = hi.y;
            if vel.y > 0.0 {
                vel.y = rebound(vel.y, restitution, settle_speed);
            }
            hits.y = true;
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_updates_before_position() {
        let mut x = 0.0;
        let mut v = 0.0;
        step_scalar(&mut x, &mut v, 10.0, 0.1);
        assert!((v - 1.0).abs() < 1e-6);
        assert!((x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn resting_body_stays_on_floor() {
        let dt = 0.016;
        let g = 9.8;
        let mut y = 0.0;
        let mut vy = 0.0;
        for _ in 0..100 {
            step_scalar(&mut y, &mut vy, -g, dt);
            floor_contact(&mut y, &mut vy, 0.0, 0.8, settle_speed(g, dt));
            assert_eq!(y, 0.0);
            assert_eq!(vy, 0.0);
        }
    }

    #[test]
    fn floor_reflects_with_restitution() {
        let mut y = -0.5;
        let mut vy = -10.0;
        assert!(floor_contact(&mut y, &mut vy, 0.0, 0.5, 0.1));
        assert_eq!(y, 0.0);
        assert!((vy - 5.0).abs() < 1e-6);
    }

    #[test]
    fn body_resting_on_box_floor_stays_put_under_gravity() {
        // Pixel space, y down: the floor is `max.y`.
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(400.0, 300.0));
        let (g, dt, radius) = (500.0, 0.016, 10.0);
        for restitution in [0.0, 0.5, 1.0] {
            for start_x in [200.0, radius] {
                let rest = Vec2::new(start_x, 300.0 - radius);
                let mut pos = rest;
                let mut vel = Vec2::ZERO;
                for _ in 0..1000 {
                    step_vec2(&mut pos, &mut vel, Vec2::new(0.0, g), dt);
                    let hits = bounds.confine(&mut pos, &mut vel, radius, restitution, settle_speed(g, dt));
                    assert!(hits.y);
                    assert_eq!(pos, rest, "e={} x={}", restitution, start_x);
                    assert_eq!(vel, Vec2::ZERO, "e={} x={}", restitution, start_x);
                }
            }
        }
    }

    #[test]
    fn confine_reflects_offending_component_only() {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let mut pos = Vec2::new(105.0, 50.0);
        let mut vel = Vec2::new(20.0, 3.0);
        let hits = bounds.confine(&mut pos, &mut vel, 10.0, 1.0, 0.0);
        assert!(hits.x && !hits.y);
        assert_eq!(pos, Vec2::new(90.0, 50.0));
        assert_eq!(vel, Vec2::new(-20.0, 3.0));
    }

    #[test]
    fn confine_leaves_inward_velocity_alone() {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let mut pos = Vec2::new(5.0, 50.0);
        let mut vel = Vec2::new(4.0, 0.0);
        bounds.confine(&mut pos, &mut vel, 10.0, 1.0, 0.0);
        assert_eq!(pos.x, 10.0);
        assert_eq!(vel.x, 4.0);
    }
}
