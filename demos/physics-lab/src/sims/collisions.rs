//! Elastic collisions of circular particles in a box.

use std::f32::consts::TAU;

use glam::Vec2;
use lab_engine::core::collision::{resolve_all, total_kinetic_energy, total_momentum};
use lab_engine::core::integrate::{settle_speed, step_vec2};
use lab_engine::{
    ease, Bounds, Canvas, Circle, Color, DisplayDatum, Easing, ParamChange, ParameterSpec, Rng, SimContext,
    SimError, Simulation,
};

use super::time_row;

const SEED: u64 = 42;
const MARGIN: f32 = 20.0;
const SLOW: Color = Color::rgb(0.25, 0.45, 0.9);
const FAST: Color = Color::rgb(0.92, 0.3, 0.2);

#[derive(Debug, Default)]
pub struct Collisions {
    bodies: Vec<Circle>,
    bounds: Option<Bounds>,
    collisions: usize,
}

impl Collisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &[Circle] {
        &self.bodies
    }
}

impl Simulation for Collisions {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("count", "粒子数").range(2.0, 30.0).step(1.0).default_value(8.0).unit("個"),
            ParameterSpec::new("restitution", "反発係数").range(0.0, 1.0).step(0.05).default_value(1.0),
            ParameterSpec::new("gravity", "重力").range(0.0, 500.0).step(10.0).default_value(0.0).unit("px/s²"),
            ParameterSpec::new("initialSpeed", "初速").range(20.0, 400.0).step(10.0).default_value(150.0).unit("px/s"),
            ParameterSpec::new("radius", "半径").range(5.0, 30.0).step(1.0).default_value(15.0).unit("px"),
        ]
    }

    /// Lay the particles out on a grid with seeded jitter, sizes and
    /// headings, so every reset rebuilds the same state.
    fn init_state(&mut self, ctx: &SimContext) {
        let bounds = Bounds::new(
            Vec2::splat(MARGIN),
            Vec2::new(ctx.surface.width - MARGIN, ctx.surface.height - MARGIN),
        );
        let mut rng = Rng::new(SEED);
        let n = ctx.param("count").round().max(1.0) as usize;
        let base_radius = ctx.param("radius");
        let speed = ctx.param("initialSpeed");

        let cols = (n as f32).sqrt().ceil() as usize;
        let rows = n.div_ceil(cols);
        let cell = bounds.size() / Vec2::new(cols as f32, rows as f32);
        let max_radius = (cell.min_element() / 2.0 - 1.0).max(1.0);

        self.bodies = (0..n)
            .map(|i| {
                let radius = (base_radius * rng.range(0.7, 1.3)).min(max_radius);
                let slack = (cell / 2.0 - Vec2::splat(radius)).max(Vec2::ZERO);
                let jitter = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0)) * slack * 0.5;
                let center = bounds.min
                    + Vec2::new((i % cols) as f32 + 0.5, (i / cols) as f32 + 0.5) * cell
                    + jitter;
                let heading = rng.range(0.0, TAU);
                let mass = (radius / base_radius).powi(2);
                Circle::new(center, Vec2::from_angle(heading) * speed, mass, radius)
            })
            .collect();
        self.bounds = Some(bounds);
        self.collisions = 0;
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, _ctx: &SimContext) -> ParamChange {
        match id {
            "count" | "radius" | "initialSpeed" => ParamChange::Reinitialize,
            _ => ParamChange::InPlace,
        }
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        let bounds = self
            .bounds
            .ok_or_else(|| SimError::InvalidGeometry("collision box not initialized".into()))?;
        let g = ctx.param("gravity");
        let e = ctx.param("restitution");
        let acc = Vec2::new(0.0, g);

        for body in &mut self.bodies {
            step_vec2(&mut body.pos, &mut body.vel, acc, ctx.dt);
        }
        self.collisions += resolve_all(&mut self.bodies, e);
        let settle = settle_speed(g, ctx.dt);
        for body in &mut self.bodies {
            bounds.confine(&mut body.pos, &mut body.vel, body.radius, e, settle);
        }
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let n = self.bodies.len().max(1) as f32;
        let mean_speed = self.bodies.iter().map(|b| b.vel.length()).sum::<f32>() / n;
        vec![
            time_row(ctx),
            DisplayDatum::number("粒子数", self.bodies.len() as f32, 0, "個"),
            DisplayDatum::number("衝突回数", self.collisions as f32, 0, "回"),
            DisplayDatum::number("平均の速さ", mean_speed, 1, "px/s"),
            DisplayDatum::number("運動量の大きさ", total_momentum(&self.bodies).length(), 1, "kg·px/s"),
            DisplayDatum::number("運動エネルギー", total_kinetic_energy(&self.bodies), 0, "kg·px²/s²"),
        ]
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        if let Some(bounds) = self.bounds {
            let size = bounds.size();
            canvas.stroke_rect(bounds.min, size.x, size.y, 2.0, ink);
        }
        let reference = (2.0 * ctx.param("initialSpeed")).max(1.0);
        for body in &self.bodies {
            let speed = body.vel.length();
            let color = ease(SLOW, FAST, (speed / reference).min(1.0), Easing::QuadOut);
            canvas.fill_circle(body.pos, body.radius, color);
            canvas.stroke_circle(body.pos, body.radius, 1.0, ink);
            if speed > 1.0 {
                canvas.line(body.pos, body.pos + body.vel * 0.15, 1.5, ink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{ActiveSimulation, SurfaceSize};

    fn boxed() -> ActiveSimulation<Collisions> {
        ActiveSimulation::new(Box::new(Collisions::new()), SurfaceSize::default(), 0.016)
    }

    #[test]
    fn reset_rebuilds_identical_state() {
        let mut sim = boxed();
        let initial = sim.simulation().bodies().to_vec();
        sim.start();
        for _ in 0..50 {
            sim.update().unwrap();
        }
        sim.reset();
        assert_eq!(sim.simulation().bodies(), initial.as_slice());
        sim.reset();
        assert_eq!(sim.simulation().bodies(), initial.as_slice());
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn initial_layout_has_no_overlaps() {
        let mut sim = boxed();
        sim.set_parameter("count", 30.0);
        sim.set_parameter("radius", 30.0);
        let bodies = sim.simulation().bodies();
        assert_eq!(bodies.len(), 30);
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                assert!(a.pos.distance(b.pos) >= a.radius + b.radius, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn elastic_box_conserves_kinetic_energy() {
        let mut sim = boxed();
        let e0 = total_kinetic_energy(sim.simulation().bodies());
        sim.start();
        for _ in 0..500 {
            sim.update().unwrap();
        }
        let e = total_kinetic_energy(sim.simulation().bodies());
        assert!((e - e0).abs() / e0 < 1e-3, "e0={} e={}", e0, e);
        assert!(sim.simulation().collisions > 0);
    }

    #[test]
    fn bodies_stay_inside_box() {
        let mut sim = boxed();
        sim.set_parameter("gravity", 300.0);
        sim.set_parameter("restitution", 0.6);
        sim.start();
        for _ in 0..500 {
            sim.update().unwrap();
        }
        let bounds = sim.simulation().bounds.unwrap();
        for b in sim.simulation().bodies() {
            assert!(b.pos.x >= bounds.min.x + b.radius - 1e-3 && b.pos.x <= bounds.max.x - b.radius + 1e-3);
            assert!(b.pos.y >= bounds.min.y + b.radius - 1e-3 && b.pos.y <= bounds.max.y - b.radius + 1e-3);
        }
    }

    #[test]
    fn count_change_reinitializes() {
        let mut sim = boxed();
        sim.set_parameter("count", 12.0);
        assert_eq!(sim.simulation().bodies().len(), 12);
        sim.set_parameter("restitution", 0.5);
        assert_eq!(sim.simulation().bodies().len(), 12);
    }
}
