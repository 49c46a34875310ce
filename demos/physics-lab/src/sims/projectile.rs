//! Projectile launched at an angle, with optional linear drag.

use glam::Vec2;
use lab_engine::core::integrate::step_vec2;
use lab_engine::{
    Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, SimContext, SimError, Simulation, View2D,
};

use super::{energy_bars, energy_rows, time_row, KINETIC_COLOR, POTENTIAL_COLOR};

const TRAIL_EVERY: u32 = 3;
const TRAIL_MAX: usize = 600;

#[derive(Debug, Default)]
pub struct Projectile {
    pos: Vec2,
    vel: Vec2,
    trail: Vec<Vec2>,
    steps: u32,
    peak: f32,
    landed_at: Option<f32>,
    /// World extents for drawing, fixed at init from the drag-free flight.
    extent: Vec2,
}

/// Launch velocity from speed (m/s) and elevation (degrees).
fn launch_velocity(speed: f32, angle_deg: f32) -> Vec2 {
    let a = angle_deg.to_radians();
    Vec2::new(speed * a.cos(), speed * a.sin())
}

/// Drag-free range and peak height for a launch from `height`.
pub fn ideal_flight(speed: f32, angle_deg: f32, height: f32, g: f32) -> (f32, f32) {
    if g <= 0.0 {
        return (0.0, height);
    }
    let v = launch_velocity(speed, angle_deg);
    let peak = height + v.y.max(0.0).powi(2) / (2.0 * g);
    let flight = (v.y + (v.y * v.y + 2.0 * g * height).sqrt()) / g;
    (v.x * flight, peak)
}

impl Projectile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kinetic and potential energy, ground level as zero.
    fn energies(&self, ctx: &SimContext) -> (f32, f32) {
        let m = ctx.param("mass");
        (0.5 * m * self.vel.length_squared(), m * ctx.param("gravity") * self.pos.y)
    }

    fn view(&self, ctx: &SimContext) -> View2D {
        View2D::fit(ctx.surface, Vec2::new(-0.05 * self.extent.x, 0.0), self.extent, 30.0)
    }
}

impl Simulation for Projectile {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("initialSpeed", "初速").range(5.0, 50.0).step(1.0).default_value(20.0).unit("m/s"),
            ParameterSpec::new("launchAngle", "発射角").range(0.0, 90.0).step(1.0).default_value(45.0).unit("°"),
            ParameterSpec::new("launchHeight", "発射高さ").range(0.0, 50.0).step(1.0).default_value(0.0).unit("m"),
            ParameterSpec::new("gravity", "重力加速度").range(1.0, 20.0).step(0.1).default_value(9.8).unit("m/s²"),
            ParameterSpec::new("mass", "質量").range(0.1, 10.0).step(0.1).default_value(1.0).unit("kg"),
            ParameterSpec::new("airResistance", "空気抵抗").range(0.0, 0.5).step(0.01).default_value(0.0).unit("1/s"),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        let speed = ctx.param("initialSpeed");
        let angle = ctx.param("launchAngle");
        let height = ctx.param("launchHeight");
        self.pos = Vec2::new(0.0, height);
        self.vel = launch_velocity(speed, angle);
        self.trail.clear();
        self.trail.push(self.pos);
        self.steps = 0;
        self.peak = height;
        self.landed_at = None;

        let (range, peak) = ideal_flight(speed, angle, height, ctx.param("gravity"));
        self.extent = Vec2::new(range.max(10.0) * 1.1, peak.max(5.0) * 1.2);
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, _ctx: &SimContext) -> ParamChange {
        match id {
            "initialSpeed" | "launchAngle" | "launchHeight" => ParamChange::Reinitialize,
            _ => ParamChange::InPlace,
        }
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        if self.landed_at.is_some() {
            return Ok(());
        }
        let acc = Vec2::new(0.0, -ctx.param("gravity")) - self.vel * ctx.param("airResistance");
        let before = self.pos;
        step_vec2(&mut self.pos, &mut self.vel, acc, ctx.dt);
        self.peak = self.peak.max(self.pos.y);

        if self.pos.y <= 0.0 && self.vel.y < 0.0 {
            // Interpolate the ground crossing within this step.
            let span = before.y - self.pos.y;
            let k = if span > 0.0 { before.y / span } else { 1.0 };
            self.pos = before.lerp(self.pos, k.clamp(0.0, 1.0));
            self.pos.y = 0.0;
            self.vel = Vec2::ZERO;
            self.landed_at = Some(ctx.time);
            self.trail.push(self.pos);
            return Ok(());
        }

        self.steps += 1;
        if self.steps % TRAIL_EVERY == 0 && self.trail.len() < TRAIL_MAX {
            self.trail.push(self.pos);
        }
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let (range, peak) = ideal_flight(
            ctx.param("initialSpeed"),
            ctx.param("launchAngle"),
            ctx.param("launchHeight"),
            ctx.param("gravity"),
        );
        let mut rows = vec![
            time_row(ctx),
            DisplayDatum::number("水平距離", self.pos.x, 2, "m"),
            DisplayDatum::number("高さ", self.pos.y, 2, "m"),
            DisplayDatum::number("速さ", self.vel.length(), 2, "m/s"),
            DisplayDatum::number("最高点", self.peak, 2, "m"),
            DisplayDatum::number("理論飛距離", range, 2, "m"),
            DisplayDatum::number("理論最高点", peak, 2, "m"),
        ];
        match self.landed_at {
            Some(t) => rows.push(DisplayDatum::number("滞空時間", t, 2, "s")),
            None => rows.push(DisplayDatum::text("滞空時間", "—", "")),
        }
        let (kinetic, potential) = self.energies(ctx);
        rows.extend(energy_rows(kinetic, potential, "位置エネルギー"));
        rows
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        let view = self.view(ctx);
        let left = view.to_screen(Vec2::new(-0.05 * self.extent.x, 0.0));
        let right = view.to_screen(Vec2::new(self.extent.x, 0.0));
        canvas.line(left, right, 2.0, ink);

        let height = ctx.param("launchHeight");
        if height > 0.0 {
            let top = view.to_screen(Vec2::new(0.0, height));
            canvas.fill_rect(top - Vec2::new(view.length(1.0), 0.0), view.length(1.0), view.length(height), Color::LIGHT_GRAY);
        }

        let trail: Vec<Vec2> = self.trail.iter().map(|p| view.to_screen(*p)).collect();
        canvas.stroke_polyline(&trail, 1.5, Color::GRAY);

        let ball = view.to_screen(self.pos);
        canvas.fill_circle(ball, 7.0, Color::rgb8(40, 110, 200));

        if self.landed_at.is_none() {
            let scale = 2.0;
            canvas.arrow(ball, ball + Vec2::new(self.vel.x, 0.0) * scale, 2.0, KINETIC_COLOR);
            canvas.arrow(ball, ball + Vec2::new(0.0, -self.vel.y) * scale, 2.0, POTENTIAL_COLOR);
        }

        let (kinetic, potential) = self.energies(ctx);
        let speed = ctx.param("initialSpeed");
        let m = ctx.param("mass");
        let reference = 0.5 * m * speed * speed + m * ctx.param("gravity") * height;
        energy_bars(canvas, Vec2::new(ctx.surface.width - 180.0, 20.0), kinetic, potential, reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{ActiveSimulation, SurfaceSize};

    fn launched() -> ActiveSimulation<Projectile> {
        let mut sim = ActiveSimulation::new(Box::new(Projectile::new()), SurfaceSize::default(), 0.016);
        sim.start();
        sim
    }

    fn fly(sim: &mut ActiveSimulation<Projectile>) {
        for _ in 0..2000 {
            sim.update().unwrap();
            if sim.simulation().landed_at.is_some() {
                return;
            }
        }
        panic!("projectile never landed");
    }

    #[test]
    fn range_and_peak_match_closed_form() {
        let mut sim = launched();
        fly(&mut sim);
        let (range, peak) = ideal_flight(20.0, 45.0, 0.0, 9.8);
        let p = sim.simulation();
        assert!((p.pos.x - range).abs() / range < 0.02, "x={} range={}", p.pos.x, range);
        assert!((p.peak - peak).abs() / peak < 0.02, "peak={} expected={}", p.peak, peak);
    }

    #[test]
    fn energy_is_conserved_without_drag() {
        let mut sim = launched();
        sim.set_parameter("launchHeight", 10.0);
        sim.set_parameter("mass", 2.0);
        sim.start();
        let total = |s: &ActiveSimulation<Projectile>| {
            let p = s.simulation();
            0.5 * 2.0 * p.vel.length_squared() + 2.0 * 9.8 * p.pos.y
        };
        let e0 = total(&sim);
        assert!((e0 - (0.5 * 2.0 * 400.0 + 2.0 * 9.8 * 10.0)).abs() < 1e-2);
        for _ in 0..2000 {
            sim.update().unwrap();
            if sim.simulation().landed_at.is_some() {
                break;
            }
            let e = total(&sim);
            assert!((e - e0).abs() / e0 < 0.02, "t={} e0={} e={}", sim.time(), e0, e);
        }
        assert!(sim.simulation().landed_at.is_some());
    }

    #[test]
    fn energy_rows_track_state() {
        let mut sim = launched();
        for _ in 0..20 {
            sim.update().unwrap();
        }
        let rows = sim.data_to_display();
        let row = |name: &str| rows.iter().find(|d| d.name == name).and_then(|d| d.raw).unwrap();
        let p = sim.simulation();
        assert!((row("運動エネルギー") - 0.5 * p.vel.length_squared()).abs() < 1e-3);
        assert!((row("位置エネルギー") - 9.8 * p.pos.y).abs() < 1e-3);
        assert!((row("力学的エネルギー") - row("運動エネルギー") - row("位置エネルギー")).abs() < 1e-3);
    }

    #[test]
    fn drag_dissipates_energy() {
        let mut sim = launched();
        sim.set_parameter("airResistance", 0.3);
        sim.start();
        let e0 = 0.5 * 400.0;
        for _ in 0..100 {
            sim.update().unwrap();
        }
        let p = sim.simulation();
        let e = 0.5 * p.vel.length_squared() + 9.8 * p.pos.y;
        assert!(e < e0 * 0.9, "e={}", e);
    }

    #[test]
    fn horizontal_velocity_constant_without_drag() {
        let mut sim = launched();
        let vx = sim.simulation().vel.x;
        for _ in 0..50 {
            sim.update().unwrap();
        }
        assert!((sim.simulation().vel.x - vx).abs() < 1e-4);
    }

    #[test]
    fn drag_shortens_range() {
        let mut sim = launched();
        sim.set_parameter("airResistance", 0.2);
        sim.start();
        fly(&mut sim);
        let (range, _) = ideal_flight(20.0, 45.0, 0.0, 9.8);
        assert!(sim.simulation().pos.x < range * 0.9);
    }

    #[test]
    fn landed_projectile_stays_put() {
        let mut sim = launched();
        fly(&mut sim);
        let pos = sim.simulation().pos;
        for _ in 0..10 {
            sim.update().unwrap();
        }
        assert_eq!(sim.simulation().pos, pos);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn raised_launch_flies_further() {
        let (flat, _) = ideal_flight(20.0, 30.0, 0.0, 9.8);
        let (raised, peak) = ideal_flight(20.0, 30.0, 20.0, 9.8);
        assert!(raised > flat);
        assert!(peak > 20.0);
    }
}
