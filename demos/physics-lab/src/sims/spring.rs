//! Horizontal mass-spring oscillator on a frictionless track.

use std::f32::consts::TAU;

use glam::Vec2;
use lab_engine::core::integrate::step_scalar;
use lab_engine::{Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, SimContext, SimError, Simulation};

use super::{energy_bars, energy_rows, time_row};

const COILS: usize = 12;
/// Displacement range shown on screen, in m.
const VIEW_SPAN: f32 = 2.5;

#[derive(Debug, Default)]
pub struct Spring {
    /// Displacement from equilibrium in m.
    x: f32,
    v: f32,
    accel: f32,
    /// Wall anchor and equilibrium position in pixels.
    wall: Vec2,
    equilibrium: Vec2,
    scale: f32,
}

impl Spring {
    pub fn new() -> Self {
        Self::default()
    }

    fn acceleration(&self, ctx: &SimContext, x: f32, v: f32) -> f32 {
        (-ctx.param("springConstant") * x - ctx.param("damping") * v) / ctx.param("mass").max(1e-3)
    }

    fn energies(&self, ctx: &SimContext) -> (f32, f32) {
        let kinetic = 0.5 * ctx.param("mass") * self.v * self.v;
        let elastic = 0.5 * ctx.param("springConstant") * self.x * self.x;
        (kinetic, elastic)
    }

    /// Zig-zag from the wall to the block's left face.
    fn coil_points(&self, end: Vec2) -> Vec<Vec2> {
        let lead = 12.0;
        let start = self.wall + Vec2::new(lead, 0.0);
        let stop = end - Vec2::new(lead, 0.0);
        let mut points = vec![self.wall, start];
        let span = stop.x - start.x;
        for i in 0..COILS {
            let t = (i as f32 + 0.5) / COILS as f32;
            let side = if i % 2 == 0 { -10.0 } else { 10.0 };
            points.push(Vec2::new(start.x + span * t, start.y + side));
        }
        points.push(stop);
        points.push(end);
        points
    }
}

impl Simulation for Spring {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("springConstant", "ばね定数").range(1.0, 100.0).step(1.0).default_value(20.0).unit("N/m"),
            ParameterSpec::new("mass", "質量").range(0.1, 10.0).step(0.1).default_value(1.0).unit("kg"),
            ParameterSpec::new("initialDisplacement", "初期変位").range(-2.0, 2.0).step(0.1).default_value(1.0).unit("m"),
            ParameterSpec::new("damping", "減衰係数").range(0.0, 2.0).step(0.05).default_value(0.0).unit("N·s/m"),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        self.x = ctx.param("initialDisplacement");
        self.v = 0.0;
        self.accel = self.acceleration(ctx, self.x, self.v);
        let mid_y = ctx.surface.height * 0.55;
        self.wall = Vec2::new(40.0, mid_y);
        self.equilibrium = Vec2::new(ctx.surface.width * 0.45, mid_y);
        self.scale = ((ctx.surface.width - 60.0) - self.equilibrium.x).max(40.0) / VIEW_SPAN;
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, ctx: &SimContext) -> ParamChange {
        match id {
            "initialDisplacement" => ParamChange::Reinitialize,
            _ => {
                self.accel = self.acceleration(ctx, self.x, self.v);
                ParamChange::InPlace
            }
        }
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        let a = self.acceleration(ctx, self.x, self.v);
        step_scalar(&mut self.x, &mut self.v, a, ctx.dt);
        self.accel = self.acceleration(ctx, self.x, self.v);
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let (kinetic, elastic) = self.energies(ctx);
        let period = TAU * (ctx.param("mass") / ctx.param("springConstant")).sqrt();
        let mut rows = vec![
            time_row(ctx),
            DisplayDatum::number("変位", self.x, 3, "m"),
            DisplayDatum::number("速度", self.v, 3, "m/s"),
            DisplayDatum::number("加速度", self.accel, 3, "m/s²"),
            DisplayDatum::number("周期(理論)", period, 3, "s"),
        ];
        rows.extend(energy_rows(kinetic, elastic, "弾性エネルギー"));
        rows
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        let block_size = 30.0 + ctx.param("mass").sqrt() * 10.0;
        let center = self.equilibrium + Vec2::new(self.x * self.scale, 0.0);
        let face = center - Vec2::new(block_size / 2.0, 0.0);

        canvas.fill_rect(self.wall - Vec2::new(16.0, 60.0), 16.0, 120.0, Color::GRAY);
        let floor_y = self.wall.y + block_size / 2.0;
        canvas.line(Vec2::new(self.wall.x, floor_y), Vec2::new(ctx.surface.width - 20.0, floor_y), 2.0, ink);

        let eq_top = self.equilibrium - Vec2::new(0.0, 70.0);
        canvas.line(eq_top, self.equilibrium + Vec2::new(0.0, 40.0), 1.0, Color::LIGHT_GRAY);
        canvas.label(eq_top - Vec2::new(10.0, 6.0), "x = 0", Color::GRAY);

        canvas.stroke_polyline(&self.coil_points(face), 2.0, Color::GRAY);
        canvas.fill_rect(center - Vec2::splat(block_size / 2.0), block_size, block_size, Color::rgb8(70, 130, 200));
        canvas.stroke_rect(center - Vec2::splat(block_size / 2.0), block_size, block_size, 1.5, ink);

        let (kinetic, elastic) = self.energies(ctx);
        let x0 = ctx.param("initialDisplacement");
        let reference = 0.5 * ctx.param("springConstant") * x0 * x0;
        energy_bars(canvas, Vec2::new(20.0, 20.0), kinetic, elastic, reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{ActiveSimulation, SurfaceSize};

    fn oscillating() -> ActiveSimulation<Spring> {
        let mut sim = ActiveSimulation::new(Box::new(Spring::new()), SurfaceSize::default(), 0.016);
        sim.start();
        sim
    }

    fn energy(sim: &ActiveSimulation<Spring>) -> f32 {
        let s = sim.simulation();
        let k = sim.parameter("springConstant").unwrap();
        let m = sim.parameter("mass").unwrap();
        0.5 * m * s.v * s.v + 0.5 * k * s.x * s.x
    }

    #[test]
    fn energy_is_conserved_without_damping() {
        let mut sim = oscillating();
        sim.set_parameter("springConstant", 10.0);
        let e0 = energy(&sim);
        for _ in 0..1500 {
            sim.update().unwrap();
            let e = energy(&sim);
            assert!((e - e0).abs() / e0 < 0.05, "e0={} e={}", e0, e);
        }
    }

    #[test]
    fn displacement_stays_within_release_amplitude() {
        let mut sim = oscillating();
        for _ in 0..1500 {
            sim.update().unwrap();
            assert!(sim.simulation().x.abs() <= 1.1);
        }
    }

    #[test]
    fn damping_dissipates_energy() {
        let mut sim = oscillating();
        sim.set_parameter("damping", 1.0);
        let e0 = energy(&sim);
        for _ in 0..600 {
            sim.update().unwrap();
        }
        assert!(energy(&sim) < e0 * 0.05);
    }

    #[test]
    fn equilibrium_release_stays_at_rest() {
        let mut sim = oscillating();
        sim.set_parameter("initialDisplacement", 0.0);
        sim.start();
        for _ in 0..100 {
            sim.update().unwrap();
        }
        assert_eq!(sim.simulation().x, 0.0);
        assert_eq!(sim.simulation().v, 0.0);
    }
}
