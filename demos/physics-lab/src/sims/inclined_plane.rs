//! Block on an inclined plane with static and kinetic friction.
//!
//! A block at rest stays put while `tan θ ≤ μs`. Once sliding it feels
//! `g(sin θ − μk cos θ)`; a step that would reverse its direction stops it
//! instead.

use glam::Vec2;
use lab_engine::{
    Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, SimContext, SimError, Simulation, View2D,
};

use super::{energy_bars, energy_rows, time_row, KINETIC_COLOR, POTENTIAL_COLOR, TOTAL_COLOR};

/// Plane length along the slope, in m.
const PLANE_LENGTH: f32 = 10.0;
const BLOCK: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BlockState {
    #[default]
    Resting,
    Sliding,
    AtBottom,
}

#[derive(Debug, Default)]
pub struct InclinedPlane {
    /// Distance travelled down the slope, in m.
    s: f32,
    /// Speed along the slope, positive downhill.
    v: f32,
    accel: f32,
    state: BlockState,
    angle: f32,
}

impl InclinedPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acceleration along the slope for the current state.
    fn slope_accel(&self, ctx: &SimContext) -> f32 {
        let g = ctx.param("gravity");
        let (sin, cos) = self.angle.sin_cos();
        let mu_k = ctx.param("kineticFriction");
        match self.state {
            BlockState::Resting if self.angle.tan() <= ctx.param("staticFriction") => 0.0,
            BlockState::AtBottom => 0.0,
            _ => g * (sin - mu_k * cos),
        }
    }

    fn friction_force(&self, ctx: &SimContext) -> f32 {
        let m = ctx.param("mass");
        let g = ctx.param("gravity");
        let (sin, cos) = self.angle.sin_cos();
        match self.state {
            BlockState::Resting => m * g * sin,
            BlockState::Sliding => ctx.param("kineticFriction") * m * g * cos,
            BlockState::AtBottom => 0.0,
        }
    }

    /// Height of the block above its resting place at the foot.
    fn drop_height(&self) -> f32 {
        (PLANE_LENGTH - BLOCK - self.s).max(0.0) * self.angle.sin()
    }

    /// Kinetic and potential energy, the foot of the plane as zero.
    fn energies(&self, ctx: &SimContext) -> (f32, f32) {
        let m = ctx.param("mass");
        (0.5 * m * self.v * self.v, m * ctx.param("gravity") * self.drop_height())
    }

    /// Block centre in world coordinates (plane foot at the origin, y-up).
    fn block_center(&self) -> Vec2 {
        let along = Vec2::new(-self.angle.cos(), self.angle.sin());
        let normal = Vec2::new(self.angle.sin(), self.angle.cos());
        let from_foot = (PLANE_LENGTH - self.s - BLOCK / 2.0).max(BLOCK / 2.0);
        along * from_foot + normal * (BLOCK / 2.0)
    }
}

impl Simulation for InclinedPlane {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("angle", "傾斜角").range(5.0, 60.0).step(1.0).default_value(30.0).unit("°"),
            ParameterSpec::new("mass", "質量").range(0.1, 10.0).step(0.1).default_value(1.0).unit("kg"),
            ParameterSpec::new("staticFriction", "静止摩擦係数").range(0.0, 1.0).step(0.01).default_value(0.3),
            ParameterSpec::new("kineticFriction", "動摩擦係数").range(0.0, 1.0).step(0.01).default_value(0.2),
            ParameterSpec::new("gravity", "重力加速度").range(1.0, 20.0).step(0.1).default_value(9.8).unit("m/s²"),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        self.angle = ctx.param("angle").to_radians();
        self.s = 0.0;
        self.v = 0.0;
        self.state = BlockState::Resting;
        self.accel = self.slope_accel(ctx);
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, ctx: &SimContext) -> ParamChange {
        if id == "angle" {
            return ParamChange::Reinitialize;
        }
        self.accel = self.slope_accel(ctx);
        ParamChange::InPlace
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        let travel = PLANE_LENGTH - BLOCK;
        if self.state == BlockState::AtBottom {
            return Ok(());
        }
        self.accel = self.slope_accel(ctx);
        if self.state == BlockState::Resting && self.accel <= 0.0 {
            self.accel = 0.0;
            return Ok(());
        }

        let v_next = self.v + self.accel * ctx.dt;
        if v_next <= 0.0 {
            // Kinetic friction would push the block uphill: it sticks.
            self.v = 0.0;
            self.state = BlockState::Resting;
            self.accel = 0.0;
            return Ok(());
        }
        self.state = BlockState::Sliding;
        self.v = v_next;
        self.s += self.v * ctx.dt;
        if self.s >= travel {
            self.s = travel;
            self.v = 0.0;
            self.accel = 0.0;
            self.state = BlockState::AtBottom;
        }
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let m = ctx.param("mass");
        let g = ctx.param("gravity");
        let status = match self.state {
            BlockState::Resting => "静止",
            BlockState::Sliding => "滑走中",
            BlockState::AtBottom => "到達",
        };
        let (kinetic, potential) = self.energies(ctx);
        let mut rows = vec![
            time_row(ctx),
            DisplayDatum::number("移動距離", self.s, 2, "m"),
            DisplayDatum::number("速度", self.v, 2, "m/s"),
            DisplayDatum::number("加速度", self.accel, 2, "m/s²"),
            DisplayDatum::number("垂直抗力", m * g * self.angle.cos(), 2, "N"),
            DisplayDatum::number("摩擦力", self.friction_force(ctx), 2, "N"),
            DisplayDatum::number("tanθ", self.angle.tan(), 3, ""),
            DisplayDatum::text("状態", status, ""),
        ];
        rows.extend(energy_rows(kinetic, potential, "位置エネルギー"));
        rows
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        let (sin, cos) = self.angle.sin_cos();
        let base = PLANE_LENGTH * cos;
        let top = PLANE_LENGTH * sin;
        let view = View2D::fit(ctx.surface, Vec2::new(-base - 1.0, -0.5), Vec2::new(1.0, top + 1.5), 30.0);

        let plane = [
            view.to_screen(Vec2::ZERO),
            view.to_screen(Vec2::new(-base, top)),
            view.to_screen(Vec2::new(-base, 0.0)),
        ];
        canvas.fill_polygon(&plane, Color::rgb8(210, 200, 180));
        canvas.stroke_polygon(&plane, 1.5, ink);

        let along = Vec2::new(-cos, sin);
        let normal = Vec2::new(sin, cos);
        let c = self.block_center();
        let h = BLOCK / 2.0;
        let corners: Vec<Vec2> = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .iter()
            .map(|&(a, n)| view.to_screen(c + along * (a * h) + normal * (n * h)))
            .collect();
        canvas.fill_polygon(&corners, Color::rgb8(90, 120, 190));
        canvas.stroke_polygon(&corners, 1.5, ink);

        // Force arrows, scaled per newton relative to the weight.
        let g = ctx.param("gravity");
        let unit = 2.0 / g.max(1e-3);
        let center = view.to_screen(c);
        let to_screen_dir = |d: Vec2| Vec2::new(d.x, -d.y);
        canvas.arrow(center, center + to_screen_dir(Vec2::new(0.0, -g * unit)) * view.scale, 2.0, POTENTIAL_COLOR);
        canvas.arrow(center, center + to_screen_dir(normal * g * cos * unit) * view.scale, 2.0, TOTAL_COLOR);
        let friction = self.friction_force(ctx) / ctx.param("mass").max(1e-3);
        if friction > 0.0 {
            canvas.arrow(center, center + to_screen_dir(along * friction * unit) * view.scale, 2.0, KINETIC_COLOR);
        }
        canvas.label(view.to_screen(Vec2::new(-base + 0.4, 0.3)), format!("{:.0}°", self.angle.to_degrees()), ink);

        let (kinetic, potential) = self.energies(ctx);
        let reference = ctx.param("mass") * g * (PLANE_LENGTH - BLOCK) * sin;
        energy_bars(canvas, Vec2::new(ctx.surface.width - 180.0, 20.0), kinetic, potential, reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{ActiveSimulation, SurfaceSize};

    fn on_slope() -> ActiveSimulation<InclinedPlane> {
        let mut sim = ActiveSimulation::new(Box::new(InclinedPlane::new()), SurfaceSize::default(), 0.016);
        sim.start();
        sim
    }

    #[test]
    fn static_friction_holds_block() {
        let mut sim = on_slope();
        sim.set_parameter("staticFriction", 0.6);
        for _ in 0..200 {
            sim.update().unwrap();
        }
        assert_eq!(sim.simulation().s, 0.0);
        assert_eq!(sim.simulation().state, BlockState::Resting);
    }

    #[test]
    fn sliding_acceleration_matches_kinetic_friction() {
        let mut sim = on_slope();
        for _ in 0..50 {
            sim.update().unwrap();
        }
        let a = 9.8 * (30f32.to_radians().sin() - 0.2 * 30f32.to_radians().cos());
        let expected = a * sim.time();
        assert!((sim.simulation().v - expected).abs() < 1e-3, "v={} expected={}", sim.simulation().v, expected);
        assert_eq!(sim.simulation().state, BlockState::Sliding);
    }

    #[test]
    fn energy_is_conserved_without_friction() {
        let mut sim = on_slope();
        sim.set_parameter("staticFriction", 0.0);
        sim.set_parameter("kineticFriction", 0.0);
        sim.set_parameter("mass", 3.0);
        let total = |s: &ActiveSimulation<InclinedPlane>| {
            let p = s.simulation();
            0.5 * 3.0 * p.v * p.v + 3.0 * 9.8 * p.drop_height()
        };
        let e0 = total(&sim);
        assert!((e0 - 3.0 * 9.8 * (PLANE_LENGTH - BLOCK) * 0.5).abs() < 1e-2);
        for _ in 0..1000 {
            sim.update().unwrap();
            if sim.simulation().state != BlockState::Sliding {
                break;
            }
            let e = total(&sim);
            assert!((e - e0).abs() / e0 < 0.02, "t={} e0={} e={}", sim.time(), e0, e);
        }
        assert_eq!(sim.simulation().state, BlockState::AtBottom);
    }

    #[test]
    fn friction_work_accounts_for_lost_energy() {
        let mut sim = on_slope();
        for _ in 0..60 {
            sim.update().unwrap();
        }
        let p = sim.simulation();
        let cos = 30f32.to_radians().cos();
        let e0 = 9.8 * (PLANE_LENGTH - BLOCK) * 0.5;
        let e = 0.5 * p.v * p.v + 9.8 * p.drop_height();
        let expected = 0.2 * 9.8 * cos * p.s;
        assert_eq!(p.state, BlockState::Sliding);
        assert!(((e0 - e) - expected).abs() / expected < 0.08, "lost={} expected={}", e0 - e, expected);
    }

    #[test]
    fn energy_rows_are_published() {
        let sim = on_slope();
        let names: Vec<&str> = sim.data_to_display().iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"運動エネルギー"));
        assert!(names.contains(&"位置エネルギー"));
        assert!(names.contains(&"力学的エネルギー"));
    }

    #[test]
    fn block_stops_at_bottom() {
        let mut sim = on_slope();
        for _ in 0..1000 {
            sim.update().unwrap();
        }
        let p = sim.simulation();
        assert_eq!(p.state, BlockState::AtBottom);
        assert_eq!(p.v, 0.0);
        assert_eq!(p.s, PLANE_LENGTH - BLOCK);
    }

    #[test]
    fn strong_kinetic_friction_stops_a_sliding_block() {
        let mut sim = on_slope();
        for _ in 0..20 {
            sim.update().unwrap();
        }
        sim.set_parameter("kineticFriction", 1.0);
        for _ in 0..200 {
            sim.update().unwrap();
        }
        assert_eq!(sim.simulation().v, 0.0);
        assert_eq!(sim.simulation().state, BlockState::Resting);
    }

    #[test]
    fn angle_change_rebuilds_geometry() {
        let mut sim = on_slope();
        sim.set_parameter("angle", 45.0);
        assert!((sim.simulation().angle - 45f32.to_radians()).abs() < 1e-6);
        assert_eq!(sim.time(), 0.0);
    }
}
