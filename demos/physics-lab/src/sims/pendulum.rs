//! Simple pendulum with viscous damping. The period is measured from
//! successive direction reversals.

use std::f32::consts::TAU;

use glam::Vec2;
use lab_engine::{Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, SimContext, SimError, Simulation};

use super::{energy_bars, energy_rows, time_row};

/// Longest selectable rod in cm; the drawing scale is fixed against it.
const MAX_LENGTH_CM: f32 = 300.0;
const PIVOT_MARGIN: f32 = 40.0;
const MAX_REVERSALS: usize = 16;

#[derive(Debug, Default)]
pub struct Pendulum {
    /// Angle from vertical in rad.
    theta: f32,
    omega: f32,
    /// Pivot in surface pixels.
    pivot: Vec2,
    /// Pixels per metre.
    scale: f32,
    reversals: Vec<f32>,
    last_sign: f32,
}

impl Pendulum {
    pub fn new() -> Self {
        Self::default()
    }

    fn length_m(ctx: &SimContext) -> f32 {
        ctx.param("length") / 100.0
    }

    /// Average full period over the recorded reversals (two per period).
    pub fn measured_period(&self) -> Option<f32> {
        let n = self.reversals.len();
        if n < 3 {
            return None;
        }
        let span = self.reversals[n - 1] - self.reversals[0];
        Some(2.0 * span / (n - 1) as f32)
    }

    fn energies(&self, ctx: &SimContext) -> (f32, f32) {
        let m = ctx.param("mass");
        let g = ctx.param("gravity");
        let l = Self::length_m(ctx);
        let v = l * self.omega;
        (0.5 * m * v * v, m * g * l * (1.0 - self.theta.cos()))
    }
}

impl Simulation for Pendulum {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("length", "糸の長さ").range(50.0, MAX_LENGTH_CM).step(1.0).default_value(150.0).unit("cm"),
            ParameterSpec::new("initialAngle", "初期角度").range(1.0, 90.0).step(1.0).default_value(30.0).unit("°"),
            ParameterSpec::new("mass", "質量").range(0.1, 5.0).step(0.1).default_value(1.0).unit("kg"),
            ParameterSpec::new("gravity", "重力加速度").range(1.0, 20.0).step(0.1).default_value(9.8).unit("m/s²"),
            ParameterSpec::new("damping", "減衰係数").range(0.0, 1.0).step(0.01).default_value(0.0).unit("1/s"),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        self.theta = ctx.param("initialAngle").to_radians();
        self.omega = 0.0;
        self.pivot = Vec2::new(ctx.surface.width / 2.0, PIVOT_MARGIN);
        let reach = (ctx.surface.height - 2.0 * PIVOT_MARGIN).max(50.0);
        self.scale = reach / (MAX_LENGTH_CM / 100.0);
        self.reversals.clear();
        self.last_sign = 0.0;
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, _ctx: &SimContext) -> ParamChange {
        match id {
            "initialAngle" => ParamChange::Reinitialize,
            // The old reversals belong to a different period.
            "length" | "gravity" => {
                self.reversals.clear();
                ParamChange::InPlace
            }
            _ => ParamChange::InPlace,
        }
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        let g = ctx.param("gravity");
        let l = Self::length_m(ctx);
        let alpha = -(g / l) * self.theta.sin() - ctx.param("damping") * self.omega;
        self.omega += alpha * ctx.dt;
        self.theta += self.omega * ctx.dt;

        let sign = self.omega.signum();
        if self.omega != 0.0 && self.last_sign != 0.0 && sign != self.last_sign {
            if self.reversals.len() == MAX_REVERSALS {
                self.reversals.remove(0);
            }
            self.reversals.push(ctx.time);
        }
        if self.omega != 0.0 {
            self.last_sign = sign;
        }
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let (kinetic, potential) = self.energies(ctx);
        let theory = TAU * (Self::length_m(ctx) / ctx.param("gravity")).sqrt();
        let mut rows = vec![
            time_row(ctx),
            DisplayDatum::number("角度", self.theta.to_degrees(), 1, "°"),
            DisplayDatum::number("角速度", self.omega, 2, "rad/s"),
            match self.measured_period() {
                Some(p) => DisplayDatum::number("周期(測定)", p, 3, "s"),
                None => DisplayDatum::text("周期(測定)", "—", "s"),
            },
            DisplayDatum::number("周期(理論)", theory, 3, "s"),
        ];
        rows.extend(energy_rows(kinetic, potential, "位置エネルギー"));
        rows
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        let l = Self::length_m(ctx) * self.scale;
        let bob = self.pivot + Vec2::new(self.theta.sin(), self.theta.cos()) * l;

        canvas.fill_rect(self.pivot - Vec2::new(40.0, 8.0), 80.0, 8.0, Color::GRAY);
        canvas.line(self.pivot, self.pivot + Vec2::new(0.0, l), 1.0, Color::LIGHT_GRAY);

        // Swing envelope at the release angle.
        let a0 = ctx.param("initialAngle").to_radians();
        let arc: Vec<Vec2> = (0..=32)
            .map(|i| {
                let a = -a0 + 2.0 * a0 * i as f32 / 32.0;
                self.pivot + Vec2::new(a.sin(), a.cos()) * l
            })
            .collect();
        canvas.stroke_polyline(&arc, 1.0, Color::LIGHT_GRAY);

        canvas.line(self.pivot, bob, 2.0, ink);
        let radius = 8.0 + ctx.param("mass").sqrt() * 6.0;
        canvas.fill_circle(bob, radius, Color::rgb8(200, 70, 70));
        canvas.stroke_circle(bob, radius, 1.5, ink);

        let (kinetic, potential) = self.energies(ctx);
        let reference = ctx.param("mass") * ctx.param("gravity") * Self::length_m(ctx) * (1.0 - a0.cos());
        energy_bars(canvas, Vec2::new(20.0, 20.0), kinetic, potential, reference);
    }
}
