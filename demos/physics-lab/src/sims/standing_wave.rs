//! Standing wave on a string fixed at both ends, built from two
//! counter-propagating travelling waves.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use lab_engine::{Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, SimContext, SimError, Simulation};

use super::{time_row, KINETIC_COLOR, POTENTIAL_COLOR};

const SAMPLES: usize = 240;
const MARGIN: f32 = 40.0;

#[derive(Debug, Default)]
pub struct StandingWave {
    /// Sample x positions in pixels from the left anchor.
    xs: Vec<f32>,
    /// Wave travelling right, wave travelling left, and their sum.
    right: Vec<f32>,
    left: Vec<f32>,
    total: Vec<f32>,
    length: f32,
    origin: Vec2,
}

impl StandingWave {
    pub fn new() -> Self {
        Self::default()
    }

    fn wavenumber(&self, ctx: &SimContext) -> f32 {
        ctx.param("harmonic").round() * PI / self.length.max(1.0)
    }

    /// Rebuild all samples from the closed form at `ctx.time`.
    fn recompute(&mut self, ctx: &SimContext) {
        let k = self.wavenumber(ctx);
        let omega = TAU * ctx.param("frequency");
        let a = ctx.param("amplitude");
        let t = ctx.time;
        for (i, &x) in self.xs.iter().enumerate() {
            let r = a * (k * x - omega * t).sin();
            let l = a * (k * x + omega * t).sin();
            self.right[i] = r;
            self.left[i] = l;
            self.total[i] = r + l;
        }
    }

    /// Node positions in pixels from the left anchor.
    pub fn nodes(&self, ctx: &SimContext) -> Vec<f32> {
        let n = ctx.param("harmonic").round().max(1.0) as usize;
        (0..=n).map(|m| self.length * m as f32 / n as f32).collect()
    }

    fn polyline(&self, values: &[f32]) -> Vec<Vec2> {
        self.xs
            .iter()
            .zip(values)
            .map(|(&x, &y)| self.origin + Vec2::new(x, -y))
            .collect()
    }
}

impl Simulation for StandingWave {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("harmonic", "倍振動").range(1.0, 8.0).step(1.0).default_value(2.0),
            ParameterSpec::new("frequency", "振動数").range(0.1, 2.0).step(0.1).default_value(0.5).unit("Hz"),
            ParameterSpec::new("amplitude", "振幅").range(5.0, 80.0).step(1.0).default_value(40.0).unit("px"),
            ParameterSpec::new("showComponents", "成分波の表示").range(0.0, 1.0).step(1.0).default_value(1.0),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        self.length = (ctx.surface.width - 2.0 * MARGIN).max(10.0);
        self.origin = Vec2::new(MARGIN, ctx.surface.height / 2.0);
        self.xs = (0..SAMPLES).map(|i| self.length * i as f32 / (SAMPLES - 1) as f32).collect();
        self.right = vec![0.0; SAMPLES];
        self.left = vec![0.0; SAMPLES];
        self.total = vec![0.0; SAMPLES];
        self.recompute(ctx);
    }

    fn on_parameter_changed(&mut self, _id: &str, _value: f32, ctx: &SimContext) -> ParamChange {
        self.recompute(ctx);
        ParamChange::InPlace
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        self.recompute(ctx);
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let n = ctx.param("harmonic").round().max(1.0);
        let f = ctx.param("frequency");
        let wavelength = 2.0 * self.length / n;
        vec![
            time_row(ctx),
            DisplayDatum::number("倍振動", n, 0, ""),
            DisplayDatum::number("波長", wavelength, 0, "px"),
            DisplayDatum::number("波の速さ", wavelength * f, 1, "px/s"),
            DisplayDatum::number("節の数", n + 1.0, 0, "個"),
            DisplayDatum::number("腹の数", n, 0, "個"),
            DisplayDatum::number("周期", 1.0 / f.max(1e-3), 2, "s"),
        ]
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        let end = self.origin + Vec2::new(self.length, 0.0);
        canvas.line(self.origin, end, 1.0, Color::LIGHT_GRAY);

        // Envelope ±2A sin(kx).
        let k = self.wavenumber(ctx);
        let a2 = 2.0 * ctx.param("amplitude");
        let upper: Vec<f32> = self.xs.iter().map(|&x| a2 * (k * x).sin()).collect();
        let lower: Vec<f32> = upper.iter().map(|v| -v).collect();
        canvas.stroke_polyline(&self.polyline(&upper), 1.0, Color::LIGHT_GRAY);
        canvas.stroke_polyline(&self.polyline(&lower), 1.0, Color::LIGHT_GRAY);

        if ctx.param("showComponents") >= 0.5 {
            canvas.stroke_polyline(&self.polyline(&self.right), 1.5, KINETIC_COLOR.with_alpha(0.6));
            canvas.stroke_polyline(&self.polyline(&self.left), 1.5, POTENTIAL_COLOR.with_alpha(0.6));
        }
        canvas.stroke_polyline(&self.polyline(&self.total), 3.0, ink);

        for x in self.nodes(ctx) {
            canvas.fill_circle(self.origin + Vec2::new(x, 0.0), 4.0, Color::RED);
        }
        canvas.fill_rect(self.origin - Vec2::new(6.0, 30.0), 6.0, 60.0, Color::GRAY);
        canvas.fill_rect(end - Vec2::new(0.0, 30.0), 6.0, 60.0, Color::GRAY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{ActiveSimulation, SurfaceSize};

    fn string() -> ActiveSimulation<StandingWave> {
        let mut sim = ActiveSimulation::new(Box::new(StandingWave::new()), SurfaceSize::default(), 0.016);
        sim.start();
        sim
    }

    #[test]
    fn ends_stay_fixed() {
        let mut sim = string();
        for _ in 0..100 {
            sim.update().unwrap();
            let total = &sim.simulation().total;
            assert!(total[0].abs() < 1e-3);
            assert!(total[SAMPLES - 1].abs() < 1e-2, "end={}", total[SAMPLES - 1]);
        }
    }

    #[test]
    fn sum_matches_standing_form() {
        let mut sim = string();
        for _ in 0..37 {
            sim.update().unwrap();
        }
        let s = sim.simulation();
        let k = 2.0 * PI / s.length;
        let omega = TAU * 0.5;
        let t = sim.time();
        for (i, &x) in s.xs.iter().enumerate().step_by(17) {
            let expected = 2.0 * 40.0 * (k * x).sin() * (omega * t).cos();
            assert!((s.total[i] - expected).abs() < 1e-2, "x={} got={} expected={}", x, s.total[i], expected);
        }
    }

    #[test]
    fn harmonic_sets_node_count() {
        let mut sim = string();
        sim.set_parameter("harmonic", 5.0);
        assert!(sim.is_running());
        let rows = sim.data_to_display();
        assert_eq!(rows.iter().find(|d| d.name == "節の数").unwrap().value, "6");
        assert_eq!(rows.iter().find(|d| d.name == "腹の数").unwrap().value, "5");
    }
}
