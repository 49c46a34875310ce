//! Interference of two circular waves from point sources.

use std::f32::consts::TAU;

use glam::Vec2;
use lab_engine::core::field::superpose;
use lab_engine::{
    Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, ScalarField, SimContext, SimError, Simulation,
    WaveParams, WaveSource,
};

use super::time_row;

#[derive(Debug)]
pub struct WaveInterference {
    field: ScalarField,
    sources: [WaveSource; 2],
    /// Point on the far side whose path difference is reported.
    probe: Vec2,
}

impl Default for WaveInterference {
    fn default() -> Self {
        Self {
            field: ScalarField::new(1.0, 1.0, 1.0),
            sources: [WaveSource::new(Vec2::ZERO, 0.0, 0.0); 2],
            probe: Vec2::ZERO,
        }
    }
}

fn wave_params(ctx: &SimContext) -> WaveParams {
    WaveParams {
        wavelength: ctx.param("wavelength"),
        frequency: ctx.param("frequency"),
        attenuation: ctx.param("attenuation"),
    }
}

impl WaveInterference {
    pub fn new() -> Self {
        Self::default()
    }

    fn place_sources(&mut self, ctx: &SimContext) {
        let half = ctx.param("sourceSeparation") / 2.0;
        let x = ctx.surface.width * 0.2;
        let y = ctx.surface.height / 2.0;
        let amplitude = ctx.param("amplitude");
        let phase = ctx.param("phaseDifference").to_radians();
        self.sources = [
            WaveSource::new(Vec2::new(x, y - half), amplitude, 0.0),
            WaveSource::new(Vec2::new(x, y + half), amplitude, phase),
        ];
    }

    fn recompute(&mut self, ctx: &SimContext) {
        self.field.superpose(&self.sources, ctx.time, &wave_params(ctx));
    }

    /// Path difference at the probe, in wavelengths.
    fn path_difference(&self, wavelength: f32) -> f32 {
        let d = (self.sources[0].pos.distance(self.probe) - self.sources[1].pos.distance(self.probe)).abs();
        if wavelength > 0.0 {
            d / wavelength
        } else {
            0.0
        }
    }
}

impl Simulation for WaveInterference {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("wavelength", "波長").range(10.0, 100.0).step(1.0).default_value(40.0).unit("px"),
            ParameterSpec::new("frequency", "振動数").range(0.1, 3.0).step(0.1).default_value(1.0).unit("Hz"),
            ParameterSpec::new("amplitude", "振幅").range(0.1, 1.0).step(0.05).default_value(0.5),
            ParameterSpec::new("sourceSeparation", "波源間隔").range(20.0, 300.0).step(5.0).default_value(120.0).unit("px"),
            ParameterSpec::new("phaseDifference", "位相差").range(0.0, 360.0).step(15.0).default_value(0.0).unit("°"),
            ParameterSpec::new("attenuation", "減衰").range(0.0, 0.05).step(0.001).default_value(0.005),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        self.field = ScalarField::new(ctx.surface.width, ctx.surface.height, ctx.field_cell);
        self.probe = Vec2::new(ctx.surface.width * 0.9, ctx.surface.height * 0.25);
        self.place_sources(ctx);
        self.recompute(ctx);
    }

    /// Every parameter is a coefficient of the closed form; the field is
    /// recomputed right away so a paused view follows the slider.
    fn on_parameter_changed(&mut self, id: &str, _value: f32, ctx: &SimContext) -> ParamChange {
        if matches!(id, "sourceSeparation" | "phaseDifference" | "amplitude") {
            self.place_sources(ctx);
        }
        self.recompute(ctx);
        ParamChange::InPlace
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        self.recompute(ctx);
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let wave = wave_params(ctx);
        let diff = self.path_difference(wave.wavelength);
        let nearest = diff.round();
        let condition = if (diff - nearest).abs() < 0.1 {
            "強め合い"
        } else if (diff - nearest).abs() > 0.4 {
            "弱め合い"
        } else {
            "中間"
        };
        vec![
            time_row(ctx),
            DisplayDatum::number("波長", wave.wavelength, 0, "px"),
            DisplayDatum::number("周期", 1.0 / wave.frequency.max(1e-3), 2, "s"),
            DisplayDatum::number("波の速さ", wave.wavelength * wave.frequency, 1, "px/s"),
            DisplayDatum::number("経路差", diff, 2, "λ"),
            DisplayDatum::number("観測点の変位", superpose(&self.sources, self.probe, ctx.time, &wave), 3, ""),
            DisplayDatum::text("観測点", condition, ""),
        ]
    }

    fn draw(&self, _ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        canvas.paint_field(&self.field);
        for source in &self.sources {
            canvas.fill_circle(source.pos, 5.0, Color::YELLOW);
            canvas.stroke_circle(source.pos, 5.0, 1.0, ink);
        }
        for source in &self.sources {
            canvas.line(source.pos, self.probe, 1.0, Color::WHITE.with_alpha(0.6));
        }
        canvas.stroke_circle(self.probe, 6.0, 2.0, Color::WHITE);
        let phase = self.sources[1].phase - self.sources[0].phase;
        canvas.label(
            self.sources[1].pos + Vec2::new(10.0, 16.0),
            format!("Δφ = {:.0}°", (phase / TAU * 360.0).rem_euclid(360.0)),
            ink,
        );
    }
}
