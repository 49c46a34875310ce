//! Diffraction of a circular wave through one or more slits.

use glam::Vec2;
use lab_engine::core::field::diffract;
use lab_engine::{
    Barrier, Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, ScalarField, SimContext, SimError,
    Simulation, WaveParams, WaveSource,
};

use super::time_row;

const WALL_THICKNESS: f32 = 6.0;

#[derive(Debug)]
pub struct Diffraction {
    field: ScalarField,
    source: WaveSource,
    barrier: Barrier,
}

impl Default for Diffraction {
    fn default() -> Self {
        Self {
            field: ScalarField::new(1.0, 1.0, 1.0),
            source: WaveSource::new(Vec2::ZERO, 1.0, 0.0),
            barrier: Barrier::new(0.0, Vec::new()),
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

/// Slit openings centred on `center_y`, `separation` apart centre to centre.
fn apertures(center_y: f32, count: usize, width: f32, separation: f32) -> Vec<(f32, f32)> {
    let span = separation * (count.saturating_sub(1)) as f32;
    (0..count)
        .map(|i| {
            let c = center_y - span / 2.0 + i as f32 * separation;
            (c - width / 2.0, c + width / 2.0)
        })
        .collect()
}

impl Diffraction {
    pub fn new() -> Self {
        Self::default()
    }

    fn recompute(&mut self, ctx: &SimContext) {
        diffract(&mut self.field, &[self.source], &self.barrier, ctx.time, &wave_params(ctx));
    }
}

impl Simulation for Diffraction {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("wavelength", "波長").range(10.0, 80.0).step(1.0).default_value(30.0).unit("px"),
            ParameterSpec::new("frequency", "振動数").range(0.1, 3.0).step(0.1).default_value(1.0).unit("Hz"),
            ParameterSpec::new("slitWidth", "スリット幅").range(5.0, 100.0).step(1.0).default_value(30.0).unit("px"),
            ParameterSpec::new("slitCount", "スリット数").range(1.0, 5.0).step(1.0).default_value(1.0).unit("本"),
            ParameterSpec::new("slitSeparation", "スリット間隔").range(20.0, 200.0).step(5.0).default_value(80.0).unit("px"),
            ParameterSpec::new("attenuation", "減衰").range(0.0, 0.02).step(0.001).default_value(0.002),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        let (w, h) = (ctx.surface.width, ctx.surface.height);
        self.field = ScalarField::new(w, h, ctx.field_cell);
        self.source = WaveSource::new(Vec2::new(w * 0.08, h / 2.0), 1.0, 0.0);
        let count = ctx.param("slitCount").round().max(1.0) as usize;
        let width = ctx.param("slitWidth");
        // Slits never overlap: separation is at least one slit width.
        let separation = ctx.param("slitSeparation").max(width);
        self.barrier = Barrier::new(w * 0.35, apertures(h / 2.0, count, width, separation));
        self.recompute(ctx);
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, ctx: &SimContext) -> ParamChange {
        match id {
            "slitWidth" | "slitCount" | "slitSeparation" => ParamChange::Reinitialize,
            _ => {
                self.recompute(ctx);
                ParamChange::InPlace
            }
        }
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        self.recompute(ctx);
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let wavelength = ctx.param("wavelength");
        let width = ctx.param("slitWidth");
        let count = self.barrier.apertures.len();
        let mut rows = vec![
            time_row(ctx),
            DisplayDatum::number("波長", wavelength, 0, "px"),
            DisplayDatum::number("スリット数", count as f32, 0, "本"),
            DisplayDatum::number("λ / a", wavelength / width.max(1e-3), 2, ""),
        ];
        // First minimum of a single slit: a·sinθ = λ.
        let ratio = wavelength / width.max(1e-3);
        rows.push(if ratio < 1.0 {
            DisplayDatum::number("第1暗線の角度", ratio.asin().to_degrees(), 1, "°")
        } else {
            DisplayDatum::text("第1暗線の角度", "—", "°")
        });
        if count > 1 {
            let d = ctx.param("slitSeparation").max(width);
            let ratio = wavelength / d;
            rows.push(if ratio < 1.0 {
                DisplayDatum::number("第1明線の角度", ratio.asin().to_degrees(), 1, "°")
            } else {
                DisplayDatum::text("第1明線の角度", "—", "°")
            });
        }
        rows
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        canvas.paint_field(&self.field);

        // Wall segments between the openings.
        let x = self.barrier.x - WALL_THICKNESS / 2.0;
        let mut edges = vec![0.0];
        for &(a, b) in &self.barrier.apertures {
            edges.push(a);
            edges.push(b);
        }
        edges.push(ctx.surface.height);
        for pair in edges.chunks(2) {
            if let [top, bottom] = *pair {
                if bottom > top {
                    canvas.fill_rect(Vec2::new(x, top), WALL_THICKNESS, bottom - top, Color::GRAY);
                }
            }
        }
        canvas.fill_circle(self.source.pos, 5.0, Color::YELLOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{ActiveSimulation, SurfaceSize};

    fn slits() -> ActiveSimulation<Diffraction> {
        let mut sim = ActiveSimulation::new(Box::new(Diffraction::new()), SurfaceSize::default(), 0.016);
        sim.start();
        for _ in 0..20 {
            sim.update().unwrap();
        }
        sim
    }

    #[test]
    fn wall_cells_are_silent() {
        let sim = slits();
        let d = sim.simulation();
        let col = (d.barrier.x / d.field.cell_size()) as usize;
        let center = d.field.cell_center(col, 0);
        assert!((center.x - d.barrier.x).abs() <= d.field.cell_size() / 2.0);
        assert_eq!(d.field.get(col, 0), Some(0.0));
    }

    #[test]
    fn wave_reaches_far_side_behind_slit() {
        let sim = slits();
        let d = sim.simulation();
        let row = d.field.rows() / 2;
        let start = (d.barrier.x / d.field.cell_size()) as usize + 3;
        let energy: f32 = (start..start + 20).map(|c| d.field.get(c, row).unwrap().abs()).sum();
        assert!(energy > 0.0);
    }

    #[test]
    fn slit_count_rebuilds_barrier() {
        let mut sim = slits();
        sim.set_parameter("slitCount", 3.0);
        assert_eq!(sim.simulation().barrier.apertures.len(), 3);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn apertures_are_centred_and_spaced() {
        let a = apertures(250.0, 2, 20.0, 80.0);
        assert_eq!(a, vec![(200.0, 220.0), (280.0, 300.0)]);
        let single = apertures(250.0, 1, 30.0, 80.0);
        assert_eq!(single, vec![(235.0, 265.0)]);
    }

    #[test]
    fn in_place_change_keeps_time() {
        let mut sim = slits();
        let t = sim.time();
        sim.set_parameter("wavelength", 40.0);
        assert_eq!(sim.time(), t);
        assert!(sim.is_running());
    }
}
