//! Closed-form wave superposition on a fixed sampling grid.
//!
//! The field is rebuilt from scratch every frame from the source
//! contributions at the current time; nothing is propagated incrementally,
//! so the result depends only on `time`, never on frame history.

use glam::Vec2;
use std::f32::consts::TAU;

/// Default grid cell edge in pixels.
pub const DEFAULT_CELL_SIZE: f32 = 4.0;

/// A point source of circular waves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSource {
    pub pos: Vec2,
    pub amplitude: f32,
    /// Phase offset in radians.
    pub phase: f32,
}

impl WaveSource {
    pub fn new(pos: Vec2, amplitude: f32, phase: f32) -> Self {
        Self { pos, amplitude, phase }
    }
}

/// Medium/wave parameters shared by all sources of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub wavelength: f32,
    /// Frequency in Hz.
    pub frequency: f32,
    /// Attenuation coefficient `k` in `1 / (1 + k·d)`.
    pub attenuation: f32,
}

/// Distance damping factor `1 / (1 + k·d)`.
#[inline]
pub fn attenuation(distance: f32, k: f32) -> f32 {
    1.0 / (1.0 + k.max(0.0) * distance)
}

/// Value of one damped travelling sinusoid at distance `d` from its source.
#[inline]
fn wave_at(distance: f32, amplitude: f32, phase: f32, time: f32, wave: &WaveParams) -> f32 {
    (TAU * distance / wave.wavelength - TAU * wave.frequency * time + phase).sin()
        * amplitude
        * attenuation(distance, wave.attenuation)
}

/// Contribution of a single source at `point`.
/// A non-positive wavelength contributes nothing.
pub fn contribution(source: &WaveSource, point: Vec2, time: f32, wave: &WaveParams) -> f32 {
    if wave.wavelength <= 0.0 || !wave.wavelength.is_finite() {
        return 0.0;
    }
    wave_at(source.pos.distance(point), source.amplitude, source.phase, time, wave)
}

/// Unclamped sum of all source contributions at `point`.
pub fn superpose(sources: &[WaveSource], point: Vec2, time: f32, wave: &WaveParams) -> f32 {
    sources.iter().map(|s| contribution(s, point, time, wave)).sum()
}

/// Upper bound on cells along one axis of a `ScalarField`.
pub const MAX_FIELD_CELLS: usize = 2048;

fn cells_along(extent: f32, cell: f32) -> usize {
    let n = (extent / cell).ceil();
    if n.is_finite() {
        n.clamp(1.0, MAX_FIELD_CELLS as f32) as usize
    } else {
        1
    }
}

/// Scalar field sampled at cell centres of a fixed grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    cols: usize,
    rows: usize,
    cell: f32,
    values: Vec<f32>,
}

impl ScalarField {
    /// Grid covering `width × height` with square cells of side `cell`.
    /// Each axis is capped at `MAX_FIELD_CELLS`; a non-finite extent gets
    /// a single cell.
    pub fn new(width: f32, height: f32, cell: f32) -> Self {
        let cell = if cell.is_finite() && cell > 0.0 { cell } else { 1.0 };
        let cols = cells_along(width, cell);
        let rows = cells_along(height, cell);
        Self {
            cols,
            rows,
            cell,
            values: vec![0.0; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col < self.cols && row < self.rows {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// Centre of a cell in surface coordinates.
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.cell,
            (row as f32 + 0.5) * self.cell,
        )
    }

    /// Recompute every cell from `sample(centre)` and clamp to [-1, 1].
    pub fn recompute(&mut self, mut sample: impl FnMut(Vec2) -> f32) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = self.cell_center(col, row);
                let v = sample(p);
                self.values[row * self.cols + col] = if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
            }
        }
    }

    /// Recompute as the plain superposition of `sources`.
    pub fn superpose(&mut self, sources: &[WaveSource], time: f32, wave: &WaveParams) {
        self.recompute(|p| superpose(sources, p, time, wave));
    }
}

/// Vertical obstacle line with openings, used for diffraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    /// x coordinate of the obstacle line.
    pub x: f32,
    /// Openings as `(y_start, y_end)` ranges.
    pub apertures: Vec<(f32, f32)>,
}

impl Barrier {
    pub fn new(x: f32, apertures: Vec<(f32, f32)>) -> Self {
        Self { x, apertures }
    }

    pub fn is_open(&self, y: f32) -> bool {
        self.apertures.iter().any(|&(a, b)| y >= a.min(b) && y <= a.max(b))
    }

    /// Aperture sample points spaced `spacing` apart (at least one per opening).
    pub fn samples(&self, spacing: f32) -> Vec<Vec2> {
        let spacing = if spacing > 0.0 { spacing } else { 1.0 };
        let mut out = Vec::new();
        for &(a, b) in &self.apertures {
            let (lo, hi) = (a.min(b), a.max(b));
            let count = ((hi - lo) / spacing).floor() as usize + 1;
            let offset = (hi - lo - (count - 1) as f32 * spacing) / 2.0;
            for i in 0..count {
                out.push(Vec2::new(self.x, lo + offset + i as f32 * spacing));
            }
        }
        out
    }
}

/// Secondary sources on the aperture (discretised Huygens construction).
///
/// Each aperture sample re-emits the primary wave it receives: its phase
/// carries the path delay from every primary source and its amplitude the
/// primary attenuation.
pub fn huygens_sources(primaries: &[WaveSource], samples: &[Vec2], wave: &WaveParams) -> Vec<WaveSource> {
    if wave.wavelength <= 0.0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(primaries.len() * samples.len());
    for &s in samples {
        for p in primaries {
            let d = p.pos.distance(s);
            out.push(WaveSource {
                pos: s,
                amplitude: p.amplitude * attenuation(d, wave.attenuation),
                phase: p.phase + TAU * d / wave.wavelength,
            });
        }
    }
    out
}

/// Fill `field` with the diffracted wave of `primaries` through `barrier`.
///
/// Cells on the source side get the direct superposition; cells beyond the
/// barrier get the Huygens sum normalised by the aperture sample count;
/// cells inside the wall are zero.
pub fn diffract(field: &mut ScalarField, primaries: &[WaveSource], barrier: &Barrier, time: f32, wave: &WaveParams) {
    let samples = barrier.samples(field.cell_size());
    let secondaries = huygens_sources(primaries, &samples, wave);
    let norm = if samples.is_empty() { 0.0 } else { 1.0 / samples.len() as f32 };
    let half = field.cell_size() / 2.0;

    field.recompute(|p| {
        if p.x < barrier.x - half {
            superpose(primaries, p, time, wave)
        } else if p.x <= barrier.x + half {
            if barrier.is_open(p.y) {
                superpose(primaries, p, time, wave)
            } else {
                0.0
            }
        } else {
            superpose(&secondaries, p, time, wave) * norm
        }
    });
}
