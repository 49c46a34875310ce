use serde::{Deserialize, Serialize};

/// Largest accepted surface edge in pixels.
pub const MAX_SURFACE_EDGE: f32 = 16384.0;

/// Size of the rendering surface in pixels.
/// Simulations derive their fixed geometry (pivots, planes, walls) from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite, positive and at most `MAX_SURFACE_EDGE` on both axes.
    pub fn is_usable(&self) -> bool {
        let edge = |v: f32| v.is_finite() && v > 0.0 && v <= MAX_SURFACE_EDGE;
        edge(self.width) && edge(self.height)
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(800.0, 500.0)
    }
}

/// One row of the data readout shown next to a simulation.
/// Derived from simulation state every frame, never stored as state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDatum {
    pub name: String,
    pub value: String,
    pub unit: String,
    /// Raw numeric value, if the row is numeric. Used for finiteness checks.
    #[serde(skip)]
    pub raw: Option<f32>,
}

impl DisplayDatum {
    /// A numeric row formatted with a fixed number of decimals.
    pub fn number(name: impl Into<String>, value: f32, decimals: usize, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: format!("{:.*}", decimals, value),
            unit: unit.into(),
            raw: Some(value),
        }
    }

    /// A free-form text row such as a status label.
    pub fn text(name: impl Into<String>, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: unit.into(),
            raw: None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.raw.map_or(true, f32::is_finite)
    }
}

/// Percentage of `part` in `whole`, 0 when `whole` is degenerate.
/// Used for energy bars so a zero total never paints NaN.
pub fn percentage(part: f32, whole: f32) -> f32 {
    if whole.abs() <= f32::EPSILON || !whole.is_finite() || !part.is_finite() {
        0.0
    } else {
        (part / whole * 100.0).clamp(0.0, 100.0)
    }
}
