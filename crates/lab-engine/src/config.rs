use serde::{Deserialize, Serialize};

use crate::api::error::HostError;
use crate::api::types::SurfaceSize;
use crate::core::field::DEFAULT_CELL_SIZE;
use crate::core::time::DEFAULT_TIME_STEP;
use crate::host::prefs::Theme;

/// Host configuration. Every field is optional in JSON and falls back to
/// the `Default` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabConfig {
    /// Rendering surface size in pixels (default: 800x500).
    pub surface: SurfaceSize,
    /// Fixed timestep in seconds (default: 0.016).
    pub time_step: f32,
    /// Edge length of one wave-field cell in pixels (default: 4).
    pub field_cell_size: f32,
    /// Scenario selected at startup. `None` picks the first registered one.
    pub default_scenario: Option<String>,
    /// Theme used when no preference is stored.
    pub theme: Theme,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceSize::default(),
            time_step: DEFAULT_TIME_STEP,
            field_cell_size: DEFAULT_CELL_SIZE,
            default_scenario: None,
            theme: Theme::Light,
        }
    }
}

impl LabConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let mut config: LabConfig = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    /// Replace out-of-range numbers with their defaults.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            log::warn!("config: invalid timeStep {}, using {}", self.time_step, defaults.time_step);
            self.time_step = defaults.time_step;
        }
        if !(self.field_cell_size.is_finite() && self.field_cell_size >= 1.0) {
            log::warn!(
                "config: invalid fieldCellSize {}, using {}",
                self.field_cell_size,
                defaults.field_cell_size
            );
            self.field_cell_size = defaults.field_cell_size;
        }
        let s = self.surface;
        if !s.is_usable() {
            log::warn!("config: invalid surface {}x{}, using default", s.width, s.height);
            self.surface = defaults.surface;
        }
    }
}
