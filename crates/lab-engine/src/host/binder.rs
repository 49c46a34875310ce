//! Slider and button state for the parameter panel.
//!
//! The binder mirrors the active simulation's `ParameterSet` as a list of
//! slider models. Slider input goes through `on_input`, which snaps the raw
//! value to the parameter's step grid before writing it.

use serde::Serialize;

use crate::api::params::{ParameterSet, ParameterSpec};
use crate::api::runner::ActiveSimulation;

pub const START_LABEL: &str = "開始";
pub const PAUSE_LABEL: &str = "一時停止";
pub const RESET_LABEL: &str = "リセット";

/// One labeled range slider with its text readout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderModel {
    pub id: &'static str,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub value: f32,
    /// `"{value} {unit}"`, formatted to the step's precision.
    pub readout: String,
}

impl SliderModel {
    fn new(spec: &ParameterSpec, value: f32) -> Self {
        Self {
            id: spec.id,
            label: spec.display_name,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            value,
            readout: readout(spec, value),
        }
    }
}

/// Decimals needed to show every value on a step grid.
pub fn step_decimals(step: f32) -> usize {
    if !(step.is_finite() && step > 0.0) {
        return 2;
    }
    (0..=4)
        .find(|&d| {
            let scaled = step * 10f32.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-3
        })
        .unwrap_or(4)
}

/// Readout text for a value: `"{value} {unit}"`, or just the value if the
/// parameter is unitless.
pub fn readout(spec: &ParameterSpec, value: f32) -> String {
    let number = format!("{:.*}", step_decimals(spec.step), value);
    if spec.unit.is_empty() {
        number
    } else {
        format!("{} {}", number, spec.unit)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParameterBinder {
    sliders: Vec<SliderModel>,
}

impl ParameterBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every slider from the current parameter values.
    /// Called when the simulation is swapped or reset.
    pub fn rebuild(&mut self, params: &ParameterSet) {
        self.sliders = params.iter().map(|(spec, value)| SliderModel::new(spec, value)).collect();
    }

    pub fn sliders(&self) -> &[SliderModel] {
        &self.sliders
    }

    /// Handle a slider input event carrying the raw string value.
    /// Returns the applied value, or `None` when the input was ignored.
    pub fn on_input(&mut self, sim: &mut ActiveSimulation, id: &str, raw: &str) -> Option<f32> {
        let parsed: f32 = match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("ignoring malformed input '{}' for parameter '{}'", raw, id);
                return None;
            }
        };
        if !parsed.is_finite() {
            log::warn!("ignoring non-finite input for parameter '{}'", id);
            return None;
        }
        let snapped = sim.parameters().spec(id)?.snap(parsed);
        if !sim.set_parameter(id, snapped) {
            return None;
        }
        let applied = sim.parameter(id)?;
        // A structural change may have reinitialized the simulation, but the
        // other sliders still hold their values.
        self.refresh(sim.parameters(), id);
        Some(applied)
    }

    fn refresh(&mut self, params: &ParameterSet, id: &str) {
        let Some(spec) = params.spec(id) else {
            return;
        };
        let value = params.value(id);
        match self.sliders.iter_mut().find(|s| s.id == id) {
            Some(slider) => *slider = SliderModel::new(spec, value),
            None => self.rebuild(params),
        }
    }
}

/// Start/Reset button state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    running: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self { running: false }
    }

    /// Follow the simulation's running flag.
    pub fn sync(&mut self, running: bool) {
        self.running = running;
    }

    pub fn start_label(&self) -> &'static str {
        if self.running {
            PAUSE_LABEL
        } else {
            START_LABEL
        }
    }

    pub fn reset_label(&self) -> &'static str {
        RESET_LABEL
    }
}
