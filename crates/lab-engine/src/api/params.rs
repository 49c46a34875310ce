//! Bounded, user-adjustable numeric parameters.
//!
//! A simulation declares its parameters once as `ParameterSpec`s; the runner
//! keeps the current values in a `ParameterSet`.

use serde::Serialize;

/// Static declaration of one slider-backed parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
    pub unit: &'static str,
}

impl ParameterSpec {
    /// Start a declaration. Defaults to a [0, 1] range with 0.01 step.
    pub fn new(id: &'static str, display_name: &'static str) -> Self {
        Self {
            id,
            display_name,
            min: 0.0,
            max: 1.0,
            step: 0.01,
            default: 0.0,
            unit: "",
        }
    }

    // -- Builder methods --

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = min.min(max);
        self.max = max.max(min);
        self
    }

    pub fn step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn default_value(mut self, value: f32) -> Self {
        self.default = value;
        self
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Clamp into `[min, max]`. NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }

    /// Snap to the step grid anchored at `default`, then clamp.
    pub fn snap(&self, value: f32) -> f32 {
        if self.step <= 0.0 || !value.is_finite() {
            return self.clamp(value);
        }
        let steps = ((value - self.default) / self.step).round();
        self.clamp(self.default + steps * self.step)
    }
}

/// Current values for a simulation's declared parameters, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(ParameterSpec, f32)>,
}

impl ParameterSet {
    /// Seed every parameter with its default.
    pub fn from_specs(specs: Vec<ParameterSpec>) -> Self {
        let entries = specs
            .into_iter()
            .map(|spec| {
                let value = spec.clamp(spec.default);
                (spec, value)
            })
            .collect();
        Self { entries }
    }

    /// Current value of `id`, if declared.
    pub fn get(&self, id: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.id == id)
            .map(|(_, v)| *v)
    }

    /// Current value of a parameter the caller declared itself.
    /// Unknown ids read as 0.0.
    pub fn value(&self, id: &str) -> f32 {
        match self.get(id) {
            Some(v) => v,
            None => {
                log::warn!("read of undeclared parameter '{}'", id);
                0.0
            }
        }
    }

    /// Overwrite a value, clamped into range. Returns the applied value,
    /// or `None` (and leaves the set untouched) for undeclared ids.
    pub fn set(&mut self, id: &str, value: f32) -> Option<f32> {
        let (spec, slot) = self.entries.iter_mut().find(|(spec, _)| spec.id == id)?;
        *slot = spec.clamp(value);
        Some(*slot)
    }

    pub fn spec(&self, id: &str) -> Option<&ParameterSpec> {
        self.entries.iter().map(|(s, _)| s).find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.spec(id).is_some()
    }

    pub fn reset_to_defaults(&mut self) {
        for (spec, value) in &mut self.entries {
            *value = spec.clamp(spec.default);
        }
    }

    pub fn specs(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.entries.iter().map(|(s, _)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterSpec, f32)> {
        self.entries.iter().map(|(s, v)| (s, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
