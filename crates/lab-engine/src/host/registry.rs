use serde::Serialize;

use crate::api::error::HostError;
use crate::api::simulation::Simulation;

/// Constructor for a fresh simulation instance.
pub type Constructor = fn() -> Box<dyn Simulation>;

/// One selectable scenario.
#[derive(Clone, Copy)]
pub struct ScenarioEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub construct: Constructor,
}

/// Scenario id and title as sent to the scenario selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioInfo {
    pub id: &'static str,
    pub title: &'static str,
}

/// Ordered table of scenarios. Registration order is display order.
#[derive(Default, Clone)]
pub struct ScenarioRegistry {
    entries: Vec<ScenarioEntry>,
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario. A duplicate id replaces the earlier entry in place.
    pub fn register(&mut self, id: &'static str, title: &'static str, construct: Constructor) -> &mut Self {
        let entry = ScenarioEntry { id, title, construct };
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                log::warn!("scenario '{}' registered twice, replacing", id);
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Build a new instance of the scenario, paired with its entry.
    pub fn construct(&self, id: &str) -> Result<(ScenarioEntry, Box<dyn Simulation>), HostError> {
        let entry = *self.get(id).ok_or_else(|| HostError::UnknownScenario(id.to_string()))?;
        Ok((entry, (entry.construct)()))
    }

    pub fn first_id(&self) -> Option<&'static str> {
        self.entries.first().map(|e| e.id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn list(&self) -> Vec<ScenarioInfo> {
        self.entries
            .iter()
            .map(|e| ScenarioInfo { id: e.id, title: e.title })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::error::SimError;
    use crate::api::params::ParameterSpec;
    use crate::api::simulation::{ParamChange, SimContext};
    use crate::api::types::DisplayDatum;
    use crate::render::canvas::Canvas;
    use crate::render::color::Color;

    /// Counter simulation shared by the host tests.
    #[derive(Default)]
    pub(crate) struct Counter {
        pub ticks: u32,
        pub explode_after: Option<u32>,
    }

    impl Simulation for Counter {
        fn define_parameters(&self) -> Vec<ParameterSpec> {
            vec![
                ParameterSpec::new("rate", "速さ").range(0.0, 10.0).step(0.5).default_value(2.0).unit("m/s"),
                ParameterSpec::new("count", "個数").range(1.0, 20.0).step(1.0).default_value(4.0),
            ]
        }

        fn init_state(&mut self, _ctx: &SimContext) {
            self.ticks = 0;
        }

        fn on_parameter_changed(&mut self, id: &str, _value: f32, _ctx: &SimContext) -> ParamChange {
            if id == "count" {
                ParamChange::Reinitialize
            } else {
                ParamChange::InPlace
            }
        }

        fn step(&mut self, _ctx: &SimContext) -> Result<(), SimError> {
            self.ticks += 1;
            match self.explode_after {
                Some(n) if self.ticks > n => Err(SimError::Diverged { quantity: "ticks".into() }),
                _ => Ok(()),
            }
        }

        fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
            vec![
                DisplayDatum::number("時間", ctx.time, 2, "s"),
                DisplayDatum::number("回数", self.ticks as f32, 0, ""),
            ]
        }

        fn draw(&self, _ctx: &SimContext, canvas: &mut Canvas) {
            canvas.fill_rect(glam::Vec2::ZERO, 10.0, 10.0, Color::BLUE);
        }
    }

    pub(crate) fn counter() -> Box<dyn Simulation> {
        Box::new(Counter::default())
    }

    pub(crate) fn exploding() -> Box<dyn Simulation> {
        Box::new(Counter { ticks: 0, explode_after: Some(2) })
    }

    pub(crate) fn registry() -> ScenarioRegistry {
        let mut registry = ScenarioRegistry::new();
        registry.register("counter", "カウンタ", counter).register("exploding", "発散", exploding);
        registry
    }

    #[test]
    fn lookup_and_order() {
        let r = registry();
        assert_eq!(r.len(), 2);
        assert_eq!(r.first_id(), Some("counter"));
        assert_eq!(r.ids().collect::<Vec<_>>(), vec!["counter", "exploding"]);
        assert_eq!(r.get("exploding").map(|e| e.title), Some("発散"));
    }

    #[test]
    fn unknown_id_is_error() {
        let r = registry();
        assert!(matches!(r.construct("nope"), Err(HostError::UnknownScenario(id)) if id == "nope"));
        let (entry, sim) = r.construct("counter").unwrap();
        assert_eq!(entry.id, "counter");
        assert_eq!(sim.define_parameters().len(), 2);
    }

    #[test]
    fn duplicate_registration_replaces() {
        let mut r = registry();
        r.register("counter", "別名", exploding);
        assert_eq!(r.len(), 2);
        assert_eq!(r.get("counter").map(|e| e.title), Some("別名"));
    }

    #[test]
    fn list_serializes_for_selector() {
        let json = serde_json::to_string(&registry().list()).unwrap();
        assert_eq!(json, r#"[{"id":"counter","title":"カウンタ"},{"id":"exploding","title":"発散"}]"#);
    }
}
