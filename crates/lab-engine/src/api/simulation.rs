use super::error::SimError;
use super::params::{ParameterSet, ParameterSpec};
use super::types::{DisplayDatum, SurfaceSize};
use crate::render::canvas::Canvas;

/// Read-only view of the runner state handed to every simulation hook.
#[derive(Debug, Clone, Copy)]
pub struct SimContext<'a> {
    pub params: &'a ParameterSet,
    pub surface: SurfaceSize,
    /// Simulation time in seconds, already advanced for this step.
    pub time: f32,
    /// Fixed timestep.
    pub dt: f32,
    /// Cell edge for sampled fields, in pixels.
    pub field_cell: f32,
}

impl SimContext<'_> {
    /// Shorthand for `self.params.value(id)`.
    pub fn param(&self, id: &str) -> f32 {
        self.params.value(id)
    }
}

/// How a parameter change affects existing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamChange {
    /// The new value is read on the next step; state is kept.
    #[default]
    InPlace,
    /// Cached geometry is invalid: rebuild state from scratch, keeping
    /// the parameter values.
    Reinitialize,
}

/// The contract every concrete simulation fulfils.
///
/// The runner (`ActiveSimulation`) owns time, the running flag, parameters
/// and the display cache, and calls these hooks.
pub trait Simulation {
    /// Static parameter declaration, used to build sliders and seed defaults.
    fn define_parameters(&self) -> Vec<ParameterSpec>;

    /// Rebuild physical state from scratch for the current parameters and
    /// surface, including derived geometry (pivots, plane endpoints, walls).
    fn init_state(&mut self, ctx: &SimContext);

    /// React to a parameter write. Lightweight updates may touch state here.
    fn on_parameter_changed(&mut self, _id: &str, _value: f32, _ctx: &SimContext) -> ParamChange {
        ParamChange::InPlace
    }

    /// Integrate exactly one fixed timestep (`ctx.dt`).
    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError>;

    /// Readout rows derived from the current state.
    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum>;

    /// Paint the current state. Must not mutate simulation state.
    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas);
}
