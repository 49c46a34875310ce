use super::error::SimError;
use super::params::ParameterSet;
use super::simulation::{ParamChange, SimContext, Simulation};
use super::types::{DisplayDatum, SurfaceSize};
use crate::core::field::DEFAULT_CELL_SIZE;
use crate::core::time::SimClock;
use crate::render::canvas::Canvas;

/// Lifecycle runner for one simulation instance.
///
/// Owns the simulation exclusively, together with its parameters, clock and
/// the display rows computed on the last update. Constructed once per
/// selected scenario and dropped on switch.
pub struct ActiveSimulation<S: Simulation + ?Sized = dyn Simulation> {
    sim: Box<S>,
    params: ParameterSet,
    clock: SimClock,
    surface: SurfaceSize,
    field_cell: f32,
    display: Vec<DisplayDatum>,
}

fn context<'a>(params: &'a ParameterSet, clock: &SimClock, surface: SurfaceSize, field_cell: f32) -> SimContext<'a> {
    SimContext {
        params,
        surface,
        time: clock.time(),
        dt: clock.time_step(),
        field_cell,
    }
}

impl<S: Simulation + ?Sized> ActiveSimulation<S> {
    /// Wrap a simulation and reset it.
    pub fn new(sim: Box<S>, surface: SurfaceSize, time_step: f32) -> Self {
        let params = ParameterSet::from_specs(sim.define_parameters());
        let mut active = Self {
            sim,
            params,
            clock: SimClock::new(time_step),
            surface,
            field_cell: DEFAULT_CELL_SIZE,
            display: Vec::new(),
        };
        active.reset();
        active
    }

    /// Use a different field cell size and rebuild state.
    pub fn with_field_cell(mut self, cell: f32) -> Self {
        if cell.is_finite() && cell > 0.0 {
            self.field_cell = cell;
            self.reinitialize();
        }
        self
    }

    /// Restore parameter defaults and rebuild state. Time goes to 0, stopped.
    pub fn reset(&mut self) {
        self.params.reset_to_defaults();
        self.reinitialize();
    }

    /// Rebuild state for the current parameter values. Time goes to 0, stopped.
    pub fn reinitialize(&mut self) {
        self.clock.reset();
        let ctx = context(&self.params, &self.clock, self.surface, self.field_cell);
        self.sim.init_state(&ctx);
        self.display = self.sim.display_data(&ctx);
    }

    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Flip the running flag. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.clock.is_running() {
            self.clock.stop();
        } else {
            self.clock.start();
        }
        self.clock.is_running()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn time_step(&self) -> f32 {
        self.clock.time_step()
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Write a parameter. Undeclared ids are ignored and return false.
    pub fn set_parameter(&mut self, id: &str, value: f32) -> bool {
        let Some(applied) = self.params.set(id, value) else {
            log::debug!("ignoring unknown parameter '{}'", id);
            return false;
        };
        let ctx = context(&self.params, &self.clock, self.surface, self.field_cell);
        match self.sim.on_parameter_changed(id, applied, &ctx) {
            ParamChange::InPlace => {
                self.display = self.sim.display_data(&ctx);
            }
            ParamChange::Reinitialize => self.reinitialize(),
        }
        true
    }

    pub fn parameter(&self, id: &str) -> Option<f32> {
        self.params.get(id)
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Advance one fixed step if running and refresh the readout.
    /// A stopped simulation is left untouched.
    pub fn update(&mut self) -> Result<(), SimError> {
        if !self.clock.advance() {
            return Ok(());
        }
        let ctx = context(&self.params, &self.clock, self.surface, self.field_cell);
        self.sim.step(&ctx)?;
        self.display = self.sim.display_data(&ctx);
        if let Some(bad) = self.display.iter().find(|d| !d.is_finite()) {
            return Err(SimError::Diverged {
                quantity: bad.name.clone(),
            });
        }
        Ok(())
    }

    /// Paint the current frame.
    pub fn draw(&self, canvas: &mut Canvas) {
        self.sim.draw(&context(&self.params, &self.clock, self.surface, self.field_cell), canvas);
    }

    /// Rows computed on the last update, reset or parameter change.
    pub fn data_to_display(&self) -> &[DisplayDatum] {
        &self.display
    }

    /// New surface dimensions invalidate derived geometry.
    pub fn resize(&mut self, surface: SurfaceSize) {
        if surface != self.surface {
            self.surface = surface;
            self.reinitialize();
        }
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }
}
