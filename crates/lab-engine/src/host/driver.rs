//! Per-frame host loop.
//!
//! `HostDriver` is the single owner of the active simulation. Switching
//! scenario drops the old instance and constructs a new one; nothing else
//! holds a reference to it.

use crate::api::error::HostError;
use crate::api::runner::ActiveSimulation;
use crate::api::types::{DisplayDatum, SurfaceSize};
use crate::config::LabConfig;
use crate::render::canvas::Canvas;
use crate::render::color::Color;

use super::binder::{ControlPanel, ParameterBinder, SliderModel, PAUSE_LABEL, RESET_LABEL, START_LABEL};
use super::overlay::Overlay;
use super::prefs::Theme;
use super::registry::ScenarioRegistry;

/// Outcome of one `frame` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// No scenario selected.
    Idle,
    /// Painted without advancing time.
    Paused,
    /// Advanced one step and painted.
    Running,
    /// The simulation failed; the loop is cancelled until the user resets
    /// or switches scenario.
    Failed,
}

const OVERLAY_ACCENT: Color = Color::ORANGE;

pub struct HostDriver {
    registry: ScenarioRegistry,
    config: LabConfig,
    active: Option<(&'static str, ActiveSimulation)>,
    canvas: Canvas,
    binder: ParameterBinder,
    controls: ControlPanel,
    overlay: Overlay,
    theme: Theme,
    failure: Option<String>,
    frames: u64,
}

impl HostDriver {
    pub fn new(registry: ScenarioRegistry, config: LabConfig) -> Self {
        let theme = config.theme;
        Self {
            registry,
            config,
            active: None,
            canvas: Canvas::new(),
            binder: ParameterBinder::new(),
            controls: ControlPanel::new(),
            overlay: Overlay::new(),
            theme,
            failure: None,
            frames: 0,
        }
    }

    /// Select the configured default scenario, or the first registered one.
    pub fn select_default(&mut self) -> Result<(), HostError> {
        let id = match self.config.default_scenario.clone() {
            Some(id) if self.registry.get(&id).is_some() => id,
            Some(id) => {
                log::warn!("default scenario '{}' is not registered", id);
                self.first_id()?
            }
            None => self.first_id()?,
        };
        self.select(&id)
    }

    fn first_id(&self) -> Result<String, HostError> {
        self.registry
            .first_id()
            .map(str::to_string)
            .ok_or_else(|| HostError::UnknownScenario(String::new()))
    }

    /// Tear down the current simulation and construct `id` from scratch.
    /// An unknown id leaves the current simulation in place.
    pub fn select(&mut self, id: &str) -> Result<(), HostError> {
        let (entry, fresh) = self.registry.construct(id)?;
        self.active = None;
        let sim = ActiveSimulation::new(fresh, self.config.surface, self.config.time_step)
            .with_field_cell(self.config.field_cell_size);
        self.binder.rebuild(sim.parameters());
        self.controls.sync(false);
        self.failure = None;
        self.overlay.clear();
        self.overlay.highlight();
        self.active = Some((entry.id, sim));
        log::info!("scenario selected: {} ({})", entry.id, entry.title);
        Ok(())
    }

    /// Run one animation frame: advance if running, then paint.
    pub fn frame(&mut self) -> FrameStatus {
        if self.failure.is_some() {
            return FrameStatus::Failed;
        }
        let Some((id, sim)) = self.active.as_mut() else {
            return FrameStatus::Idle;
        };
        let running = sim.is_running();
        if let Err(e) = sim.update() {
            log::error!("simulation '{}' failed at t={:.3}s: {}", id, sim.time(), e);
            sim.stop();
            self.controls.sync(false);
            self.failure = Some(HostError::from(e).to_string());
            return FrameStatus::Failed;
        }

        self.canvas.clear(self.theme.background());
        self.canvas.set_ink(self.theme.foreground());
        sim.draw(&mut self.canvas);
        let surface = sim.surface();
        let dt = sim.time_step();
        self.overlay.tick(dt);
        self.overlay.draw(&mut self.canvas, surface, OVERLAY_ACCENT);
        self.frames += 1;

        if running {
            FrameStatus::Running
        } else {
            FrameStatus::Paused
        }
    }

    /// Start button. Returns the new running state.
    pub fn toggle_start(&mut self) -> Result<bool, HostError> {
        if self.failure.is_some() {
            return Ok(false);
        }
        let (_, sim) = self.active.as_mut().ok_or(HostError::NoActiveSimulation)?;
        let running = sim.toggle();
        self.controls.sync(running);
        self.overlay.flash_label(if running { START_LABEL } else { PAUSE_LABEL });
        Ok(running)
    }

    /// Reset button: parameter defaults, fresh state, stopped. Also
    /// recovers from a failed frame.
    pub fn reset(&mut self) -> Result<(), HostError> {
        let (_, sim) = self.active.as_mut().ok_or(HostError::NoActiveSimulation)?;
        sim.reset();
        self.binder.rebuild(sim.parameters());
        self.controls.sync(false);
        self.failure = None;
        self.overlay.flash_label(RESET_LABEL);
        Ok(())
    }

    /// Slider input event. Returns the applied value.
    pub fn slider_input(&mut self, id: &str, raw: &str) -> Option<f32> {
        let (_, sim) = self.active.as_mut()?;
        let applied = self.binder.on_input(sim, id, raw)?;
        self.controls.sync(sim.is_running());
        Some(applied)
    }

    /// Adopt a new surface size. Non-finite, non-positive or oversized
    /// dimensions are ignored.
    pub fn resize(&mut self, surface: SurfaceSize) -> bool {
        if !surface.is_usable() {
            log::warn!("ignoring resize to {}x{}", surface.width, surface.height);
            return false;
        }
        self.config.surface = surface;
        if let Some((_, sim)) = self.active.as_mut() {
            sim.resize(surface);
            self.controls.sync(sim.is_running());
        }
        true
    }

    /// Current readout rows. Replaced wholesale every frame.
    pub fn display(&self) -> &[DisplayDatum] {
        match &self.active {
            Some((_, sim)) => sim.data_to_display(),
            None => &[],
        }
    }

    pub fn sliders(&self) -> &[SliderModel] {
        self.binder.sliders()
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active.as_ref().map(|(id, _)| *id)
    }

    pub fn active(&self) -> Option<&ActiveSimulation> {
        self.active.as_ref().map(|(_, sim)| sim)
    }

    /// Message for the error panel, if the loop was cancelled.
    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
