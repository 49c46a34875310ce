/// Default fixed timestep: one frame at 60 Hz.
pub const DEFAULT_TIME_STEP: f32 = 0.016;

/// Simulation clock.
/// Advances by exactly one fixed step per update while running, regardless
/// of how long the host frame actually took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    /// Elapsed simulation time in seconds. Never negative.
    time: f32,
    /// The fixed delta time per update.
    time_step: f32,
    running: bool,
}

impl SimClock {
    pub fn new(time_step: f32) -> Self {
        let time_step = if time_step.is_finite() && time_step > 0.0 {
            time_step
        } else {
            DEFAULT_TIME_STEP
        };
        Self {
            time: 0.0,
            time_step,
            running: false,
        }
    }

    /// Advance one step if running. Returns whether time moved.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.time += self.time_step;
        true
    }

    /// Zero the time and stop.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.running = false;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// The fixed delta time.
    pub fn time_step(&self) -> f32 {
        self.time_step
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP)
    }
}
