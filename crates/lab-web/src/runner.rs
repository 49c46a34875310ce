use lab_engine::host::prefs::{load_theme, save_theme};
use lab_engine::{FrameStatus, HostDriver, HostError, LabConfig, PreferenceStore, ScenarioRegistry, SurfaceSize, Theme};
use serde_json::json;

/// Frame status codes returned to JavaScript by `lab_tick`.
pub const STATUS_IDLE: u32 = 0;
pub const STATUS_PAUSED: u32 = 1;
pub const STATUS_RUNNING: u32 = 2;
pub const STATUS_FAILED: u32 = 3;

/// Browser-facing wrapper around `HostDriver`.
///
/// Each demo crate keeps one `LabRunner` in a `thread_local!` and exports
/// free functions via `#[wasm_bindgen]` (see `export_lab!`). All data that
/// crosses the boundary is either a pointer into a flat buffer or a JSON
/// string.
pub struct LabRunner {
    driver: HostDriver,
    prefs: Box<dyn PreferenceStore>,
    /// Whether the current failure was already handed to the page.
    failure_reported: bool,
}

impl LabRunner {
    pub fn new(registry: ScenarioRegistry, config: LabConfig, prefs: Box<dyn PreferenceStore>) -> Self {
        let theme = load_theme(prefs.as_ref(), config.theme);
        let mut driver = HostDriver::new(registry, config);
        driver.set_theme(theme);
        Self { driver, prefs, failure_reported: false }
    }

    /// Select the startup scenario.
    pub fn init(&mut self) -> Result<(), HostError> {
        self.driver.select_default()
    }

    /// Run one animation frame. Returns one of the `STATUS_*` codes.
    pub fn tick(&mut self) -> u32 {
        match self.driver.frame() {
            FrameStatus::Idle => STATUS_IDLE,
            FrameStatus::Paused => STATUS_PAUSED,
            FrameStatus::Running => STATUS_RUNNING,
            FrameStatus::Failed => STATUS_FAILED,
        }
    }

    /// The failure message, once. Subsequent calls return `None` until the
    /// next failure.
    pub fn take_new_failure(&mut self) -> Option<String> {
        if self.failure_reported {
            return None;
        }
        let message = self.driver.error_message()?.to_string();
        self.failure_reported = true;
        Some(message)
    }

    pub fn select(&mut self, id: &str) -> bool {
        match self.driver.select(id) {
            Ok(()) => {
                self.failure_reported = false;
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.driver.toggle_start().unwrap_or_else(|e| {
            log::warn!("{}", e);
            false
        })
    }

    pub fn reset(&mut self) {
        if let Err(e) = self.driver.reset() {
            log::warn!("{}", e);
        }
        self.failure_reported = false;
    }

    /// Slider input. Returns the applied value, or NaN when ignored.
    pub fn set_param(&mut self, id: &str, raw: &str) -> f32 {
        self.driver.slider_input(id, raw).unwrap_or(f32::NAN)
    }

    /// False when the size was rejected.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.driver.resize(SurfaceSize::new(width, height))
    }

    // ---- JSON accessors ----

    pub fn sliders_json(&self) -> String {
        to_json(self.driver.sliders())
    }

    pub fn display_json(&self) -> String {
        to_json(self.driver.display())
    }

    pub fn scenarios_json(&self) -> String {
        to_json(&self.driver.registry().list())
    }

    pub fn labels_json(&self) -> String {
        to_json(self.driver.canvas().labels())
    }

    pub fn controls_json(&self) -> String {
        let controls = self.driver.controls();
        json!({
            "start": controls.start_label(),
            "reset": controls.reset_label(),
            "running": self.driver.active().is_some_and(|s| s.is_running()),
            "scenario": self.driver.active_id(),
        })
        .to_string()
    }

    // ---- Buffer accessors ----

    pub fn vertices_ptr(&self) -> *const f32 {
        self.driver.canvas().buffer_ptr()
    }

    pub fn vertex_count(&self) -> u32 {
        self.driver.canvas().vertex_count() as u32
    }

    pub fn vertices(&self) -> &[f32] {
        self.driver.canvas().buffer()
    }

    /// RGBA8 pixels of the wave field, empty when the frame has none.
    pub fn field_pixels(&self) -> &[u8] {
        self.driver.canvas().field_image().map_or(&[][..], |img| img.pixels.as_slice())
    }

    /// `[width, height, dest_x, dest_y, dest_w, dest_h]`, zeros without a field.
    pub fn field_geometry(&self) -> [f32; 6] {
        match self.driver.canvas().field_image() {
            Some(img) => {
                let [x, y, w, h] = img.dest;
                [img.width as f32, img.height as f32, x, y, w, h]
            }
            None => [0.0; 6],
        }
    }

    pub fn background_rgba(&self) -> [u8; 4] {
        self.driver.canvas().background().to_rgba8()
    }

    pub fn error_message(&self) -> String {
        self.driver.error_message().unwrap_or_default().to_string()
    }

    // ---- Theme ----

    pub fn theme(&self) -> Theme {
        self.driver.theme()
    }

    /// Apply and persist a theme by name. Unknown names are ignored.
    pub fn set_theme(&mut self, name: &str) -> bool {
        match name.parse::<Theme>() {
            Ok(theme) => {
                self.driver.set_theme(theme);
                save_theme(self.prefs.as_mut(), theme);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn driver(&self) -> &HostDriver {
        &self.driver
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialization failed: {}", e);
        String::from("[]")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lab_engine::host::prefs::{MemoryStore, THEME_KEY};
    use lab_engine::{Canvas, Color, DisplayDatum, ParameterSpec, SimContext, SimError, Simulation};

    #[derive(Default)]
    struct Ramp {
        x: f32,
    }

    impl Simulation for Ramp {
        fn define_parameters(&self) -> Vec<ParameterSpec> {
            vec![ParameterSpec::new("slope", "傾き").range(0.0, 5.0).step(0.5).default_value(1.0).unit("m/s")]
        }

        fn init_state(&mut self, _ctx: &SimContext) {
            self.x = 0.0;
        }

        fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
            self.x += ctx.param("slope") * ctx.dt;
            if self.x > 0.05 {
                self.x = f32::INFINITY;
            }
            Ok(())
        }

        fn display_data(&self, _ctx: &SimContext) -> Vec<DisplayDatum> {
            vec![DisplayDatum::number("位置", self.x, 3, "m")]
        }

        fn draw(&self, _ctx: &SimContext, canvas: &mut Canvas) {
            canvas.fill_circle(Vec2::new(20.0, 20.0), 8.0, Color::BLUE);
            canvas.label(Vec2::new(20.0, 40.0), "ramp", Color::BLACK);
        }
    }

    fn ramp() -> Box<dyn Simulation> {
        Box::new(Ramp::default())
    }

    fn runner_with(store: MemoryStore) -> LabRunner {
        let mut registry = ScenarioRegistry::new();
        registry.register("ramp", "坂", ramp);
        let mut runner = LabRunner::new(registry, LabConfig::default(), Box::new(store));
        runner.init().unwrap();
        runner
    }

    #[test]
    fn tick_paints_and_exposes_buffers() {
        let mut runner = runner_with(MemoryStore::new());
        assert_eq!(runner.tick(), STATUS_PAUSED);
        assert!(runner.vertex_count() > 0);
        assert_eq!(runner.vertices().len(), runner.vertex_count() as usize * 6);
        assert!(runner.labels_json().contains("ramp"));
        assert!(runner.field_pixels().is_empty());
        assert_eq!(runner.field_geometry(), [0.0; 6]);
    }

    #[test]
    fn json_accessors() {
        let runner = runner_with(MemoryStore::new());
        assert_eq!(runner.scenarios_json(), r#"[{"id":"ramp","title":"坂"}]"#);
        assert!(runner.sliders_json().contains(r#""readout":"1.0 m/s""#));
        assert!(runner.display_json().contains("位置"));
        assert!(runner.controls_json().contains("開始"));
    }

    #[test]
    fn set_param_reports_ignored_input() {
        let mut runner = runner_with(MemoryStore::new());
        assert_eq!(runner.set_param("slope", "2.2"), 2.0);
        assert!(runner.set_param("slope", "abc").is_nan());
        assert!(runner.set_param("nope", "1").is_nan());
    }

    #[test]
    fn resize_rejects_unusable_sizes() {
        let mut runner = runner_with(MemoryStore::new());
        assert!(!runner.resize(f32::INFINITY, 500.0));
        assert!(!runner.resize(0.0, 0.0));
        assert_eq!(runner.tick(), STATUS_PAUSED);
        assert!(runner.resize(640.0, 480.0));
        assert_eq!(runner.driver().active().unwrap().surface().width, 640.0);
    }

    #[test]
    fn failure_is_reported_once() {
        let mut runner = runner_with(MemoryStore::new());
        runner.toggle();
        let mut status = STATUS_RUNNING;
        for _ in 0..100 {
            status = runner.tick();
            if status == STATUS_FAILED {
                break;
            }
        }
        assert_eq!(status, STATUS_FAILED);
        assert!(runner.take_new_failure().unwrap().contains("位置"));
        assert!(runner.take_new_failure().is_none());
        assert!(!runner.error_message().is_empty());
        assert!(runner.select("ramp"));
        assert!(runner.error_message().is_empty());
    }

    #[test]
    fn theme_round_trips_through_store() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark");
        let mut runner = runner_with(store);
        assert_eq!(runner.theme(), Theme::Dark);
        assert!(runner.set_theme("light"));
        assert!(!runner.set_theme("neon"));
        assert_eq!(runner.theme(), Theme::Light);
        runner.tick();
        assert_eq!(runner.background_rgba(), Theme::Light.background().to_rgba8());
    }
}
