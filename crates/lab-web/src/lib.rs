pub mod dom;
pub mod runner;
pub mod storage;

pub use runner::LabRunner;
pub use storage::LocalStorageStore;

/// Generate all `#[wasm_bindgen]` exports for a lab.
///
/// Generates the `thread_local!` storage for the `LabRunner`, a
/// `with_runner()` helper and the exports the page calls (init, tick,
/// controls, slider input and data accessors).
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod scenarios;
///
/// lab_web::export_lab!(scenarios::registry, "physics-lab");
/// ```
///
/// # Arguments
///
/// - `$registry`: path to a `fn() -> lab_engine::ScenarioRegistry`
/// - `$lab_name`: string literal used in log messages
#[macro_export]
macro_rules! export_lab {
    ($registry:path, $lab_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::LabRunner>> = RefCell::new(None);
            static PANEL_ID: RefCell<String> = RefCell::new(String::new());
        }

        /// Run `f` against the runner. `None` before `lab_init` succeeded.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::LabRunner) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        fn report_failure(message: &str) {
            PANEL_ID.with(|id| $crate::dom::show_error_panel(&id.borrow(), message));
        }

        /// Initialize the lab. `config_json` may be empty. On a missing or
        /// unusable canvas the error panel replaces `panel_id`'s content and
        /// the lab stays uninitialized.
        #[wasm_bindgen]
        pub fn lab_init(config_json: &str, canvas_id: &str, panel_id: &str) -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
            PANEL_ID.with(|id| *id.borrow_mut() = panel_id.to_string());

            let mut config = if config_json.trim().is_empty() {
                lab_engine::LabConfig::default()
            } else {
                lab_engine::LabConfig::from_json(config_json).unwrap_or_else(|e| {
                    log::warn!("{}: {}, using defaults", $lab_name, e);
                    lab_engine::LabConfig::default()
                })
            };

            match $crate::dom::check_canvas(canvas_id) {
                Ok(Some(surface)) => config.surface = surface,
                Ok(None) => {}
                Err(e) => {
                    log::error!("{}: {}", $lab_name, e);
                    report_failure(&e.to_string());
                    return false;
                }
            }

            let store = Box::new($crate::LocalStorageStore::open());
            let mut runner = $crate::LabRunner::new($registry(), config, store);
            if let Err(e) = runner.init() {
                log::error!("{}: {}", $lab_name, e);
                report_failure(&e.to_string());
                return false;
            }
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("{}: initialized", $lab_name);
            true
        }

        /// One animation frame. Returns a status code (0 idle, 1 paused,
        /// 2 running, 3 failed).
        #[wasm_bindgen]
        pub fn lab_tick() -> u32 {
            let (status, failure) = with_runner(|r| {
                let status = r.tick();
                (status, r.take_new_failure())
            })
            .unwrap_or(($crate::runner::STATUS_IDLE, None));
            if let Some(message) = failure {
                report_failure(&message);
            }
            status
        }

        #[wasm_bindgen]
        pub fn lab_select(id: &str) -> bool {
            with_runner(|r| r.select(id)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn lab_toggle() -> bool {
            with_runner(|r| r.toggle()).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn lab_reset() {
            with_runner(|r| r.reset());
        }

        #[wasm_bindgen]
        pub fn lab_set_param(id: &str, raw: &str) -> f32 {
            with_runner(|r| r.set_param(id, raw)).unwrap_or(f32::NAN)
        }

        #[wasm_bindgen]
        pub fn lab_resize(width: f32, height: f32) -> bool {
            with_runner(|r| r.resize(width, height)).unwrap_or(false)
        }

        // ---- JSON accessors ----

        #[wasm_bindgen]
        pub fn get_sliders_json() -> String {
            with_runner(|r| r.sliders_json()).unwrap_or_else(|| "[]".into())
        }

        #[wasm_bindgen]
        pub fn get_display_json() -> String {
            with_runner(|r| r.display_json()).unwrap_or_else(|| "[]".into())
        }

        #[wasm_bindgen]
        pub fn get_scenarios_json() -> String {
            with_runner(|r| r.scenarios_json()).unwrap_or_else(|| "[]".into())
        }

        #[wasm_bindgen]
        pub fn get_labels_json() -> String {
            with_runner(|r| r.labels_json()).unwrap_or_else(|| "[]".into())
        }

        #[wasm_bindgen]
        pub fn get_controls_json() -> String {
            with_runner(|r| r.controls_json()).unwrap_or_else(|| "{}".into())
        }

        #[wasm_bindgen]
        pub fn get_error_message() -> String {
            with_runner(|r| r.error_message()).unwrap_or_default()
        }

        // ---- Buffer accessors ----

        #[wasm_bindgen]
        pub fn get_vertices_ptr() -> *const f32 {
            with_runner(|r| r.vertices_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_vertex_count() -> u32 {
            with_runner(|r| r.vertex_count()).unwrap_or(0)
        }

        /// Copy of the vertex buffer, for hosts that do not read wasm memory.
        #[wasm_bindgen]
        pub fn get_vertices() -> js_sys::Float32Array {
            with_runner(|r| js_sys::Float32Array::from(r.vertices()))
                .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
        }

        #[wasm_bindgen]
        pub fn get_field_pixels() -> js_sys::Uint8ClampedArray {
            with_runner(|r| js_sys::Uint8ClampedArray::from(r.field_pixels()))
                .unwrap_or_else(|| js_sys::Uint8ClampedArray::new_with_length(0))
        }

        #[wasm_bindgen]
        pub fn get_field_geometry() -> js_sys::Float32Array {
            let geometry = with_runner(|r| r.field_geometry()).unwrap_or([0.0; 6]);
            js_sys::Float32Array::from(&geometry[..])
        }

        #[wasm_bindgen]
        pub fn get_background() -> js_sys::Uint8Array {
            let rgba = with_runner(|r| r.background_rgba()).unwrap_or([255; 4]);
            js_sys::Uint8Array::from(&rgba[..])
        }

        // ---- Theme ----

        #[wasm_bindgen]
        pub fn get_theme() -> String {
            with_runner(|r| r.theme().to_string()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn set_theme(name: &str) -> bool {
            with_runner(|r| r.set_theme(name)).unwrap_or(false)
        }
    };
}
