pub mod api;
pub mod config;
pub mod core;
pub mod extensions;
pub mod host;
pub mod render;

// Re-export key types at crate root for convenience
pub use api::error::{HostError, SimError};
pub use api::params::{ParameterSet, ParameterSpec};
pub use api::runner::ActiveSimulation;
pub use api::simulation::{ParamChange, SimContext, Simulation};
pub use api::types::{percentage, DisplayDatum, SurfaceSize};
pub use config::LabConfig;
pub use core::collision::{resolve_all, resolve_pair, Circle, Contact};
pub use core::field::{Barrier, ScalarField, WaveParams, WaveSource};
pub use core::integrate::{Bounds, WallHits};
pub use core::rng::Rng;
pub use core::time::{SimClock, DEFAULT_TIME_STEP};
pub use host::binder::{ControlPanel, ParameterBinder, SliderModel};
pub use host::driver::{FrameStatus, HostDriver};
pub use host::overlay::Overlay;
pub use host::prefs::{MemoryStore, PreferenceStore, Theme};
pub use host::registry::{ScenarioEntry, ScenarioInfo, ScenarioRegistry};
pub use render::canvas::{Canvas, CanvasVertex, FieldImage, TextLabel};
pub use render::color::Color;
pub use render::view::View2D;

// Extensions: render-loop helpers with no simulation knowledge
pub use extensions::{ease, Easing, Lerp, MeshPool, PoolHandle, Tween, TweenId, TweenLoop, TweenState, TweenTarget};
