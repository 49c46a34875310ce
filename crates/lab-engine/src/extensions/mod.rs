// extensions/mod.rs
//
// Render-loop helpers decoupled from any particular simulation:
// easing curves, value tweens, and the mesh pool.

pub mod easing;
pub mod pool;
pub mod tween;

pub use easing::{ease, Easing, Lerp};
pub use pool::{MeshPool, PoolHandle};
pub use tween::{Tween, TweenId, TweenLoop, TweenState, TweenTarget};
