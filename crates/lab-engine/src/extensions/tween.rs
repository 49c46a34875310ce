// extensions/tween.rs
//
// Tween scheduler: animates a value from A to B over a duration with an
// easing curve, ticked once per render frame on the host loop.
//
// Usage:
//   let mut tweens: TweenState<Prop, f32> = TweenState::new();
//   tweens.add(Prop::Alpha, Tween::new(1.0, 0.0, 0.5, Easing::QuadOut).with_delay(5.0));
//   tweens.tick(dt, &mut visuals);  // visuals: impl TweenTarget<Prop, f32>

use super::easing::{ease, Easing, Lerp};

/// What happens when a tween reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Apply the final value and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction (ping-pong).
    PingPong,
}

/// A single value animation.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    /// Duration in seconds.
    pub duration: f32,
    /// Wait before the tween starts moving.
    pub delay: f32,
    /// Elapsed time, including the delay.
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// Whether currently playing (can be paused).
    pub playing: bool,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
    /// Event id reported through `drain_completed` when a `Once` tween ends.
    pub on_complete: Option<u32>,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            delay: 0.0,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            playing: true,
            forward: true,
            on_complete: None,
        }
    }

    // -- Builder methods --

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_on_complete(mut self, event_id: u32) -> Self {
        self.on_complete = Some(event_id);
        self
    }

    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Normalized progress [0, 1], ignoring direction. 0 during the delay.
    pub fn progress(&self) -> f32 {
        let active = self.elapsed - self.delay;
        if active <= 0.0 {
            0.0
        } else if self.duration <= 0.0 {
            1.0
        } else {
            (active / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Whether the delay has elapsed.
    pub fn started(&self) -> bool {
        self.elapsed >= self.delay
    }

    /// Current interpolated value.
    pub fn value(&self) -> T {
        let t = if self.forward { self.progress() } else { 1.0 - self.progress() };
        ease(self.from, self.to, t, self.easing)
    }

    fn finished_cycle(&self) -> bool {
        self.elapsed - self.delay >= self.duration
    }
}

/// Receives tweened values. Implemented by whatever owns the visual state.
pub trait TweenTarget<K, T> {
    fn apply(&mut self, key: K, value: T);
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// All active tweens for one kind of value, keyed by the property they drive.
#[derive(Debug)]
pub struct TweenState<K, T: Lerp> {
    tweens: Vec<(TweenId, K, Tween<T>)>,
    next_id: u32,
    /// Completed tween events to be polled.
    completed_events: Vec<u32>,
}

impl<K: Copy + PartialEq, T: Lerp> TweenState<K, T> {
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
            completed_events: Vec::new(),
        }
    }

    /// Add a tween for `key`. Existing tweens on the same key are replaced,
    /// so a restarted fade never fights an older one.
    pub fn add(&mut self, key: K, tween: Tween<T>) -> TweenId {
        self.tweens.retain(|(_, k, _)| *k != key);
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push((id, key, tween));
        id
    }

    /// Remove a tween by handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(tid, _, _)| *tid != id);
        self.tweens.len() != before
    }

    pub fn resume(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.playing = true;
        }
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween<T>> {
        self.tweens.iter().find(|(tid, _, _)| *tid == id).map(|(_, _, t)| t)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween<T>> {
        self.tweens.iter_mut().find(|(tid, _, _)| *tid == id).map(|(_, _, t)| t)
    }

    /// Advance all tweens and push their values into `target`.
    /// Tweens still inside their delay are not applied.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, target: &mut impl TweenTarget<K, T>) -> usize {
        let mut completed = Vec::new();

        for (id, key, tween) in self.tweens.iter_mut() {
            if !tween.playing {
                continue;
            }
            tween.elapsed += dt;
            if !tween.started() {
                continue;
            }

            target.apply(*key, tween.value());

            if tween.finished_cycle() {
                match tween.loop_mode {
                    TweenLoop::Once => {
                        if let Some(event_id) = tween.on_complete {
                            self.completed_events.push(event_id);
                        }
                        completed.push(*id);
                    }
                    TweenLoop::Loop => {
                        tween.elapsed = tween.delay;
                    }
                    TweenLoop::PingPong => {
                        tween.elapsed = tween.delay;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        self.tweens.retain(|(id, _, _)| !completed.contains(id));
        completed.len()
    }

    /// Drain completion events; the owner runs its completion handling here.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed_events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed_events.clear();
    }
}

impl<K: Copy + PartialEq, T: Lerp> Default for TweenState<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
