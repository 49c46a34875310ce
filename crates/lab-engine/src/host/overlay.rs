//! Transient visual feedback drawn over the simulation.
//!
//! Both effects are plain opacity tweens ticked once per frame; their
//! completion events clear the corresponding state.

use glam::Vec2;

use crate::api::types::SurfaceSize;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenState, TweenTarget};
use crate::render::canvas::Canvas;
use crate::render::color::Color;

/// Seconds the scenario highlight stays before it starts fading.
pub const HIGHLIGHT_HOLD: f32 = 5.0;
const HIGHLIGHT_FADE: f32 = 1.0;
const LABEL_FADE: f32 = 1.2;

const LABEL_DONE: u32 = 1;
const HIGHLIGHT_DONE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayProp {
    LabelAlpha,
    HighlightAlpha,
}

#[derive(Debug, Default)]
struct OverlayVisuals {
    label: Option<&'static str>,
    label_alpha: f32,
    highlight_alpha: f32,
}

impl TweenTarget<OverlayProp, f32> for OverlayVisuals {
    fn apply(&mut self, key: OverlayProp, value: f32) {
        match key {
            OverlayProp::LabelAlpha => self.label_alpha = value,
            OverlayProp::HighlightAlpha => self.highlight_alpha = value,
        }
    }
}

#[derive(Debug, Default)]
pub struct Overlay {
    tweens: TweenState<OverlayProp, f32>,
    visuals: OverlayVisuals,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` centred on the surface, fading out.
    pub fn flash_label(&mut self, text: &'static str) {
        self.visuals.label = Some(text);
        self.visuals.label_alpha = 1.0;
        self.tweens.add(
            OverlayProp::LabelAlpha,
            Tween::new(1.0, 0.0, LABEL_FADE, Easing::QuadIn).with_on_complete(LABEL_DONE),
        );
    }

    /// Frame the surface, holding for `HIGHLIGHT_HOLD` seconds then fading.
    pub fn highlight(&mut self) {
        self.visuals.highlight_alpha = 1.0;
        self.tweens.add(
            OverlayProp::HighlightAlpha,
            Tween::new(1.0, 0.0, HIGHLIGHT_FADE, Easing::SineInOut)
                .with_delay(HIGHLIGHT_HOLD)
                .with_on_complete(HIGHLIGHT_DONE),
        );
    }

    pub fn tick(&mut self, dt: f32) {
        self.tweens.tick(dt, &mut self.visuals);
        let done: Vec<u32> = self.tweens.drain_completed().collect();
        for event in done {
            match event {
                LABEL_DONE => {
                    self.visuals.label = None;
                    self.visuals.label_alpha = 0.0;
                }
                HIGHLIGHT_DONE => self.visuals.highlight_alpha = 0.0,
                _ => {}
            }
        }
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.visuals = OverlayVisuals::default();
    }

    pub fn label(&self) -> Option<&'static str> {
        self.visuals.label
    }

    pub fn label_alpha(&self) -> f32 {
        self.visuals.label_alpha
    }

    pub fn highlight_alpha(&self) -> f32 {
        self.visuals.highlight_alpha
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn draw(&self, canvas: &mut Canvas, surface: SurfaceSize, accent: Color) {
        if self.visuals.highlight_alpha > 0.0 {
            let inset = 3.0;
            canvas.stroke_rect(
                Vec2::splat(inset),
                surface.width - 2.0 * inset,
                surface.height - 2.0 * inset,
                4.0,
                accent.with_alpha(self.visuals.highlight_alpha),
            );
        }
        if let Some(text) = self.visuals.label {
            if self.visuals.label_alpha > 0.0 {
                canvas.label(surface.center(), text, accent.with_alpha(self.visuals.label_alpha));
            }
        }
    }
}
