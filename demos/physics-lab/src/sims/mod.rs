//! Concrete simulations and shared drawing helpers.

pub mod collisions;
pub mod diffraction;
pub mod free_fall;
pub mod inclined_plane;
pub mod pendulum;
pub mod projectile;
pub mod spring;
pub mod standing_wave;
pub mod wave_interference;

use glam::Vec2;
use lab_engine::{percentage, Canvas, Color, DisplayDatum, SimContext};

pub const KINETIC_COLOR: Color = Color::rgb(0.86, 0.3, 0.24);
pub const POTENTIAL_COLOR: Color = Color::rgb(0.22, 0.47, 0.85);
pub const TOTAL_COLOR: Color = Color::rgb(0.3, 0.65, 0.35);

const BAR_WIDTH: f32 = 140.0;
const BAR_HEIGHT: f32 = 12.0;

/// Time readout row every simulation shows first.
pub fn time_row(ctx: &SimContext) -> DisplayDatum {
    DisplayDatum::number("時間", ctx.time, 2, "s")
}

/// Kinetic/potential/total energy rows.
pub fn energy_rows(kinetic: f32, potential: f32, potential_name: &str) -> [DisplayDatum; 3] {
    [
        DisplayDatum::number("運動エネルギー", kinetic, 2, "J"),
        DisplayDatum::number(potential_name, potential, 2, "J"),
        DisplayDatum::number("力学的エネルギー", kinetic + potential, 2, "J"),
    ]
}

/// Horizontal energy bars anchored at `origin` (top-left), scaled against
/// `reference`. A zero reference paints empty bars.
pub fn energy_bars(canvas: &mut Canvas, origin: Vec2, kinetic: f32, potential: f32, reference: f32) {
    let rows = [
        ("K", kinetic, KINETIC_COLOR),
        ("U", potential, POTENTIAL_COLOR),
        ("E", kinetic + potential, TOTAL_COLOR),
    ];
    let ink = canvas.ink();
    for (i, (name, value, color)) in rows.into_iter().enumerate() {
        let y = origin.y + i as f32 * (BAR_HEIGHT + 6.0);
        let filled = BAR_WIDTH * percentage(value, reference) / 100.0;
        canvas.stroke_rect(Vec2::new(origin.x + 16.0, y), BAR_WIDTH, BAR_HEIGHT, 1.0, Color::GRAY);
        canvas.fill_rect(Vec2::new(origin.x + 16.0, y), filled, BAR_HEIGHT, color);
        canvas.label(Vec2::new(origin.x, y + BAR_HEIGHT - 2.0), name, ink);
    }
}
