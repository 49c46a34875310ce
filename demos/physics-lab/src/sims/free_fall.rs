//! Vertical drop of a ball onto the ground, with optional linear drag and
//! a bouncing floor.

use glam::Vec2;
use lab_engine::core::integrate::{floor_contact, settle_speed, step_scalar};
use lab_engine::{
    Canvas, Color, DisplayDatum, ParamChange, ParameterSpec, SimContext, SimError, Simulation, View2D,
};

use super::{energy_bars, energy_rows, time_row, KINETIC_COLOR};

#[derive(Debug, Default)]
pub struct FreeFall {
    /// Height above ground in m (y-up).
    height: f32,
    /// Vertical velocity in m/s, negative while falling.
    velocity: f32,
    initial_height: f32,
    landed: bool,
    bounces: u32,
}

impl FreeFall {
    pub fn new() -> Self {
        Self::default()
    }

    fn energies(&self, ctx: &SimContext) -> (f32, f32) {
        let m = ctx.param("mass");
        let g = ctx.param("gravity");
        (0.5 * m * self.velocity * self.velocity, m * g * self.height)
    }

    fn view(&self, ctx: &SimContext) -> View2D {
        let top = self.initial_height.max(1.0);
        View2D::fit(ctx.surface, Vec2::new(-top * 0.6, 0.0), Vec2::new(top * 0.6, top * 1.05), 30.0)
    }
}

impl Simulation for FreeFall {
    fn define_parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("gravity", "重力加速度").range(1.0, 20.0).step(0.1).default_value(9.8).unit("m/s²"),
            ParameterSpec::new("initialHeight", "初期高さ").range(10.0, 500.0).step(10.0).default_value(100.0).unit("m"),
            ParameterSpec::new("mass", "質量").range(0.1, 10.0).step(0.1).default_value(1.0).unit("kg"),
            ParameterSpec::new("airResistance", "空気抵抗").range(0.0, 2.0).step(0.01).default_value(0.0).unit("kg/s"),
            ParameterSpec::new("restitution", "反発係数").range(0.0, 1.0).step(0.05).default_value(0.0),
        ]
    }

    fn init_state(&mut self, ctx: &SimContext) {
        self.initial_height = ctx.param("initialHeight");
        self.height = self.initial_height;
        self.velocity = 0.0;
        self.landed = false;
        self.bounces = 0;
    }

    fn on_parameter_changed(&mut self, id: &str, _value: f32, _ctx: &SimContext) -> ParamChange {
        match id {
            "initialHeight" => ParamChange::Reinitialize,
            _ => ParamChange::InPlace,
        }
    }

    fn step(&mut self, ctx: &SimContext) -> Result<(), SimError> {
        let g = ctx.param("gravity");
        let drag = ctx.param("airResistance") / ctx.param("mass").max(1e-3);
        let accel = -g - drag * self.velocity;
        let falling = self.velocity < 0.0;

        step_scalar(&mut self.height, &mut self.velocity, accel, ctx.dt);
        if floor_contact(&mut self.height, &mut self.velocity, 0.0, ctx.param("restitution"), settle_speed(g, ctx.dt)) {
            if falling && self.velocity > 0.0 {
                self.bounces += 1;
            }
            self.landed = self.velocity == 0.0;
        } else {
            self.landed = false;
        }
        Ok(())
    }

    fn display_data(&self, ctx: &SimContext) -> Vec<DisplayDatum> {
        let (kinetic, potential) = self.energies(ctx);
        let mut rows = vec![
            time_row(ctx),
            DisplayDatum::number("高さ", self.height, 2, "m"),
            DisplayDatum::number("速度", -self.velocity, 2, "m/s"),
        ];
        rows.extend(energy_rows(kinetic, potential, "位置エネルギー"));
        rows.push(DisplayDatum::number("バウンド回数", self.bounces as f32, 0, "回"));
        rows.push(DisplayDatum::text("状態", if self.landed { "着地" } else { "落下中" }, ""));
        rows
    }

    fn draw(&self, ctx: &SimContext, canvas: &mut Canvas) {
        let ink = canvas.ink();
        let view = self.view(ctx);
        let half = self.initial_height.max(1.0) * 0.6;

        let ground = view.to_screen(Vec2::new(-half, 0.0));
        canvas.fill_rect(ground, view.length(2.0 * half), 12.0, Color::rgb8(120, 96, 64));
        canvas.line(view.to_screen(Vec2::new(-half, 0.0)), view.to_screen(Vec2::new(half, 0.0)), 2.0, ink);

        // Height ruler with a tick every tenth of the drop height.
        let ruler_x = -half * 0.7;
        canvas.line(
            view.to_screen(Vec2::new(ruler_x, 0.0)),
            view.to_screen(Vec2::new(ruler_x, self.initial_height)),
            1.0,
            Color::GRAY,
        );
        for i in 0..=10 {
            let y = self.initial_height * i as f32 / 10.0;
            let p = view.to_screen(Vec2::new(ruler_x, y));
            canvas.line(p, p + Vec2::new(8.0, 0.0), 1.0, Color::GRAY);
            if i % 5 == 0 {
                canvas.label(p + Vec2::new(12.0, 4.0), format!("{:.0} m", y), ink);
            }
        }

        let radius = 8.0 + ctx.param("mass").sqrt() * 4.0;
        let center = view.to_screen(Vec2::new(0.0, self.height)) - Vec2::new(0.0, radius);
        canvas.fill_circle(center, radius, Color::rgb8(220, 90, 60));
        canvas.stroke_circle(center, radius, 1.5, ink);

        let arrow = -self.velocity * 2.0;
        if arrow.abs() > 1.0 {
            canvas.arrow(center, center + Vec2::new(0.0, arrow), 2.0, KINETIC_COLOR);
        }

        let (kinetic, potential) = self.energies(ctx);
        let reference = ctx.param("mass") * ctx.param("gravity") * self.initial_height;
        energy_bars(canvas, Vec2::new(ctx.surface.width - 180.0, 20.0), kinetic, potential, reference);
    }
}
