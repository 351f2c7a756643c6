//! Interactive top-down city viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulated [`World`] and
//! implements [`eframe::App`] to render it as a pannable, zoomable map and
//! expose the city parameters through an egui UI.

use city_core::{
    config::{CityParams, Param},
    layout::{Building, StaticProp},
    road::{Orientation, ROAD_WIDTH},
    sky::{ORBIT_RADIUS, hsl_to_rgb},
    vehicle::Vehicle,
    world::{TICK_DT, World},
};
use eframe::App;
use glam::Vec2;
use rand::Rng;

/// Vehicle footprint in world units, nose along the heading.
const VEHICLE_LENGTH: f32 = 0.8;
const VEHICLE_WIDTH: f32 = 0.4;

/// Base colors before the daylight factor is applied.
const GROUND: [f32; 3] = [0.18, 0.33, 0.17];
const ROAD: [f32; 3] = [0.16, 0.16, 0.18];
const LANE_LINE: [f32; 3] = [0.85, 0.8, 0.5];
const PARK: [f32; 3] = [0.2, 0.52, 0.24];
const CANOPY: [f32; 3] = [0.1, 0.38, 0.14];
const BUILDING: [f32; 3] = [0.56, 0.56, 0.62];
const WINDOW_GLOW: [f32; 3] = [0.95, 0.9, 0.55];

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: one [`World`] plus a slider-bound copy of its
///   [`CityParams`].
/// - Camera state (pan/zoom) for the top-down map.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions (buttons, sliders, camera).
/// 2. If `running` and a tick is due, call [`World::tick`].
/// 3. Render roads, props, vehicles, clouds, and the sky backdrop.
///
/// ### Fields
/// - `world` - The simulation being displayed and driven.
/// - `params` - Slider-bound parameter values; every edit is forwarded to
///   [`World::set_param`], which decides whether the layout regenerates.
///
/// - `running` - Whether the simulation is currently auto-ticking.
/// - `zoom` - Pixels per world unit for the map.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `last_tick_time` - Time stamp of the last tick (egui time).
pub struct Viewer {
    world: World,
    params: CityParams,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    last_tick_time: f64,
}

impl Viewer {
    /// Creates a viewer around a freshly generated city.
    ///
    /// The world starts from [`CityParams::default`] and a seed drawn from
    /// the thread RNG, so every launch shows a different city. The camera
    /// starts centered with a zoom that fits the default grid radius, and
    /// the simulation is running.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`] ready to be passed to
    /// `eframe::run_native`.
    pub fn new() -> Self {
        let seed: u64 = rand::rng().random();
        let params = CityParams::default();

        Self {
            world: World::new(params, seed),
            params,
            running: true,
            zoom: 16.0,
            pan: egui::vec2(0.0, 0.0),
            last_tick_time: 0.0,
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive world z points up the screen.
    ///
    /// ### Parameters
    /// - `p` - World-space position `(x, z)`.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding egui position in screen-space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding), using the same `zoom`, `pan`, and `rect` center.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Forwards one parameter edit to the world.
    fn commit(&mut self, param: Param) {
        self.world.set_param(param);
    }

    /// Builds the top panel UI (run controls and city actions).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.world.tick();
                }

                ui.separator();

                if ui.button("Regenerate").clicked() {
                    self.world.regenerate();
                }

                if ui.button("Add 5 vehicles").clicked() {
                    self.world.add_vehicles(5);
                }

                if ui.button("+ Streetlight").clicked() {
                    // Placement can fail when every sample lands on a
                    // road; the failure is silent, as in the layout pass.
                    self.world.add_streetlight();
                }

                if ui.button("- Streetlight").clicked() {
                    self.world.remove_random_streetlight();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 4.0..=40.0).text("Zoom"));
            });
        });
    }

    /// Builds the right-hand panel with the five city parameters.
    ///
    /// Slider edits go through [`World::set_param`], so layout parameters
    /// regenerate the city on the fly while the hour only relights it.
    fn ui_params_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("params_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("City parameters");

                ui.separator();
                ui.label("Layout");
                if ui
                    .add(egui::Slider::new(&mut self.params.grid_radius, 5.0..=30.0).text("radius"))
                    .changed()
                {
                    self.commit(Param::GridRadius(self.params.grid_radius));
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.params.building_density, 0.0..=1.0)
                            .text("building density"),
                    )
                    .changed()
                {
                    self.commit(Param::BuildingDensity(self.params.building_density));
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.params.max_building_height, 1.0..=30.0)
                            .text("max height"),
                    )
                    .changed()
                {
                    self.commit(Param::MaxBuildingHeight(self.params.max_building_height));
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.params.green_space_ratio, 0.0..=1.0)
                            .text("green space"),
                    )
                    .changed()
                {
                    self.commit(Param::GreenSpaceRatio(self.params.green_space_ratio));
                }

                ui.separator();
                ui.label("Time");
                if ui
                    .add(egui::Slider::new(&mut self.params.time_of_day, 0.0..=24.0).text("hour"))
                    .changed()
                {
                    self.commit(Param::TimeOfDay(self.params.time_of_day));
                }

                ui.separator();
                if ui.button("Reset to defaults").clicked() {
                    self.params = CityParams::default();
                    for param in [
                        Param::GridRadius(self.params.grid_radius),
                        Param::MaxBuildingHeight(self.params.max_building_height),
                        Param::BuildingDensity(self.params.building_density),
                        Param::GreenSpaceRatio(self.params.green_space_ratio),
                        Param::TimeOfDay(self.params.time_of_day),
                    ] {
                        self.commit(param);
                    }
                }
            });
    }

    /// Builds the bottom status bar (clock, sun, entity counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format_clock(self.params.time_of_day));
                ui.label(if self.world.sky.is_night {
                    "night"
                } else {
                    "day"
                });
                ui.label(format!("sun = {:.0}%", self.world.sky.sun_intensity * 100.0));
                ui.separator();

                let buildings = self
                    .world
                    .props
                    .iter()
                    .filter(|p| matches!(p, StaticProp::Building(_)))
                    .count();
                let parks = self
                    .world
                    .props
                    .iter()
                    .filter(|p| matches!(p, StaticProp::Park { .. }))
                    .count();
                let lights = self
                    .world
                    .props
                    .iter()
                    .filter(|p| p.is_streetlight())
                    .count();

                ui.label(format!("buildings = {buildings}"));
                ui.label(format!("parks = {parks}"));
                ui.label(format!("streetlights = {lights}"));
                ui.label(format!("vehicles = {}", self.world.vehicles.len()));
            });
        });
    }

    /// Builds the central map: camera handling, all drawing, and the
    /// fixed-step tick driver.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(4.0, 40.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            self.draw_city(&painter, rect);

            // Auto-run at the fixed tick rate.
            if self.running {
                let now = ctx.input(|i| i.time);
                if now - self.last_tick_time >= TICK_DT as f64 {
                    self.world.tick();
                    self.last_tick_time = now;
                }
                ctx.request_repaint();
            }
        });
    }

    /// Draws the whole scene back-to-front: sky backdrop, ground, roads,
    /// props, vehicles, clouds, then the sun/moon strip.
    fn draw_city(&self, painter: &egui::Painter, rect: egui::Rect) {
        let sky = &self.world.sky;
        // Scales the ground palette between night and noon.
        let daylight = 0.35 + 0.65 * sky.sun_intensity;

        painter.rect_filled(rect, 0.0, rgb(sky.background));

        // Ground square.
        let r = self.world.params().grid_radius;
        let ground = egui::Rect::from_two_pos(
            self.world_to_screen(Vec2::new(-r, -r), rect),
            self.world_to_screen(Vec2::new(r, r), rect),
        );
        painter.rect_filled(ground, 0.0, shaded(GROUND, daylight));

        // Lanes with their center lines.
        let half = ROAD_WIDTH * 0.5;
        for lane in &self.world.roads.lanes {
            let (a, b, la, lb) = match lane.orientation {
                Orientation::Vertical => (
                    Vec2::new(lane.offset - half, -r),
                    Vec2::new(lane.offset + half, r),
                    Vec2::new(lane.offset, -r),
                    Vec2::new(lane.offset, r),
                ),
                Orientation::Horizontal => (
                    Vec2::new(-r, lane.offset - half),
                    Vec2::new(r, lane.offset + half),
                    Vec2::new(-r, lane.offset),
                    Vec2::new(r, lane.offset),
                ),
            };
            let band = egui::Rect::from_two_pos(
                self.world_to_screen(a, rect),
                self.world_to_screen(b, rect),
            );
            painter.rect_filled(band, 0.0, shaded(ROAD, daylight));
            painter.line_segment(
                [
                    self.world_to_screen(la, rect),
                    self.world_to_screen(lb, rect),
                ],
                egui::Stroke::new((0.08 * self.zoom).max(1.0), shaded(LANE_LINE, daylight)),
            );
        }

        for prop in &self.world.props {
            match prop {
                StaticProp::Park { pos } => {
                    let half_side = 0.5 * self.zoom;
                    let center = self.world_to_screen(*pos, rect);
                    let square = egui::Rect::from_center_size(
                        center,
                        egui::vec2(half_side * 2.0, half_side * 2.0),
                    );
                    painter.rect_filled(square, 0.0, shaded(PARK, daylight));
                    painter.circle_filled(center, 0.3 * self.zoom, shaded(CANOPY, daylight));
                }
                StaticProp::Building(b) => {
                    let center = self.world_to_screen(b.pos, rect);
                    let square = egui::Rect::from_center_size(
                        center,
                        egui::vec2(self.zoom, self.zoom),
                    );
                    painter.rect_filled(square, 0.0, building_fill(b, daylight));
                }
                StaticProp::Streetlight { pos } => {
                    let center = self.world_to_screen(*pos, rect);
                    if self.world.sky.is_night {
                        painter.circle_filled(
                            center,
                            2.2 * self.zoom,
                            egui::Color32::from_rgba_unmultiplied(255, 240, 170, 26),
                        );
                    }
                    painter.circle_filled(center, 0.12 * self.zoom, egui::Color32::from_gray(60));
                }
            }
        }

        for (i, v) in self.world.vehicles.iter().enumerate() {
            let points: Vec<egui::Pos2> = vehicle_outline(v)
                .iter()
                .map(|&p| self.world_to_screen(p, rect))
                .collect();
            painter.add(egui::Shape::convex_polygon(
                points,
                vehicle_fill(i, daylight),
                egui::Stroke::NONE,
            ));

            if v.headlights_on {
                let forward = vehicle_forward(v.yaw);
                let right = forward.perp();
                for side in [-1.0, 1.0] {
                    let lamp = v.pos
                        + forward * (VEHICLE_LENGTH * 0.5)
                        + right * (side * VEHICLE_WIDTH * 0.3);
                    painter.circle_filled(
                        self.world_to_screen(lamp, rect),
                        (0.07 * self.zoom).max(1.5),
                        egui::Color32::from_rgb(255, 250, 190),
                    );
                }
            }
        }

        // Clouds float above everything else on the map.
        let cloud_fill = egui::Color32::from_rgba_unmultiplied(
            255,
            255,
            255,
            if sky.is_night { 48 } else { 96 },
        );
        for c in &self.world.clouds {
            let center = Vec2::new(c.pos.x, c.pos.z);
            for i in 0..c.puffs {
                let t = i as f32;
                let off = Vec2::new((t * 2.4).cos(), (t * 2.4).sin()) * (0.45 * t.sqrt());
                painter.circle_filled(
                    self.world_to_screen(center + off, rect),
                    0.7 * self.zoom,
                    cloud_fill,
                );
            }
        }

        self.draw_sky_bodies(painter, rect);
    }

    /// Draws the sun and moon as discs in a strip along the top edge,
    /// horizontally placed by their orbit position. Bodies below the
    /// horizon are skipped.
    fn draw_sky_bodies(&self, painter: &egui::Painter, rect: egui::Rect) {
        let sky = &self.world.sky;
        let horizon = rect.top() + 46.0;
        let span = rect.width() * 0.4;

        if sky.sun_pos.y > 0.0 {
            let x = rect.center().x + sky.sun_pos.x / ORBIT_RADIUS * span;
            let y = horizon - sky.sun_pos.y / ORBIT_RADIUS * 28.0;
            painter.circle_filled(egui::pos2(x, y), 10.0, egui::Color32::from_rgb(255, 214, 90));
        }
        if sky.moon_pos.y > 0.0 {
            let x = rect.center().x + sky.moon_pos.x / ORBIT_RADIUS * span;
            let y = horizon - sky.moon_pos.y / ORBIT_RADIUS * 28.0;
            painter.circle_filled(egui::pos2(x, y), 8.0, egui::Color32::from_rgb(214, 214, 224));
        }
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_params_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

/// Converts a linear `[0, 1]` RGB triple to an egui color.
fn rgb(c: [f32; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(
        (c[0] * 255.0) as u8,
        (c[1] * 255.0) as u8,
        (c[2] * 255.0) as u8,
    )
}

/// Same as [`rgb`] with all components scaled by `k`.
fn shaded(c: [f32; 3], k: f32) -> egui::Color32 {
    rgb([c[0] * k, c[1] * k, c[2] * k])
}

/// Building footprints blend toward the window-glow color as their lit
/// window fraction rises, so towers light up at night.
fn building_fill(b: &Building, daylight: f32) -> egui::Color32 {
    let lit = b.windows.iter().filter(|w| w.lit).count();
    let base = [
        BUILDING[0] * daylight,
        BUILDING[1] * daylight,
        BUILDING[2] * daylight,
    ];
    if lit == 0 {
        return rgb(base);
    }

    let frac = lit as f32 / b.windows.len() as f32;
    let k = 0.6 * frac;
    rgb([
        base[0] + (WINDOW_GLOW[0] - base[0]) * k,
        base[1] + (WINDOW_GLOW[1] - base[1]) * k,
        base[2] + (WINDOW_GLOW[2] - base[2]) * k,
    ])
}

/// Stable per-vehicle body color, spread around the hue wheel by index.
fn vehicle_fill(index: usize, daylight: f32) -> egui::Color32 {
    let hue = index as f32 * 0.618;
    shaded(hsl_to_rgb(hue, 0.6, 0.5), daylight.max(0.6))
}

/// Unit vector a vehicle with this yaw is facing along, in world `(x, z)`.
fn vehicle_forward(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

/// World-space corners of a vehicle's footprint, oriented by its yaw.
fn vehicle_outline(v: &Vehicle) -> [Vec2; 4] {
    let forward = vehicle_forward(v.yaw);
    let right = forward.perp();
    let nose = forward * (VEHICLE_LENGTH * 0.5);
    let side = right * (VEHICLE_WIDTH * 0.5);
    [
        v.pos + nose + side,
        v.pos + nose - side,
        v.pos - nose - side,
        v.pos - nose + side,
    ]
}

/// Formats a fractional hour as `HH:MM`, wrapping 24:00 to 00:00.
fn format_clock(hour: f32) -> String {
    let minutes = (hour * 60.0).round() as u32 % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
