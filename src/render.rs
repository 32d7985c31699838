use std::f64::consts::PI;

use rand::Rng;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::entity::{FallingObject, Truck};
use crate::game::Game;

const SKY_COLOR: &str = "#87CEEB";
const ROAD_COLOR: &str = "#666";
const LANE_COLOR: &str = "#FFF";
const LANE_DASH: [f64; 2] = [20.0, 20.0];
const STAR_COLOR: &str = "#FFD700";
const STAR_SPIKES: usize = 5;
const OBSTACLE_COLOR: &str = "#8B4513";
const TRUCK_COLOR: &str = "#FF4444";
const WHEEL_COLOR: &str = "#333";
const WHEEL_RADIUS: f64 = 10.0;
const WHEEL_INSET: f64 = 20.0;
const WINDOW_COLOR: &str = "#87CEEB";
const WINDOW_OFFSET: (f64, f64) = (50.0, 10.0);
const WINDOW_SIZE: f64 = 20.0;

/// The subset of a 2D canvas context the game draws with.
pub trait Surface {
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_dash(&mut self, segments: &[f64]);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
}

impl Surface for CanvasRenderingContext2d {
    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        let array = js_sys::Array::new();
        for segment in segments {
            array.push(&JsValue::from_f64(*segment));
        }
        let _ = CanvasRenderingContext2d::set_line_dash(self, &array);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let _ = CanvasRenderingContext2d::arc(self, x, y, radius, start_angle, end_angle);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }
}

/// Paints one full frame. Reads the game, never mutates it.
pub fn render<R: Rng>(game: &Game<R>, surface: &mut impl Surface) {
    let (width, height) = (game.width(), game.height());

    // The road covers the sky completely.
    surface.set_fill_style(SKY_COLOR);
    surface.fill_rect(0.0, 0.0, width, height);
    surface.set_fill_style(ROAD_COLOR);
    surface.fill_rect(0.0, 0.0, width, height);

    draw_lane_divider(surface, width, height);

    for star in game.stars() {
        draw_star(surface, star);
    }
    for obstacle in game.obstacles() {
        draw_obstacle(surface, obstacle);
    }
    draw_truck(surface, game.truck());
}

fn draw_lane_divider(surface: &mut impl Surface, width: f64, height: f64) {
    surface.set_stroke_style(LANE_COLOR);
    surface.set_line_dash(&LANE_DASH);
    surface.begin_path();
    surface.move_to(width / 2.0, 0.0);
    surface.line_to(width / 2.0, height);
    surface.stroke();
}

/// Vertices of a five-point star inscribed in the object's box, starting
/// at angle zero and alternating outer and inner radius.
pub fn star_points(star: &FallingObject) -> [(f64, f64); STAR_SPIKES * 2] {
    let outer = star.width / 2.0;
    let inner = star.width / 4.0;
    let cx = star.x + star.width / 2.0;
    let cy = star.y + star.height / 2.0;

    let mut points = [(0.0, 0.0); STAR_SPIKES * 2];
    for (i, point) in points.iter_mut().enumerate() {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = (i as f64 * PI) / STAR_SPIKES as f64;
        *point = (cx + angle.cos() * radius, cy + angle.sin() * radius);
    }
    points
}

fn draw_star(surface: &mut impl Surface, star: &FallingObject) {
    surface.set_fill_style(STAR_COLOR);
    surface.begin_path();
    for (i, (x, y)) in star_points(star).into_iter().enumerate() {
        if i == 0 {
            surface.move_to(x, y);
        } else {
            surface.line_to(x, y);
        }
    }
    surface.close_path();
    surface.fill();
}

fn draw_obstacle(surface: &mut impl Surface, obstacle: &FallingObject) {
    surface.set_fill_style(OBSTACLE_COLOR);
    surface.fill_rect(obstacle.x, obstacle.y, obstacle.width, obstacle.height);
}

fn draw_truck(surface: &mut impl Surface, truck: &Truck) {
    surface.set_fill_style(TRUCK_COLOR);
    surface.fill_rect(truck.x, truck.y, truck.width, truck.height);

    // Both wheels go into one path and are filled together.
    surface.set_fill_style(WHEEL_COLOR);
    surface.begin_path();
    let axle_y = truck.y + truck.height;
    surface.arc(truck.x + WHEEL_INSET, axle_y, WHEEL_RADIUS, 0.0, PI * 2.0);
    surface.arc(
        truck.x + truck.width - WHEEL_INSET,
        axle_y,
        WHEEL_RADIUS,
        0.0,
        PI * 2.0,
    );
    surface.fill();

    surface.set_fill_style(WINDOW_COLOR);
    surface.fill_rect(
        truck.x + WINDOW_OFFSET.0,
        truck.y + WINDOW_OFFSET.1,
        WINDOW_SIZE,
        WINDOW_SIZE,
    );
}
