use serde::Serialize;
use std::f64::consts::PI;

// Points per closed loop
pub const PATH_POINTS: usize = 100;
pub const DEFAULT_PADDING: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

fn closed_loop(f: impl Fn(f64) -> PathPoint) -> Vec<PathPoint> {
    (0..PATH_POINTS)
        .map(|i| f(i as f64 / PATH_POINTS as f64 * PI * 2.0))
        .collect()
}

/// Lissajous figure-8 (`x ~ sin 2t`, `y ~ sin t`) centred on the screen.
pub fn generate_figure8_path(screen_width: f64, screen_height: f64, padding: f64) -> Vec<PathPoint> {
    let (cx, cy) = (screen_width / 2.0, screen_height / 2.0);
    let rx = (screen_width - padding * 2.0) * 0.35;
    let ry = (screen_height - padding * 2.0) * 0.3;

    closed_loop(|t| PathPoint::new(cx + rx * (t * 2.0).sin(), cy + ry * t.sin()))
}

// Lemniscate-style alternative, wider and flatter
pub fn generate_infinity_path(screen_width: f64, screen_height: f64, padding: f64) -> Vec<PathPoint> {
    let (cx, cy) = (screen_width / 2.0, screen_height / 2.0);
    let rx = (screen_width - padding * 2.0) * 0.4;
    let ry = (screen_height - padding * 2.0) * 0.25;

    closed_loop(|t| {
        let scale = 2.0 / (3.0 - (2.0 * t).cos());
        PathPoint::new(
            cx + rx * scale * t.cos(),
            cy + ry * scale * (2.0 * t).sin() / 2.0,
        )
    })
}

// Heading in degrees; +90 so a sprite drawn nose-up faces the motion
pub fn calculate_rotation(current: PathPoint, next: PathPoint) -> f64 {
    let dx = next.x - current.x;
    let dy = next.y - current.y;
    dy.atan2(dx).to_degrees() + 90.0
}

// One angle per segment, the last segment wraps back to point 0
pub fn generate_rotation_path(points: &[PathPoint]) -> Vec<f64> {
    let n = points.len();
    (0..n)
        .map(|i| calculate_rotation(points[i], points[(i + 1) % n]))
        .collect()
}

pub fn responsive_padding(screen_width: f64) -> f64 {
    if screen_width < 640.0 {
        60.0
    } else if screen_width < 1024.0 {
        80.0
    } else {
        100.0
    }
}
