//! Static scene: sky, ground and the leaf the droplets hang from
//!
//! All coordinates are in scene space, 800x600 with y growing downward,
//! the same space the simulation works in.

use egui::{Color32, Pos2};
use std::f32::consts::PI;

pub const SCENE_WIDTH: f32 = 800.0;
pub const SCENE_HEIGHT: f32 = 600.0;

const LEAF_X: f32 = SCENE_WIDTH / 2.0;
const LEAF_Y: f32 = SCENE_HEIGHT / 4.0;
const LEAF_WIDTH: f32 = 120.0;
const LEAF_HEIGHT: f32 = 40.0;

const OUTLINE_SAMPLES: usize = 50;
const VEIN_SAMPLES: usize = 20;
pub const SHADOW_OFFSET: f32 = 5.0;

pub const SKY_TOP: [u8; 3] = [150, 200, 255];
pub const SKY_BOTTOM: [u8; 3] = [200, 220, 255];
pub const GROUND_BROWN: Color32 = Color32::from_rgb(139, 69, 19);
pub const LEAF_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
pub const LEAF_DARK_GREEN: Color32 = Color32::from_rgb(20, 80, 20);
pub const VEIN_YELLOW: Color32 = Color32::from_rgb(154, 205, 50);

pub fn water_blue() -> Color32 {
    Color32::from_rgba_unmultiplied(100, 150, 255, 200)
}

pub fn splash_blue() -> Color32 {
    Color32::from_rgba_unmultiplied(135, 206, 235, 150)
}

pub fn shadow_gray() -> Color32 {
    Color32::from_rgba_unmultiplied(50, 50, 50, 100)
}

/// Where droplets form
pub fn leaf_tip() -> Pos2 {
    Pos2::new(LEAF_X + LEAF_WIDTH * 0.8, LEAF_Y + LEAF_HEIGHT * 0.5)
}

/// Precomputed leaf geometry.
///
/// The outline is not convex (the stem end is pinched) but every sample is
/// visible from `center`, so it can be filled as a triangle fan around it.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub center: Pos2,
    pub outline: Vec<Pos2>,
    pub shadow: Vec<Pos2>,
    pub inner: Vec<Pos2>,
    pub veins: Vec<Vec<Pos2>>,
}

impl Leaf {
    pub fn new() -> Self {
        let outline = leaf_outline();
        let shadow = outline
            .iter()
            .map(|p| Pos2::new(p.x + SHADOW_OFFSET, p.y + SHADOW_OFFSET))
            .collect();
        let inner = outline
            .iter()
            .map(|p| Pos2::new(p.x * 0.95 + LEAF_X * 0.05, p.y * 0.95 + LEAF_Y * 0.05))
            .collect();
        Self {
            center: Pos2::new(LEAF_X, LEAF_Y),
            outline,
            shadow,
            inner,
            veins: (-3..=3).map(vein).collect(),
        }
    }
}

impl Default for Leaf {
    fn default() -> Self {
        Self::new()
    }
}

/// Asymmetric oval tapering toward the tip
fn leaf_outline() -> Vec<Pos2> {
    let n = OUTLINE_SAMPLES as f32;
    let upper = (0..OUTLINE_SAMPLES).map(|i| {
        let t = i as f32 / n;
        let angle = t * PI;
        Pos2::new(
            LEAF_X + LEAF_WIDTH * angle.cos() * (1.0 - t * 0.5),
            LEAF_Y + LEAF_HEIGHT * angle.sin() * (1.0 + t * 0.2),
        )
    });
    let lower = (0..OUTLINE_SAMPLES).map(|i| {
        let t = (OUTLINE_SAMPLES - i) as f32 / n;
        let angle = (1.0 - t) * PI + PI;
        Pos2::new(
            LEAF_X + LEAF_WIDTH * angle.cos() * (1.0 - t * 0.5),
            LEAF_Y + LEAF_HEIGHT * angle.sin() * (1.0 + t * 0.2),
        )
    });
    upper.chain(lower).collect()
}

/// Quadratic Bezier vein fanning out at `index * 15` degrees
fn vein(index: i32) -> Vec<Pos2> {
    let angle = (index as f32 * 15.0).to_radians();
    let (sin, cos) = angle.sin_cos();
    let start = Pos2::new(LEAF_X, LEAF_Y);
    let control = Pos2::new(
        LEAF_X + LEAF_WIDTH * 0.4 * cos,
        LEAF_Y + LEAF_HEIGHT * 0.4 * sin,
    );
    let end = Pos2::new(
        LEAF_X + LEAF_WIDTH * 0.7 * cos,
        LEAF_Y + LEAF_HEIGHT * 0.7 * sin,
    );

    (0..VEIN_SAMPLES)
        .map(|step| {
            let u = step as f32 / (VEIN_SAMPLES - 1) as f32;
            let a = (1.0 - u) * (1.0 - u);
            let b = 2.0 * (1.0 - u) * u;
            let c = u * u;
            Pos2::new(
                a * start.x + b * control.x + c * end.x,
                a * start.y + b * control.y + c * end.y,
            )
        })
        .collect()
}

/// Sky colour for scene row `y`, blending over the top half of the scene
pub fn sky_color(y: f32) -> Color32 {
    let t = (y / (SCENE_HEIGHT / 2.0)).clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(
        mix(SKY_TOP[0], SKY_BOTTOM[0]),
        mix(SKY_TOP[1], SKY_BOTTOM[1]),
        mix(SKY_TOP[2], SKY_BOTTOM[2]),
    )
}
