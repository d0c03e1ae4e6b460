use core::ops::{Add, Sub};

use serde::Deserialize;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub pointer: PointerId,
    pub x: f32,
    pub y: f32,
    pub t_ms: u64,
}

impl PointerSample {
    pub const fn new(pointer: PointerId, x: f32, y: f32, t_ms: u64) -> Self {
        Self {
            pointer,
            x,
            y,
            t_ms,
        }
    }

    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Only x motion counts; the y delta is pinned to zero.
    #[default]
    Horizontal,
    /// x decides votes, y (upwards) decides passes.
    Both,
}

/// Per-axis clamp range applied to the raw drag delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragBounds {
    pub min: Vector2,
    pub max: Vector2,
}

impl DragBounds {
    pub fn symmetric(axis: Axis, max_magnitude: f32) -> Self {
        let m = max_magnitude.abs();
        let my = match axis {
            Axis::Horizontal => 0.0,
            Axis::Both => m,
        };
        Self {
            min: Vector2::new(-m, -my),
            max: Vector2::new(m, my),
        }
    }

    pub fn slide(travel: f32) -> Self {
        Self {
            min: Vector2::ZERO,
            max: Vector2::new(travel.abs(), 0.0),
        }
    }

    pub fn clamp(&self, delta: Vector2) -> Vector2 {
        Vector2 {
            x: clamp_axis(delta.x, self.min.x, self.max.x),
            y: clamp_axis(delta.y, self.min.y, self.max.y),
        }
    }

    pub fn extent_x(&self) -> f32 {
        self.min.x.abs().max(self.max.x.abs())
    }

    pub fn extent_y(&self) -> f32 {
        self.min.y.abs().max(self.max.y.abs())
    }

    /// Normalized drag completion in `[0, 1]`.
    pub fn progress(&self, delta: Vector2) -> f32 {
        let px = axis_fraction(delta.x, self.extent_x());
        let py = axis_fraction(delta.y, self.extent_y());
        px.max(py)
    }
}

fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(min).min(max)
}

fn axis_fraction(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    (value.abs() / extent).clamp(0.0, 1.0)
}
