#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum HapticTier {
    #[default]
    Low = 0,
    Medium = 1,
    High = 2,
}

impl HapticTier {
    pub fn from_progress(progress: f32, medium_at: f32, high_at: f32) -> Self {
        let p = clamp_unit(progress);
        if p >= high_at {
            Self::High
        } else if p >= medium_at {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Quadratic ease-out: steep start, flat finish.
pub fn ease_out(progress: f32) -> f32 {
    let inv = 1.0 - clamp_unit(progress);
    1.0 - inv * inv
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * clamp_unit(t)
}

pub fn lerp_ms(from: u64, to: u64, t: f32) -> u64 {
    lerp(from as f32, to as f32, t).round().max(0.0) as u64
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
