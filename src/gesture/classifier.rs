use crate::types::Vote;

use super::session::DragRelease;

pub const DEFAULT_DISPLACEMENT_THRESHOLD: f32 = 80.0;
pub const DEFAULT_VERTICAL_THRESHOLD: f32 = 100.0;
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 40_000.0;
pub const DEFAULT_COMMIT_RATIO: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClassifierStrategy {
    Displacement {
        threshold: f32,
        vertical_threshold: Option<f32>,
    },
    /// Commits when `dx * vx` exceeds the threshold, so short fast flicks
    /// commit and long drags that stall before release do not.
    VelocityWeighted {
        threshold: f32,
        vertical_threshold: Option<f32>,
    },
    /// Single-axis slider: commits past `travel * commit_ratio`.
    Fractional { travel: f32, commit_ratio: f32 },
}

impl Default for ClassifierStrategy {
    fn default() -> Self {
        Self::Displacement {
            threshold: DEFAULT_DISPLACEMENT_THRESHOLD,
            vertical_threshold: None,
        }
    }
}

impl ClassifierStrategy {
    pub const fn is_fractional(&self) -> bool {
        matches!(self, Self::Fractional { .. })
    }

    pub fn classify(&self, release: &DragRelease) -> Option<Vote> {
        if !release.moved {
            return None;
        }
        let delta = release.delta;
        match *self {
            Self::Displacement {
                threshold,
                vertical_threshold,
            } => {
                if delta.x > threshold {
                    Some(Vote::Positive)
                } else if delta.x < -threshold {
                    Some(Vote::Negative)
                } else {
                    classify_pass(delta.y, vertical_threshold)
                }
            }
            Self::VelocityWeighted {
                threshold,
                vertical_threshold,
            } => {
                let weighted = delta.x * release.velocity.x;
                if weighted > threshold && delta.x > 0.0 {
                    Some(Vote::Positive)
                } else if weighted > threshold && delta.x < 0.0 {
                    Some(Vote::Negative)
                } else {
                    classify_pass(delta.y, vertical_threshold)
                }
            }
            Self::Fractional {
                travel,
                commit_ratio,
            } => {
                if delta.x >= travel * commit_ratio {
                    Some(Vote::Positive)
                } else {
                    None
                }
            }
        }
    }
}

fn classify_pass(dy: f32, vertical_threshold: Option<f32>) -> Option<Vote> {
    let threshold = vertical_threshold?;
    if dy < -threshold {
        Some(Vote::Pass)
    } else {
        None
    }
}
