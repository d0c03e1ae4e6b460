use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::gesture::classifier::{
    ClassifierStrategy, DEFAULT_COMMIT_RATIO, DEFAULT_DISPLACEMENT_THRESHOLD,
    DEFAULT_VELOCITY_THRESHOLD, DEFAULT_VERTICAL_THRESHOLD,
};
use crate::gesture::types::{Axis, DragBounds};

pub const LEDGER_MAX_CAPACITY: usize = 16;
pub const STACK_MAX_DEPTH: u8 = 2;

const DEFAULT_CAPACITY: usize = 5;
const DEFAULT_SKIP_BUDGET: u32 = 1;
const DEFAULT_MAX_MAGNITUDE: f32 = 150.0;
const DEFAULT_VELOCITY_WINDOW_MS: u64 = 100;
const DEFAULT_SLIDE_TRAVEL: f32 = 200.0;

const DEFAULT_SHAKE_MIN_AMPLITUDE: f32 = 1.5;
const DEFAULT_SHAKE_MAX_AMPLITUDE: f32 = 3.0;
const DEFAULT_SHAKE_MAX_PERIOD_MS: u64 = 40;
const DEFAULT_SHAKE_MIN_PERIOD_MS: u64 = 15;
const DEFAULT_HAPTIC_MAX_GAP_MS: u64 = 230;
const DEFAULT_HAPTIC_MIN_GAP_MS: u64 = 100;
const DEFAULT_AMPLITUDE_HYSTERESIS: f32 = 0.25;
const DEFAULT_PERIOD_HYSTERESIS_MS: u64 = 2;
const DEFAULT_TIER_MEDIUM_AT: f32 = 0.3;
const DEFAULT_TIER_HIGH_AT: f32 = 0.7;

const DEFAULT_COMMIT_DURATION_MS: u32 = 200;
const DEFAULT_RETURN_DURATION_MS: u32 = 150;
const DEFAULT_EXIT_OFFSET: f32 = 500.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub deck: DeckConfig,
    pub gesture: GestureConfig,
    pub slide: SlideConfig,
    pub feedback: FeedbackConfig,
    pub animation: AnimationConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub capacity: usize,
    pub skip_budget: u32,
    /// 1 for a single card, 2 when the next card may start while the
    /// previous one is still leaving.
    pub stack_depth: u8,
    pub advance_on_overflow: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            skip_budget: DEFAULT_SKIP_BUDGET,
            stack_depth: 1,
            advance_on_overflow: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    #[default]
    Displacement,
    VelocityWeighted,
    Fractional,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub axis: Axis,
    pub classification_mode: ClassificationMode,
    pub displacement_threshold: f32,
    pub vertical_threshold: Option<f32>,
    pub velocity_threshold: f32,
    pub velocity_window_ms: u64,
    pub max_magnitude: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            classification_mode: ClassificationMode::Displacement,
            displacement_threshold: DEFAULT_DISPLACEMENT_THRESHOLD,
            vertical_threshold: Some(DEFAULT_VERTICAL_THRESHOLD),
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
            max_magnitude: DEFAULT_MAX_MAGNITUDE,
        }
    }
}

impl GestureConfig {
    pub fn bounds(&self) -> DragBounds {
        DragBounds::symmetric(self.axis, self.max_magnitude)
    }

    /// The vertical pass threshold only applies when the y axis is live.
    fn pass_threshold(&self) -> Option<f32> {
        match self.axis {
            Axis::Horizontal => None,
            Axis::Both => self.vertical_threshold.filter(|t| is_positive(*t)),
        }
    }

    pub fn strategy(&self) -> ClassifierStrategy {
        let vertical_threshold = self.pass_threshold();
        match self.classification_mode {
            ClassificationMode::Displacement if is_positive(self.displacement_threshold) => {
                ClassifierStrategy::Displacement {
                    threshold: self.displacement_threshold,
                    vertical_threshold,
                }
            }
            ClassificationMode::VelocityWeighted if is_positive(self.velocity_threshold) => {
                ClassifierStrategy::VelocityWeighted {
                    threshold: self.velocity_threshold,
                    vertical_threshold,
                }
            }
            mode => {
                log::warn!(
                    "gesture classification {:?} unusable for cards, using displacement defaults",
                    mode
                );
                ClassifierStrategy::Displacement {
                    threshold: DEFAULT_DISPLACEMENT_THRESHOLD,
                    vertical_threshold: match self.axis {
                        Axis::Horizontal => None,
                        Axis::Both => Some(DEFAULT_VERTICAL_THRESHOLD),
                    },
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    pub travel: f32,
    pub commit_ratio: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            travel: DEFAULT_SLIDE_TRAVEL,
            commit_ratio: DEFAULT_COMMIT_RATIO,
        }
    }
}

impl SlideConfig {
    pub fn bounds(&self) -> DragBounds {
        DragBounds::slide(self.travel)
    }

    pub fn strategy(&self) -> ClassifierStrategy {
        ClassifierStrategy::Fractional {
            travel: self.travel,
            commit_ratio: self.commit_ratio,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub enabled: bool,
    pub shake_min_amplitude: f32,
    pub shake_max_amplitude: f32,
    pub shake_max_period_ms: u64,
    pub shake_min_period_ms: u64,
    pub haptic_max_gap_ms: u64,
    pub haptic_min_gap_ms: u64,
    pub amplitude_hysteresis: f32,
    pub period_hysteresis_ms: u64,
    pub tier_medium_at: f32,
    pub tier_high_at: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shake_min_amplitude: DEFAULT_SHAKE_MIN_AMPLITUDE,
            shake_max_amplitude: DEFAULT_SHAKE_MAX_AMPLITUDE,
            shake_max_period_ms: DEFAULT_SHAKE_MAX_PERIOD_MS,
            shake_min_period_ms: DEFAULT_SHAKE_MIN_PERIOD_MS,
            haptic_max_gap_ms: DEFAULT_HAPTIC_MAX_GAP_MS,
            haptic_min_gap_ms: DEFAULT_HAPTIC_MIN_GAP_MS,
            amplitude_hysteresis: DEFAULT_AMPLITUDE_HYSTERESIS,
            period_hysteresis_ms: DEFAULT_PERIOD_HYSTERESIS_MS,
            tier_medium_at: DEFAULT_TIER_MEDIUM_AT,
            tier_high_at: DEFAULT_TIER_HIGH_AT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub commit_duration_ms: u32,
    pub return_duration_ms: u32,
    pub exit_offset: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            commit_duration_ms: DEFAULT_COMMIT_DURATION_MS,
            return_duration_ms: DEFAULT_RETURN_DURATION_MS,
            exit_offset: DEFAULT_EXIT_OFFSET,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("invalid engine config")?;
        Ok(config.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let deck = &mut self.deck;
        let capacity = deck.capacity.clamp(1, LEDGER_MAX_CAPACITY);
        if capacity != deck.capacity {
            log::warn!(
                "deck capacity {} out of range, using {}",
                deck.capacity,
                capacity
            );
            deck.capacity = capacity;
        }
        deck.stack_depth = deck.stack_depth.clamp(1, STACK_MAX_DEPTH);
        if deck.stack_depth > 1 && !deck.advance_on_overflow {
            log::warn!("stacked decks always advance past rejected cards");
            deck.advance_on_overflow = true;
        }

        let gesture = &mut self.gesture;
        positive_or(&mut gesture.max_magnitude, defaults.gesture.max_magnitude);
        if gesture.velocity_window_ms == 0 {
            gesture.velocity_window_ms = defaults.gesture.velocity_window_ms;
        }

        let slide = &mut self.slide;
        positive_or(&mut slide.travel, defaults.slide.travel);
        if slide.commit_ratio.is_nan() || slide.commit_ratio <= 0.0 || slide.commit_ratio > 1.0 {
            slide.commit_ratio = defaults.slide.commit_ratio;
        }

        let feedback = &mut self.feedback;
        positive_or(
            &mut feedback.shake_min_amplitude,
            defaults.feedback.shake_min_amplitude,
        );
        positive_or(
            &mut feedback.shake_max_amplitude,
            defaults.feedback.shake_max_amplitude,
        );
        if feedback.shake_min_amplitude > feedback.shake_max_amplitude {
            core::mem::swap(
                &mut feedback.shake_min_amplitude,
                &mut feedback.shake_max_amplitude,
            );
        }
        if feedback.shake_min_period_ms == 0 {
            feedback.shake_min_period_ms = defaults.feedback.shake_min_period_ms;
        }
        if feedback.shake_max_period_ms == 0 {
            feedback.shake_max_period_ms = defaults.feedback.shake_max_period_ms;
        }
        if feedback.shake_min_period_ms > feedback.shake_max_period_ms {
            core::mem::swap(
                &mut feedback.shake_min_period_ms,
                &mut feedback.shake_max_period_ms,
            );
        }
        if feedback.haptic_min_gap_ms == 0 {
            feedback.haptic_min_gap_ms = defaults.feedback.haptic_min_gap_ms;
        }
        if feedback.haptic_max_gap_ms == 0 {
            feedback.haptic_max_gap_ms = defaults.feedback.haptic_max_gap_ms;
        }
        if feedback.haptic_min_gap_ms > feedback.haptic_max_gap_ms {
            core::mem::swap(
                &mut feedback.haptic_min_gap_ms,
                &mut feedback.haptic_max_gap_ms,
            );
        }
        if feedback.amplitude_hysteresis.is_nan() || feedback.amplitude_hysteresis < 0.0 {
            feedback.amplitude_hysteresis = defaults.feedback.amplitude_hysteresis;
        }
        if !(0.0 < feedback.tier_medium_at
            && feedback.tier_medium_at < feedback.tier_high_at
            && feedback.tier_high_at <= 1.0)
        {
            feedback.tier_medium_at = defaults.feedback.tier_medium_at;
            feedback.tier_high_at = defaults.feedback.tier_high_at;
        }

        positive_or(
            &mut self.animation.exit_offset,
            defaults.animation.exit_offset,
        );
        self
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn positive_or(value: &mut f32, fallback: f32) {
    if !is_positive(*value) {
        *value = fallback;
    }
}
