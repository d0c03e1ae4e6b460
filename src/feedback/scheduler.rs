use crate::config::FeedbackConfig;

use super::easing::{ease_out, lerp, lerp_ms, HapticTier};
use super::types::{FeedbackAction, FeedbackOutput, FeedbackPhase, HapticPulse, ShakeParams};

/// A deadline-based repeating timer polled from `tick`.
#[derive(Clone, Copy, Debug, Default)]
struct PeriodicTimer {
    armed: bool,
    period_ms: u64,
    last_fire_ms: u64,
}

impl PeriodicTimer {
    fn arm(&mut self, now_ms: u64, period_ms: u64) {
        self.armed = true;
        self.period_ms = period_ms;
        self.last_fire_ms = now_ms;
    }

    fn retune(&mut self, period_ms: u64) {
        self.period_ms = period_ms;
    }

    fn restart(&mut self, now_ms: u64) {
        self.last_fire_ms = now_ms;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn poll(&mut self, now_ms: u64) -> bool {
        if !self.armed || now_ms.saturating_sub(self.last_fire_ms) < self.period_ms {
            return false;
        }
        self.last_fire_ms = now_ms;
        true
    }
}

/// Drives shake and haptic feedback from drag progress.
///
/// Both timers only run while the phase is `Dragging`; leaving that phase
/// disarms them in the same call, so no pulse can follow a release.
#[derive(Clone, Debug)]
pub struct FeedbackScheduler {
    config: FeedbackConfig,
    phase: FeedbackPhase,
    progress: f32,
    tier: HapticTier,
    shake: ShakeParams,
    shake_sign: f32,
    shake_timer: PeriodicTimer,
    haptic_timer: PeriodicTimer,
}

impl FeedbackScheduler {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            phase: FeedbackPhase::Idle,
            progress: 0.0,
            tier: HapticTier::Low,
            shake: ShakeParams::default(),
            shake_sign: 1.0,
            shake_timer: PeriodicTimer::default(),
            haptic_timer: PeriodicTimer::default(),
        }
    }

    pub fn phase(&self) -> FeedbackPhase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn tier(&self) -> HapticTier {
        self.tier
    }

    pub fn shake(&self) -> ShakeParams {
        self.shake
    }

    pub fn haptic_gap_ms(&self) -> u64 {
        self.haptic_timer.period_ms
    }

    pub fn start(&mut self, now_ms: u64) -> FeedbackOutput {
        let mut out = FeedbackOutput::default();
        if !self.config.enabled {
            return out;
        }
        self.phase = FeedbackPhase::Dragging;
        self.progress = 0.0;
        self.tier = HapticTier::Low;
        self.shake = self.shake_for(0.0);
        self.shake_sign = 1.0;
        self.shake_timer.arm(now_ms, self.shake.period_ms);
        self.haptic_timer.arm(now_ms, self.gap_for(0.0));
        out.push(FeedbackAction::ShakeRestart(self.shake));
        out
    }

    pub fn on_drag_update(&mut self, now_ms: u64, progress: f32) -> FeedbackOutput {
        let mut out = FeedbackOutput::default();
        if self.phase != FeedbackPhase::Dragging {
            return out;
        }
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let eased = ease_out(self.progress);

        let tier = HapticTier::from_progress(
            self.progress,
            self.config.tier_medium_at,
            self.config.tier_high_at,
        );
        if tier != self.tier {
            self.tier = tier;
            self.haptic_timer.restart(now_ms);
            out.push(self.pulse(now_ms));
        }
        self.haptic_timer.retune(self.gap_for(eased));

        let shake = self.shake_for(eased);
        if self.shake_changed(shake) {
            self.shake = shake;
            self.shake_timer.arm(now_ms, shake.period_ms);
            out.push(FeedbackAction::ShakeRestart(shake));
        }

        self.poll(now_ms, &mut out);
        out
    }

    pub fn tick(&mut self, now_ms: u64) -> FeedbackOutput {
        let mut out = FeedbackOutput::default();
        if self.phase == FeedbackPhase::Dragging {
            self.poll(now_ms, &mut out);
        }
        out
    }

    /// Gesture released; timers are cancelled before this returns.
    pub fn release(&mut self) -> FeedbackOutput {
        let mut out = FeedbackOutput::default();
        if self.phase != FeedbackPhase::Dragging {
            return out;
        }
        self.disarm();
        self.phase = FeedbackPhase::Releasing;
        out.push(FeedbackAction::ShakeStop);
        out
    }

    pub fn stop(&mut self) -> FeedbackOutput {
        let mut out = FeedbackOutput::default();
        if self.phase == FeedbackPhase::Dragging {
            out.push(FeedbackAction::ShakeStop);
        }
        self.disarm();
        self.phase = FeedbackPhase::Idle;
        self.progress = 0.0;
        out
    }

    fn disarm(&mut self) {
        self.shake_timer.disarm();
        self.haptic_timer.disarm();
    }

    fn poll(&mut self, now_ms: u64, out: &mut FeedbackOutput) {
        if self.haptic_timer.poll(now_ms) {
            out.push(self.pulse(now_ms));
        }
        if self.shake_timer.poll(now_ms) {
            self.shake_sign = -self.shake_sign;
            out.push(FeedbackAction::ShakeStep {
                offset: self.shake_sign * self.shake.amplitude,
            });
        }
    }

    fn pulse(&self, now_ms: u64) -> FeedbackAction {
        log::trace!("haptic pulse tier={:?} t={}", self.tier, now_ms);
        FeedbackAction::Haptic(HapticPulse {
            tier: self.tier,
            t_ms: now_ms,
        })
    }

    fn shake_for(&self, eased: f32) -> ShakeParams {
        ShakeParams {
            amplitude: lerp(
                self.config.shake_min_amplitude,
                self.config.shake_max_amplitude,
                eased,
            ),
            period_ms: lerp_ms(
                self.config.shake_max_period_ms,
                self.config.shake_min_period_ms,
                eased,
            ),
        }
    }

    // Squared so the gap only tightens noticeably near full travel.
    fn gap_for(&self, eased: f32) -> u64 {
        lerp_ms(
            self.config.haptic_max_gap_ms,
            self.config.haptic_min_gap_ms,
            eased * eased,
        )
    }

    fn shake_changed(&self, next: ShakeParams) -> bool {
        (next.amplitude - self.shake.amplitude).abs() > self.config.amplitude_hysteresis
            || next.period_ms.abs_diff(self.shake.period_ms) > self.config.period_hysteresis_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dragging(now_ms: u64) -> FeedbackScheduler {
        let mut scheduler = FeedbackScheduler::new(FeedbackConfig::default());
        let out = scheduler.start(now_ms);
        assert!(out.contains_shake_restart());
        scheduler
    }

    #[test]
    fn tier_changes_pulse_immediately() {
        let mut scheduler = dragging(0);
        let out = scheduler.on_drag_update(5, 0.1);
        assert_eq!(out.pulses().count(), 0);

        let out = scheduler.on_drag_update(10, 0.35);
        let pulses: std::vec::Vec<_> = out.pulses().collect();
        assert_eq!(
            pulses,
            std::vec![HapticPulse {
                tier: HapticTier::Medium,
                t_ms: 10
            }]
        );

        let out = scheduler.on_drag_update(12, 0.8);
        assert_eq!(out.pulses().map(|p| p.tier).next(), Some(HapticTier::High));
    }

    #[test]
    fn tier_is_monotonic_for_growing_progress() {
        let mut scheduler = dragging(0);
        let mut last = scheduler.tier();
        for step in 0..=150u64 {
            let _ = scheduler.on_drag_update(step * 4, step as f32 / 150.0);
            assert!(scheduler.tier() >= last);
            last = scheduler.tier();
        }
        assert_eq!(last, HapticTier::High);
    }

    #[test]
    fn pulse_gap_shrinks_with_progress() {
        let mut scheduler = dragging(0);
        assert_eq!(scheduler.haptic_gap_ms(), 230);
        assert_eq!(scheduler.tick(229).pulses().count(), 0);
        assert_eq!(scheduler.tick(230).pulses().count(), 1);

        let _ = scheduler.on_drag_update(240, 1.0);
        assert_eq!(scheduler.haptic_gap_ms(), 100);
        assert_eq!(scheduler.tick(339).pulses().count(), 0);
        assert_eq!(scheduler.tick(340).pulses().count(), 1);
    }

    #[test]
    fn small_changes_do_not_restart_shake() {
        let mut scheduler = dragging(0);
        let out = scheduler.on_drag_update(1, 0.05);
        assert!(!out.contains_shake_restart());

        let out = scheduler.on_drag_update(2, 0.5);
        assert!(out.contains_shake_restart());
        let shake = scheduler.shake();
        assert!((shake.amplitude - 2.625).abs() < 1e-4);
        assert_eq!(shake.period_ms, 21);
    }

    #[test]
    fn shake_steps_alternate_direction() {
        let mut scheduler = dragging(0);
        let offsets: std::vec::Vec<f32> = [40u64, 80, 120]
            .into_iter()
            .flat_map(|t| scheduler.tick(t))
            .filter_map(|action| match action {
                FeedbackAction::ShakeStep { offset } => Some(offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, std::vec![-1.5, 1.5, -1.5]);
    }

    #[test]
    fn release_stops_everything_synchronously() {
        let mut scheduler = dragging(0);
        let _ = scheduler.on_drag_update(10, 0.9);
        let out = scheduler.release();
        assert_eq!(out.iter().next(), Some(&FeedbackAction::ShakeStop));
        assert_eq!(scheduler.phase(), FeedbackPhase::Releasing);

        for t in [11u64, 500, 5_000] {
            assert!(scheduler.tick(t).is_empty());
        }
        assert!(scheduler.on_drag_update(600, 1.0).is_empty());

        assert!(scheduler.stop().is_empty());
        assert_eq!(scheduler.phase(), FeedbackPhase::Idle);
    }

    #[test]
    fn disabled_feedback_stays_idle() {
        let mut scheduler = FeedbackScheduler::new(FeedbackConfig {
            enabled: false,
            ..FeedbackConfig::default()
        });
        assert!(scheduler.start(0).is_empty());
        assert!(scheduler.on_drag_update(10, 1.0).is_empty());
        assert!(scheduler.tick(1_000).is_empty());
        assert_eq!(scheduler.phase(), FeedbackPhase::Idle);
    }
}
