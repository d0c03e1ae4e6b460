use crate::animator::{
    AnimationTicket, AnimatorAction, AnimatorOutput, AnimatorPhase, AnimatorSettings,
    CommitAnimator, ReleaseGate,
};
use crate::config::EngineConfig;
use crate::gesture::{PointerSample, Vector2};

use super::{forward_feedback, SlideListener};

/// Slide-to-confirm control: commits once past the configured fraction of
/// its travel and then stays confirmed.
pub struct SlideToConfirm<L> {
    animator: CommitAnimator,
    listener: L,
}

impl<L: SlideListener> SlideToConfirm<L> {
    pub fn new(config: &EngineConfig, listener: L) -> Self {
        Self {
            animator: CommitAnimator::new(AnimatorSettings::slider(&config.sanitized())),
            listener,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.animator.phase() == AnimatorPhase::Confirmed
    }

    pub fn position(&self) -> f32 {
        self.animator.offset().x
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.animator.phase()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn pointer_down(&mut self, sample: PointerSample) {
        let out = self.animator.begin(sample);
        self.apply(out);
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        let out = self.animator.update(sample);
        self.apply(out);
    }

    pub fn pointer_up(&mut self, sample: PointerSample) {
        let out = self.animator.release(sample, ReleaseGate::default());
        self.apply(out);
    }

    pub fn pointer_cancel(&mut self, sample: PointerSample) {
        let out = self.animator.cancel(sample.t_ms);
        self.apply(out);
    }

    pub fn tick(&mut self, now_ms: u64) {
        let out = self.animator.tick(now_ms);
        self.apply(out);
    }

    pub fn animation_finished(&mut self, ticket: AnimationTicket) {
        let out = self.animator.animation_finished(ticket);
        self.apply(out);
    }

    fn apply(&mut self, out: AnimatorOutput) {
        for action in out {
            match action {
                AnimatorAction::Offset(offset) => self.listener.on_offset(0, offset),
                AnimatorAction::Feedback(feedback) => {
                    forward_feedback(&mut self.listener, feedback)
                }
                AnimatorAction::Animate(request) => self.listener.on_animate(0, &request),
                AnimatorAction::Resolved { .. } => {
                    log::debug!("slider confirmed");
                    self.listener.on_confirmed();
                }
                AnimatorAction::Returned => {
                    self.listener.on_offset(0, Vector2::ZERO);
                    self.listener.on_returned(0);
                }
                AnimatorAction::Tapped => self.listener.on_offset(0, Vector2::ZERO),
                AnimatorAction::Began { .. }
                | AnimatorAction::Refused
                | AnimatorAction::Vetoed { .. } => {}
            }
        }
    }
}
