//! Per-element controllers that own the gesture pieces and turn animator
//! actions into listener callbacks.

pub mod card;
pub mod slider;


pub use card::CardDeck;
pub use slider::SlideToConfirm;

use crate::animator::AnimationRequest;
use crate::feedback::{FeedbackAction, HapticPulse};
use crate::gesture::Vector2;
use crate::types::Decision;

/// Presentation hooks. `card` is the content index the action applies to.
pub trait FeedbackSink {
    fn on_offset(&mut self, _card: usize, _offset: Vector2) {}

    fn on_animate(&mut self, _card: usize, _request: &AnimationRequest) {}

    /// The card is back at rest without a decision, animated or not.
    fn on_returned(&mut self, _card: usize) {}

    fn on_haptic(&mut self, _pulse: HapticPulse) {}

    fn on_shake(&mut self, _action: FeedbackAction) {}
}

pub trait DeckListener<P>: FeedbackSink {
    /// The commit callback; invoked once per accepted decision.
    fn on_commit(&mut self, _decision: &Decision<P>) {}

    fn on_overflow(&mut self) {}

    fn on_ledger_full(&mut self) {}

    fn on_pass_rejected(&mut self) {}

    fn on_tap(&mut self, _card: usize) {}
}

pub trait SlideListener: FeedbackSink {
    fn on_confirmed(&mut self) {}
}

fn forward_feedback<S: FeedbackSink + ?Sized>(sink: &mut S, action: FeedbackAction) {
    match action {
        FeedbackAction::Haptic(pulse) => sink.on_haptic(pulse),
        other => sink.on_shake(other),
    }
}
