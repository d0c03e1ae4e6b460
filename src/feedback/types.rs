use heapless::Vec;

use super::easing::HapticTier;

const FEEDBACK_OUTPUT_MAX: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackPhase {
    #[default]
    Idle,
    Dragging,
    Releasing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HapticPulse {
    pub tier: HapticTier,
    pub t_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShakeParams {
    pub amplitude: f32,
    pub period_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeedbackAction {
    Haptic(HapticPulse),
    /// The oscillation parameters changed enough to restart the shake.
    ShakeRestart(ShakeParams),
    ShakeStep { offset: f32 },
    ShakeStop,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedbackOutput {
    actions: Vec<FeedbackAction, FEEDBACK_OUTPUT_MAX>,
}

impl FeedbackOutput {
    pub fn push(&mut self, action: FeedbackAction) {
        let _ = self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedbackAction> {
        self.actions.iter()
    }

    pub fn pulses(&self) -> impl Iterator<Item = HapticPulse> + '_ {
        self.actions.iter().filter_map(|action| match action {
            FeedbackAction::Haptic(pulse) => Some(*pulse),
            _ => None,
        })
    }

    pub fn contains_shake_restart(&self) -> bool {
        self.actions
            .iter()
            .any(|action| matches!(action, FeedbackAction::ShakeRestart(_)))
    }
}

impl IntoIterator for FeedbackOutput {
    type Item = FeedbackAction;
    type IntoIter = <Vec<FeedbackAction, FEEDBACK_OUTPUT_MAX> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}
