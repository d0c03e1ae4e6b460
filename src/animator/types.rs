use heapless::Vec;

use crate::config::{AnimationConfig, EngineConfig, FeedbackConfig};
use crate::feedback::{FeedbackAction, FeedbackOutput};
use crate::gesture::{ClassifierStrategy, DragBounds, Vector2};
use crate::types::Vote;

const ANIMATOR_OUTPUT_MAX: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimationTicket {
    pub owner: u8,
    pub seq: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// Exit past the drag bound.
    Commit,
    /// Back to the origin.
    Return,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRequest {
    pub ticket: AnimationTicket,
    pub kind: AnimationKind,
    /// Set for commit animations; `None` when springing back.
    pub vote: Option<Vote>,
    pub from: Vector2,
    pub to: Vector2,
    pub duration_ms: u32,
    pub started_ms: u64,
}

impl AnimationRequest {
    pub fn due_at_ms(&self) -> u64 {
        self.started_ms.saturating_add(u64::from(self.duration_ms))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimatorAction {
    Began { t_ms: u64 },
    Offset(Vector2),
    Feedback(FeedbackAction),
    Tapped,
    Animate(AnimationRequest),
    /// The classifier produced `vote` but the release gate refused it.
    Vetoed { vote: Vote },
    Resolved { vote: Vote },
    Returned,
    Refused,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimatorOutput {
    actions: Vec<AnimatorAction, ANIMATOR_OUTPUT_MAX>,
}

impl AnimatorOutput {
    pub fn push(&mut self, action: AnimatorAction) {
        let _ = self.actions.push(action);
    }

    pub fn push_feedback(&mut self, feedback: FeedbackOutput) {
        for action in feedback {
            self.push(AnimatorAction::Feedback(action));
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimatorAction> {
        self.actions.iter()
    }

    pub fn resolved(&self) -> Option<Vote> {
        self.actions.iter().find_map(|action| match action {
            AnimatorAction::Resolved { vote } => Some(*vote),
            _ => None,
        })
    }

    pub fn animation(&self) -> Option<AnimationRequest> {
        self.actions.iter().find_map(|action| match action {
            AnimatorAction::Animate(request) => Some(*request),
            _ => None,
        })
    }

    pub fn contains(&self, expected: &AnimatorAction) -> bool {
        self.actions.iter().any(|action| action == expected)
    }
}

impl IntoIterator for AnimatorOutput {
    type Item = AnimatorAction;
    type IntoIter = <Vec<AnimatorAction, ANIMATOR_OUTPUT_MAX> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum AnimatorPhase {
    #[default]
    Idle = 0,
    Dragging = 1,
    Resolving = 2,
    Committing = 3,
    Cancelling = 4,
    Confirmed = 5,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimatorTrace {
    pub t_ms: u64,
    pub phase: AnimatorPhase,
    pub last_vote: Option<Vote>,
    pub commits: u16,
    pub returns: u16,
    pub taps: u16,
    pub refused_begins: u16,
    pub stale_completions: u16,
}

/// Lets the owner veto outcomes it cannot accept at release time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseGate {
    pub allow_pass: bool,
}

impl Default for ReleaseGate {
    fn default() -> Self {
        Self { allow_pass: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorSettings {
    pub owner: u8,
    pub bounds: DragBounds,
    pub strategy: ClassifierStrategy,
    pub velocity_window_ms: u64,
    pub feedback: FeedbackConfig,
    pub animation: AnimationConfig,
    /// A commit ends in `Confirmed` and the element stops accepting input.
    pub terminal_on_commit: bool,
}

impl AnimatorSettings {
    pub fn card(owner: u8, config: &EngineConfig) -> Self {
        Self {
            owner,
            bounds: config.gesture.bounds(),
            strategy: config.gesture.strategy(),
            velocity_window_ms: config.gesture.velocity_window_ms,
            feedback: config.feedback,
            animation: config.animation,
            terminal_on_commit: false,
        }
    }

    pub fn slider(config: &EngineConfig) -> Self {
        Self {
            owner: 0,
            bounds: config.slide.bounds(),
            strategy: config.slide.strategy(),
            velocity_window_ms: config.gesture.velocity_window_ms,
            feedback: config.feedback,
            animation: config.animation,
            terminal_on_commit: true,
        }
    }
}
