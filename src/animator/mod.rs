pub mod machine;
pub mod types;

pub use machine::CommitAnimator;
pub use types::{
    AnimationKind, AnimationRequest, AnimationTicket, AnimatorAction, AnimatorOutput,
    AnimatorPhase, AnimatorSettings, AnimatorTrace, ReleaseGate,
};
