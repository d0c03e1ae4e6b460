pub mod easing;
pub mod scheduler;
pub mod types;

pub use easing::HapticTier;
pub use scheduler::FeedbackScheduler;
pub use types::{FeedbackAction, FeedbackOutput, FeedbackPhase, HapticPulse, ShakeParams};
