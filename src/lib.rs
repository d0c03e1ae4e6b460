//! Gesture-driven swipe and slide decision engine.
//!
//! Pointer samples go in with explicit timestamps; drag offsets, feedback
//! pulses, animation requests and committed decisions come out. Nothing here
//! reads a clock or spawns work: hosts call `tick` from their frame loop and
//! report animation completions back.

pub mod animator;
pub mod config;
pub mod controller;
pub mod feedback;
pub mod gesture;
pub mod ledger;
pub mod types;

pub use animator::{AnimationRequest, AnimationTicket, CommitAnimator, ReleaseGate};
pub use config::EngineConfig;
pub use controller::{CardDeck, DeckListener, FeedbackSink, SlideListener, SlideToConfirm};
pub use gesture::{ClassifierStrategy, DragSession, PointerSample, Vector2};
pub use ledger::{DecisionLedger, SubmitResult};
pub use types::{Decision, Vote};
