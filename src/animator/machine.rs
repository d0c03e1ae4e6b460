use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::feedback::{FeedbackOutput, FeedbackScheduler};
use crate::gesture::{DragRelease, DragSlot, PointerSample, Vector2};
use crate::types::Vote;

use super::types::{
    AnimationKind, AnimationRequest, AnimationTicket, AnimatorAction, AnimatorOutput,
    AnimatorPhase, AnimatorSettings, AnimatorTrace, ReleaseGate,
};

#[derive(Clone, Copy, Debug)]
enum AnimatorEvent {
    Begin(PointerSample),
    Move(PointerSample),
    Release {
        sample: PointerSample,
        gate: ReleaseGate,
    },
    Cancel {
        now_ms: u64,
    },
    Tick {
        now_ms: u64,
    },
    AnimationFinished(AnimationTicket),
}

#[derive(Default)]
struct DispatchContext {
    output: AnimatorOutput,
}

impl DispatchContext {
    fn emit(&mut self, action: AnimatorAction) {
        self.output.push(action);
    }

    fn emit_feedback(&mut self, feedback: FeedbackOutput) {
        self.output.push_feedback(feedback);
    }
}

/// Single-element commit/cancel animator. Every call takes the caller's clock
/// and returns the actions to apply; nothing runs in the background.
pub struct CommitAnimator {
    machine: statig::blocking::StateMachine<CommitHsm>,
}

impl CommitAnimator {
    pub fn new(settings: AnimatorSettings) -> Self {
        Self {
            machine: CommitHsm::new(settings).state_machine(),
        }
    }

    pub fn begin(&mut self, sample: PointerSample) -> AnimatorOutput {
        self.dispatch(AnimatorEvent::Begin(sample))
    }

    pub fn update(&mut self, sample: PointerSample) -> AnimatorOutput {
        self.dispatch(AnimatorEvent::Move(sample))
    }

    pub fn release(&mut self, sample: PointerSample, gate: ReleaseGate) -> AnimatorOutput {
        self.dispatch(AnimatorEvent::Release { sample, gate })
    }

    pub fn cancel(&mut self, now_ms: u64) -> AnimatorOutput {
        self.dispatch(AnimatorEvent::Cancel { now_ms })
    }

    /// Polls feedback timers and completes animations whose deadline passed.
    pub fn tick(&mut self, now_ms: u64) -> AnimatorOutput {
        self.dispatch(AnimatorEvent::Tick { now_ms })
    }

    /// Host-driven completion; a ticket that does not match the pending
    /// animation is counted and ignored.
    pub fn animation_finished(&mut self, ticket: AnimationTicket) -> AnimatorOutput {
        self.dispatch(AnimatorEvent::AnimationFinished(ticket))
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.machine.inner().trace.phase
    }

    pub fn trace(&self) -> AnimatorTrace {
        self.machine.inner().trace
    }

    pub fn offset(&self) -> Vector2 {
        self.machine.inner().offset
    }

    pub fn is_interactive(&self) -> bool {
        matches!(
            self.phase(),
            AnimatorPhase::Idle | AnimatorPhase::Dragging
        )
    }

    pub fn pending_animation(&self) -> Option<AnimationRequest> {
        self.machine.inner().pending
    }

    pub fn settings(&self) -> &AnimatorSettings {
        &self.machine.inner().settings
    }

    fn dispatch(&mut self, event: AnimatorEvent) -> AnimatorOutput {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.output
    }
}

struct CommitHsm {
    settings: AnimatorSettings,
    drag: DragSlot,
    feedback: FeedbackScheduler,
    pending: Option<AnimationRequest>,
    next_seq: u32,
    offset: Vector2,
    trace: AnimatorTrace,
}

impl CommitHsm {
    fn new(settings: AnimatorSettings) -> Self {
        Self {
            settings,
            drag: DragSlot::new(),
            feedback: FeedbackScheduler::new(settings.feedback),
            pending: None,
            next_seq: 0,
            offset: Vector2::ZERO,
            trace: AnimatorTrace::default(),
        }
    }

    fn set_phase(&mut self, phase: AnimatorPhase, t_ms: u64) {
        if self.trace.phase != phase {
            log::debug!(
                "animator[{}] {:?} -> {:?} at {}",
                self.settings.owner,
                self.trace.phase,
                phase,
                t_ms
            );
        }
        self.trace.phase = phase;
        self.trace.t_ms = t_ms;
    }

    fn begin_drag(&mut self, context: &mut DispatchContext, sample: PointerSample) {
        let _ = self.drag.begin(
            sample,
            self.settings.bounds,
            self.settings.velocity_window_ms,
        );
        self.offset = Vector2::ZERO;
        self.set_phase(AnimatorPhase::Dragging, sample.t_ms);
        context.emit(AnimatorAction::Began { t_ms: sample.t_ms });
        context.emit_feedback(self.feedback.start(sample.t_ms));
    }

    fn track(&mut self, context: &mut DispatchContext, sample: PointerSample) {
        let Some(delta) = self.drag.update(sample) else {
            return;
        };
        self.offset = delta;
        context.emit(AnimatorAction::Offset(delta));
        let progress = self.settings.bounds.progress(delta);
        context.emit_feedback(self.feedback.on_drag_update(sample.t_ms, progress));
    }

    fn resolve(
        &self,
        context: &mut DispatchContext,
        release: &DragRelease,
        gate: ReleaseGate,
    ) -> Option<Vote> {
        match self.settings.strategy.classify(release) {
            Some(Vote::Pass) if !gate.allow_pass => {
                log::debug!(
                    "animator[{}] pass vetoed, snapping back",
                    self.settings.owner
                );
                context.emit(AnimatorAction::Vetoed { vote: Vote::Pass });
                None
            }
            vote => vote,
        }
    }

    fn finish_tap(&mut self, context: &mut DispatchContext, t_ms: u64) {
        context.emit_feedback(self.feedback.stop());
        self.offset = Vector2::ZERO;
        self.trace.taps = self.trace.taps.saturating_add(1);
        self.set_phase(AnimatorPhase::Idle, t_ms);
        context.emit(AnimatorAction::Tapped);
    }

    fn exit_target(&self, vote: Vote) -> Vector2 {
        if self.settings.strategy.is_fractional() {
            return Vector2::new(self.settings.bounds.max.x, 0.0);
        }
        let exit = self.settings.animation.exit_offset;
        match vote {
            Vote::Positive => Vector2::new(exit, self.offset.y),
            Vote::Negative => Vector2::new(-exit, self.offset.y),
            Vote::Pass => Vector2::new(self.offset.x, -exit),
        }
    }

    fn start_animation(&mut self, context: &mut DispatchContext, now_ms: u64, vote: Option<Vote>) {
        let (kind, to, duration_ms, phase) = match vote {
            Some(vote) => (
                AnimationKind::Commit,
                self.exit_target(vote),
                self.settings.animation.commit_duration_ms,
                AnimatorPhase::Committing,
            ),
            None => (
                AnimationKind::Return,
                Vector2::ZERO,
                self.settings.animation.return_duration_ms,
                AnimatorPhase::Cancelling,
            ),
        };
        let ticket = AnimationTicket {
            owner: self.settings.owner,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        let request = AnimationRequest {
            ticket,
            kind,
            vote,
            from: self.offset,
            to,
            duration_ms,
            started_ms: now_ms,
        };
        self.pending = Some(request);
        self.set_phase(phase, now_ms);
        context.emit(AnimatorAction::Animate(request));
    }

    fn animation_due(&self, now_ms: u64) -> bool {
        self.pending
            .is_some_and(|pending| now_ms >= pending.due_at_ms())
    }

    fn note_stale(&mut self, ticket: AnimationTicket) {
        log::debug!(
            "animator[{}] ignoring stale completion {:?}",
            self.settings.owner,
            ticket
        );
        self.trace.stale_completions = self.trace.stale_completions.saturating_add(1);
    }

    fn refuse(&mut self, context: &mut DispatchContext) {
        self.trace.refused_begins = self.trace.refused_begins.saturating_add(1);
        context.emit(AnimatorAction::Refused);
    }

    fn finish_ticket(
        &mut self,
        context: &mut DispatchContext,
        ticket: AnimationTicket,
    ) -> Outcome<State> {
        let matches = self
            .pending
            .is_some_and(|pending| pending.ticket == ticket);
        if !matches {
            self.note_stale(ticket);
            return Handled;
        }
        let now_ms = self
            .pending
            .map_or(self.trace.t_ms, |pending| pending.due_at_ms());
        self.complete(context, now_ms)
    }

    /// Consumes the pending animation; later completions find nothing to do.
    fn complete(&mut self, context: &mut DispatchContext, now_ms: u64) -> Outcome<State> {
        let Some(pending) = self.pending.take() else {
            return Handled;
        };
        context.emit_feedback(self.feedback.stop());
        match pending.vote {
            Some(vote) => {
                self.trace.commits = self.trace.commits.saturating_add(1);
                self.trace.last_vote = Some(vote);
                context.emit(AnimatorAction::Resolved { vote });
                if self.settings.terminal_on_commit {
                    self.offset = pending.to;
                    self.set_phase(AnimatorPhase::Confirmed, now_ms);
                    Transition(State::confirmed())
                } else {
                    self.offset = Vector2::ZERO;
                    self.set_phase(AnimatorPhase::Idle, now_ms);
                    Transition(State::idle())
                }
            }
            None => {
                self.trace.returns = self.trace.returns.saturating_add(1);
                self.offset = Vector2::ZERO;
                context.emit(AnimatorAction::Returned);
                self.set_phase(AnimatorPhase::Idle, now_ms);
                Transition(State::idle())
            }
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl CommitHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &AnimatorEvent) -> Outcome<State> {
        match event {
            AnimatorEvent::Begin(sample) => {
                self.begin_drag(context, *sample);
                Transition(State::dragging())
            }
            AnimatorEvent::AnimationFinished(ticket) => {
                self.note_stale(*ticket);
                Handled
            }
            _ => Handled,
        }
    }

    #[state]
    fn dragging(&mut self, context: &mut DispatchContext, event: &AnimatorEvent) -> Outcome<State> {
        match event {
            AnimatorEvent::Begin(sample) => {
                log::debug!(
                    "animator[{}] ignoring pointer {} during drag",
                    self.settings.owner,
                    sample.pointer
                );
                Handled
            }
            AnimatorEvent::Move(sample) => {
                self.track(context, *sample);
                Handled
            }
            AnimatorEvent::Tick { now_ms } => {
                context.emit_feedback(self.feedback.tick(*now_ms));
                Handled
            }
            AnimatorEvent::Release { sample, gate } => {
                let Some(release) = self.drag.end(*sample) else {
                    return Handled;
                };
                context.emit_feedback(self.feedback.release());
                self.set_phase(AnimatorPhase::Resolving, sample.t_ms);
                if !release.moved {
                    self.finish_tap(context, sample.t_ms);
                    return Transition(State::idle());
                }
                self.offset = release.delta;
                let vote = self.resolve(context, &release, *gate);
                self.start_animation(context, sample.t_ms, vote);
                if vote.is_some() {
                    Transition(State::committing())
                } else {
                    Transition(State::cancelling())
                }
            }
            AnimatorEvent::Cancel { now_ms } => {
                let _ = self.drag.cancel();
                context.emit_feedback(self.feedback.release());
                if self.offset.is_zero() {
                    context.emit_feedback(self.feedback.stop());
                    self.trace.returns = self.trace.returns.saturating_add(1);
                    self.set_phase(AnimatorPhase::Idle, *now_ms);
                    context.emit(AnimatorAction::Returned);
                    return Transition(State::idle());
                }
                self.start_animation(context, *now_ms, None);
                Transition(State::cancelling())
            }
            AnimatorEvent::AnimationFinished(ticket) => {
                self.note_stale(*ticket);
                Handled
            }
        }
    }

    #[state(superstate = "transitioning")]
    fn committing(
        &mut self,
        context: &mut DispatchContext,
        event: &AnimatorEvent,
    ) -> Outcome<State> {
        match event {
            AnimatorEvent::Tick { now_ms } if self.animation_due(*now_ms) => {
                self.complete(context, *now_ms)
            }
            AnimatorEvent::AnimationFinished(ticket) => self.finish_ticket(context, *ticket),
            _ => Super,
        }
    }

    #[state(superstate = "transitioning")]
    fn cancelling(
        &mut self,
        context: &mut DispatchContext,
        event: &AnimatorEvent,
    ) -> Outcome<State> {
        match event {
            AnimatorEvent::Tick { now_ms } if self.animation_due(*now_ms) => {
                self.complete(context, *now_ms)
            }
            AnimatorEvent::AnimationFinished(ticket) => self.finish_ticket(context, *ticket),
            _ => Super,
        }
    }

    #[superstate]
    fn transitioning(
        &mut self,
        context: &mut DispatchContext,
        event: &AnimatorEvent,
    ) -> Outcome<State> {
        match event {
            AnimatorEvent::Begin(_) => {
                self.refuse(context);
                Handled
            }
            _ => Handled,
        }
    }

    #[state]
    fn confirmed(
        &mut self,
        context: &mut DispatchContext,
        event: &AnimatorEvent,
    ) -> Outcome<State> {
        match event {
            AnimatorEvent::Begin(_) => {
                self.refuse(context);
                Handled
            }
            AnimatorEvent::AnimationFinished(ticket) => {
                self.note_stale(*ticket);
                Handled
            }
            _ => Handled,
        }
    }
}

#[cfg(test)]
mod tests;
