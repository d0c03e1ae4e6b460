use heapless::Vec as SlotVec;

use crate::animator::{
    AnimationTicket, AnimatorAction, AnimatorOutput, AnimatorPhase, AnimatorSettings,
    CommitAnimator, ReleaseGate,
};
use crate::config::{DeckConfig, EngineConfig, STACK_MAX_DEPTH};
use crate::gesture::{PointerSample, Vector2};
use crate::ledger::{DecisionLedger, SubmitResult};
use crate::types::{Decision, Vote};

use super::{forward_feedback, DeckListener};

const SLOT_COUNT: usize = STACK_MAX_DEPTH as usize;

struct CardSlot {
    animator: CommitAnimator,
    card: Option<usize>,
    in_flight: Option<Vote>,
}

impl CardSlot {
    fn clear(&mut self) {
        self.card = None;
        self.in_flight = None;
    }
}

/// A voting surface: card payloads, the ledger they feed, and one or two
/// animator slots.
///
/// With two slots the next card becomes live as soon as the top card starts
/// its exit, so a new gesture can begin while the previous card is still
/// animating away.
pub struct CardDeck<P, L> {
    config: DeckConfig,
    cards: Vec<P>,
    ledger: DecisionLedger<P>,
    slots: SlotVec<CardSlot, SLOT_COUNT>,
    top: usize,
    listener: L,
}

impl<P: Clone, L: DeckListener<P>> CardDeck<P, L> {
    pub fn new(cards: Vec<P>, config: &EngineConfig, listener: L) -> Self {
        let config = config.sanitized();
        let deck = config.deck;
        let mut slots = SlotVec::new();
        for owner in 0..deck.stack_depth.clamp(1, STACK_MAX_DEPTH) {
            let _ = slots.push(CardSlot {
                animator: CommitAnimator::new(AnimatorSettings::card(owner, &config)),
                card: None,
                in_flight: None,
            });
        }
        log::debug!(
            "deck ready: {} cards, capacity {}, {} slot(s)",
            cards.len(),
            deck.capacity,
            slots.len()
        );
        Self {
            config: deck,
            ledger: DecisionLedger::new(deck.capacity, deck.skip_budget),
            cards,
            slots,
            top: 0,
            listener,
        }
    }

    pub fn ledger(&self) -> &DecisionLedger<P> {
        &self.ledger
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn stack_depth(&self) -> usize {
        self.slots.len()
    }

    /// Content index the next gesture would act on.
    pub fn current_index(&self) -> usize {
        self.ledger.cursor() + self.in_flight_count()
    }

    pub fn current_card(&self) -> Option<&P> {
        self.cards.get(self.current_index())
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index() >= self.cards.len()
    }

    pub fn offset(&self) -> Vector2 {
        self.slots
            .get(self.top)
            .map_or(Vector2::ZERO, |slot| slot.animator.offset())
    }

    pub fn pointer_down(&mut self, sample: PointerSample) {
        if self.is_exhausted() {
            log::debug!("no cards left, ignoring pointer {}", sample.pointer);
            return;
        }
        let index = self.current_index();
        let top = self.top;
        let Some(slot) = self.slots.get_mut(top) else {
            return;
        };
        let out = slot.animator.begin(sample);
        if out
            .iter()
            .any(|action| matches!(action, AnimatorAction::Began { .. }))
        {
            slot.card = Some(index);
        }
        self.apply(top, out);
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        let top = self.top;
        if let Some(slot) = self.slots.get_mut(top) {
            let out = slot.animator.update(sample);
            self.apply(top, out);
        }
    }

    pub fn pointer_up(&mut self, sample: PointerSample) {
        let gate = self.release_gate();
        let top = self.top;
        if let Some(slot) = self.slots.get_mut(top) {
            let out = slot.animator.release(sample, gate);
            self.apply(top, out);
        }
    }

    pub fn pointer_cancel(&mut self, sample: PointerSample) {
        let top = self.top;
        if let Some(slot) = self.slots.get_mut(top) {
            let out = slot.animator.cancel(sample.t_ms);
            self.apply(top, out);
        }
    }

    pub fn tick(&mut self, now_ms: u64) {
        for index in 0..self.slots.len() {
            let out = self.slots[index].animator.tick(now_ms);
            self.apply(index, out);
        }
    }

    pub fn animation_finished(&mut self, ticket: AnimationTicket) {
        let index = usize::from(ticket.owner);
        match self.slots.get_mut(index) {
            Some(slot) => {
                let out = slot.animator.animation_finished(ticket);
                self.apply(index, out);
            }
            None => log::debug!("completion for unknown slot {:?}", ticket),
        }
    }

    /// Discards accumulated votes; the skip budget and card position stay.
    pub fn reset(&mut self) {
        self.ledger.reset();
    }

    /// Hands the accumulated votes to the caller and starts a new coupon.
    pub fn take_coupon(&mut self) -> std::vec::Vec<Decision<P>> {
        self.ledger.take().into_iter().collect()
    }

    fn in_flight_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.in_flight.is_some())
            .count()
    }

    fn release_gate(&self) -> ReleaseGate {
        let passes = self
            .slots
            .iter()
            .filter(|slot| slot.in_flight == Some(Vote::Pass))
            .count();
        ReleaseGate {
            allow_pass: self.ledger.skip_budget() as usize > passes,
        }
    }

    fn apply(&mut self, index: usize, out: AnimatorOutput) {
        for action in out {
            let card = self.slots[index].card.unwrap_or(self.ledger.cursor());
            match action {
                AnimatorAction::Began { .. } | AnimatorAction::Refused => {}
                AnimatorAction::Offset(offset) => self.listener.on_offset(card, offset),
                AnimatorAction::Feedback(feedback) => {
                    forward_feedback(&mut self.listener, feedback)
                }
                AnimatorAction::Tapped => {
                    self.slots[index].clear();
                    self.listener.on_tap(card);
                }
                AnimatorAction::Vetoed { vote } => {
                    log::debug!("card {} {} vetoed", card, vote.label());
                    self.listener.on_pass_rejected();
                }
                AnimatorAction::Animate(request) => {
                    self.slots[index].in_flight = request.vote;
                    self.listener.on_animate(card, &request);
                }
                AnimatorAction::Resolved { vote } => {
                    self.slots[index].clear();
                    self.settle(card, vote);
                    self.listener.on_offset(card, Vector2::ZERO);
                }
                AnimatorAction::Returned => {
                    self.slots[index].clear();
                    self.listener.on_offset(card, Vector2::ZERO);
                    self.listener.on_returned(card);
                }
            }
        }
        self.retarget();
    }

    fn settle(&mut self, card: usize, vote: Vote) {
        let Some(payload) = self.cards.get(card).cloned() else {
            log::warn!("resolved card {} is out of range", card);
            return;
        };
        match self.ledger.submit(vote, payload.clone()) {
            SubmitResult::Accepted {
                ready_to_submit, ..
            } => {
                self.listener.on_commit(&Decision {
                    outcome: vote,
                    payload,
                });
                if ready_to_submit {
                    self.listener.on_ledger_full();
                }
            }
            SubmitResult::RejectedFull => {
                if self.config.advance_on_overflow {
                    self.ledger.advance_cursor();
                }
                self.listener.on_overflow();
            }
            SubmitResult::RejectedNoSkip => self.listener.on_pass_rejected(),
        }
    }

    /// A card springing back keeps the input; only an exiting card hands it on.
    fn retarget(&mut self) {
        let top = &self.slots[self.top];
        let exiting =
            top.animator.phase() == AnimatorPhase::Committing && top.in_flight.is_some();
        if !exiting {
            return;
        }
        if let Some(next) = self
            .slots
            .iter()
            .position(|slot| slot.animator.is_interactive())
        {
            log::debug!("deck top slot {} -> {}", self.top, next);
            self.top = next;
        }
    }
}
