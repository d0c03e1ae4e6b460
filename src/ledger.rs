use heapless::Vec;

use crate::config::LEDGER_MAX_CAPACITY;
use crate::types::{Decision, Vote};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitResult {
    /// `ready_to_submit` is set only by the submission that fills the ledger.
    Accepted { count: usize, ready_to_submit: bool },
    RejectedFull,
    RejectedNoSkip,
}

impl SubmitResult {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Bounded, ordered collection of committed votes (the coupon).
#[derive(Clone, Debug)]
pub struct DecisionLedger<P> {
    capacity: usize,
    items: Vec<Decision<P>, LEDGER_MAX_CAPACITY>,
    skip_budget: u32,
    cursor: usize,
}

impl<P> DecisionLedger<P> {
    pub fn new(capacity: usize, skip_budget: u32) -> Self {
        Self {
            capacity: capacity.clamp(1, LEDGER_MAX_CAPACITY),
            items: Vec::new(),
            skip_budget,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[Decision<P>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn skip_budget(&self) -> u32 {
        self.skip_budget
    }

    /// Index of the content item currently presented.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn advance_cursor(&mut self) {
        self.cursor = self.cursor.saturating_add(1);
    }

    pub fn submit(&mut self, outcome: Vote, payload: P) -> SubmitResult {
        match outcome {
            Vote::Positive | Vote::Negative => {
                if self.is_full() {
                    log::debug!("ledger full, rejecting {}", outcome.label());
                    return SubmitResult::RejectedFull;
                }
                if self.items.push(Decision { outcome, payload }).is_err() {
                    return SubmitResult::RejectedFull;
                }
                self.advance_cursor();
                let count = self.items.len();
                log::debug!("ledger accepted {} ({}/{})", outcome.label(), count, self.capacity);
                SubmitResult::Accepted {
                    count,
                    ready_to_submit: count == self.capacity,
                }
            }
            Vote::Pass => {
                if self.skip_budget == 0 {
                    log::debug!("no skips left, pass ignored");
                    return SubmitResult::RejectedNoSkip;
                }
                self.skip_budget -= 1;
                self.advance_cursor();
                log::debug!("ledger pass, {} skips left", self.skip_budget);
                SubmitResult::Accepted {
                    count: self.items.len(),
                    ready_to_submit: false,
                }
            }
        }
    }

    /// Clears accumulated votes; skip budget and cursor are kept.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    pub fn take(&mut self) -> Vec<Decision<P>, LEDGER_MAX_CAPACITY> {
        core::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_votes_fill_and_sixth_overflows() {
        let mut ledger = DecisionLedger::new(5, 1);
        let mut ready = 0;
        for id in 0..5u32 {
            match ledger.submit(Vote::Positive, id) {
                SubmitResult::Accepted {
                    count,
                    ready_to_submit,
                } => {
                    assert_eq!(count, id as usize + 1);
                    if ready_to_submit {
                        ready += 1;
                        assert_eq!(count, 5);
                    }
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(ready, 1);
        assert!(ledger.is_full());
        assert_eq!(ledger.submit(Vote::Positive, 99), SubmitResult::RejectedFull);
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn full_ledger_ignores_repeated_submissions() {
        let mut ledger = DecisionLedger::new(2, 0);
        let _ = ledger.submit(Vote::Positive, "a");
        let _ = ledger.submit(Vote::Negative, "b");
        let before = ledger.items().to_vec();
        for _ in 0..10 {
            assert_eq!(ledger.submit(Vote::Positive, "c"), SubmitResult::RejectedFull);
        }
        assert_eq!(ledger.items(), before.as_slice());
        assert_eq!(ledger.cursor(), 2);
    }

    #[test]
    fn pass_spends_skip_budget_only() {
        let mut ledger = DecisionLedger::new(5, 1);
        assert_eq!(
            ledger.submit(Vote::Pass, 1),
            SubmitResult::Accepted {
                count: 0,
                ready_to_submit: false
            }
        );
        assert_eq!(ledger.skip_budget(), 0);
        assert_eq!(ledger.cursor(), 1);

        assert_eq!(ledger.submit(Vote::Pass, 2), SubmitResult::RejectedNoSkip);
        assert_eq!(ledger.cursor(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn passes_do_not_count_against_capacity() {
        let mut ledger = DecisionLedger::new(1, 3);
        let _ = ledger.submit(Vote::Pass, 0);
        let _ = ledger.submit(Vote::Pass, 1);
        assert!(ledger.submit(Vote::Negative, 2).is_accepted());
        assert!(ledger.is_full());
        assert!(ledger.submit(Vote::Pass, 3).is_accepted());
    }

    #[test]
    fn reset_then_refill_reaches_same_terminal_state() {
        let mut ledger = DecisionLedger::new(3, 1);
        let votes = [Vote::Positive, Vote::Negative, Vote::Positive];
        let fill = |ledger: &mut DecisionLedger<usize>| {
            votes
                .iter()
                .enumerate()
                .map(|(id, vote)| ledger.submit(*vote, id))
                .collect::<std::vec::Vec<_>>()
        };

        let first = fill(&mut ledger);
        let first_items = ledger.items().to_vec();
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.skip_budget(), 1);

        let second = fill(&mut ledger);
        assert_eq!(first, second);
        assert_eq!(ledger.items(), first_items.as_slice());
    }

    #[test]
    fn take_returns_items_in_order_and_empties() {
        let mut ledger = DecisionLedger::new(4, 0);
        let _ = ledger.submit(Vote::Negative, 'x');
        let _ = ledger.submit(Vote::Positive, 'y');
        let taken = ledger.take();
        let outcomes: std::vec::Vec<_> = taken.iter().map(|d| (d.outcome, d.payload)).collect();
        assert_eq!(
            outcomes,
            std::vec![(Vote::Negative, 'x'), (Vote::Positive, 'y')]
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(DecisionLedger::<()>::new(0, 0).capacity(), 1);
        assert_eq!(
            DecisionLedger::<()>::new(500, 0).capacity(),
            LEDGER_MAX_CAPACITY
        );
    }
}
