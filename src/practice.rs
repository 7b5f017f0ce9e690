//! Caller-side practice session: `Idle -> InSession -> Idle`.
//!
//! The queue is fixed when the session starts and never reshuffled. Leaving
//! early discards nothing but the position; reviews already applied stay applied.

use crate::item::ReviewableItem;
use crate::scheduler::Score;

/// Per-score counts for the reviews completed in one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    counts: [u32; 5],
}

impl ScoreTally {
    pub fn record(&mut self, score: Score) {
        self.counts[usize::from(score.value() - 1)] += 1;
    }

    pub fn count(&self, score: Score) -> u32 {
        self.counts[usize::from(score.value() - 1)]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PracticeSession {
    #[default]
    Idle,
    InSession {
        queue: Vec<ReviewableItem>,
        current_index: usize,
        tally: ScoreTally,
    },
}

impl PracticeSession {
    /// Start on a queue built once up front. An empty queue stays idle.
    pub fn start(queue: Vec<ReviewableItem>) -> Self {
        if queue.is_empty() {
            return PracticeSession::Idle;
        }
        PracticeSession::InSession {
            queue,
            current_index: 0,
            tally: ScoreTally::default(),
        }
    }

    /// Review one specific item outside the weighted order.
    pub fn start_single(item: ReviewableItem) -> Self {
        Self::start(vec![item])
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PracticeSession::InSession { .. })
    }

    pub fn current(&self) -> Option<&ReviewableItem> {
        match self {
            PracticeSession::Idle => None,
            PracticeSession::InSession {
                queue,
                current_index,
                ..
            } => queue.get(*current_index),
        }
    }

    /// 1-based position and queue length.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self {
            PracticeSession::Idle => None,
            PracticeSession::InSession {
                queue,
                current_index,
                ..
            } => Some((current_index + 1, queue.len())),
        }
    }

    /// Record the completed review of the current item and move on. Returns
    /// the final tally when this was the last item.
    pub fn advance(&mut self, score: Score) -> Option<ScoreTally> {
        let PracticeSession::InSession {
            queue,
            current_index,
            tally,
        } = self
        else {
            return None;
        };
        tally.record(score);
        *current_index += 1;
        if *current_index < queue.len() {
            return None;
        }
        let finished = *tally;
        tracing::debug!(reviewed = finished.total(), "practice session finished");
        *self = PracticeSession::Idle;
        Some(finished)
    }

    /// Leave the session early from any position.
    pub fn exit(&mut self) -> Option<ScoreTally> {
        match std::mem::take(self) {
            PracticeSession::Idle => None,
            PracticeSession::InSession {
                current_index,
                queue,
                tally,
            } => {
                tracing::debug!(
                    position = current_index,
                    remaining = queue.len().saturating_sub(current_index),
                    "practice session exited early"
                );
                Some(tally)
            }
        }
    }
}
