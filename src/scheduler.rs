//! Review-state updater.
//!
//! An SM-2 style policy: a lapse resets the interval and costs ease, a pass
//! grows the interval geometrically by the (possibly raised) ease factor.

use chrono::{DateTime, Duration, Utc};

use crate::error::SchedulerError;
use crate::item::ReviewableItem;
use crate::policy::SchedulerPolicy;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Score {
    Forgot,
    Struggled,
    Hesitant,
    Confident,
    Perfect,
}

impl Score {
    pub fn from_u8(n: u8) -> Option<Score> {
        match n {
            1 => Some(Score::Forgot),
            2 => Some(Score::Struggled),
            3 => Some(Score::Hesitant),
            4 => Some(Score::Confident),
            5 => Some(Score::Perfect),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Score::Forgot => 1,
            Score::Struggled => 2,
            Score::Hesitant => 3,
            Score::Confident => 4,
            Score::Perfect => 5,
        }
    }
}

impl TryFrom<i64> for Score {
    type Error = SchedulerError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        u8::try_from(n)
            .ok()
            .and_then(Score::from_u8)
            .ok_or(SchedulerError::InvalidScore { score: n })
    }
}

impl From<Score> for f64 {
    fn from(s: Score) -> f64 {
        f64::from(s.value())
    }
}

/// Scheduling fields the updater reads.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReviewState {
    pub ease_factor: f64,
    pub interval: i32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReviewOutcome {
    pub ease_factor: f64,
    pub interval: i32,
    pub next_review_at: DateTime<Utc>,
    pub last_score: u8,
}

/// Compute the next state with the default policy.
pub fn compute_next_state(
    current: &ReviewState,
    score: i64,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome, SchedulerError> {
    SchedulerPolicy::default().next_state(current, score, now)
}

/// Apply a review to `item` in place. On error the item is left untouched.
pub fn apply_review(
    item: &mut ReviewableItem,
    score: i64,
    now: DateTime<Utc>,
    policy: &SchedulerPolicy,
) -> Result<(), SchedulerError> {
    let outcome = policy.next_state(&item.review_state(), score, now)?;
    item.ease_factor = outcome.ease_factor;
    item.interval = outcome.interval;
    item.next_review_at = outcome.next_review_at;
    item.last_score = outcome.last_score;
    Ok(())
}

fn validate_state(state: &ReviewState) -> Result<(), SchedulerError> {
    if state.interval < 0 {
        return Err(SchedulerError::InvalidState {
            field: "interval",
            value: state.interval.to_string(),
        });
    }
    if !state.ease_factor.is_finite() || state.ease_factor <= 0.0 {
        return Err(SchedulerError::InvalidState {
            field: "ease_factor",
            value: state.ease_factor.to_string(),
        });
    }
    Ok(())
}

impl SchedulerPolicy {
    pub fn is_lapse(&self, score: Score) -> bool {
        score.value() <= self.failure_threshold
    }

    fn ease_after(&self, ease: f64, score: Score) -> f64 {
        let ease = if self.is_lapse(score) {
            ease - self.ease_penalty
        } else {
            ease + self.ease_bonus_per_level * (f64::from(score) - f64::from(self.neutral_score))
        };
        ease.max(self.ease_floor)
    }

    fn interval_after(&self, interval: i32, new_ease: f64, score: Score) -> i32 {
        if self.is_lapse(score) {
            return self.reset_interval_days;
        }
        // A cold start (interval 0) grows from one day.
        let base = f64::from(interval.max(1));
        let cap = f64::from(self.max_interval_days.max(1));
        (base * new_ease).round().clamp(1.0, cap) as i32
    }

    /// Validate the inputs and compute the state after a review.
    pub fn next_state(
        &self,
        current: &ReviewState,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, SchedulerError> {
        let score = Score::try_from(score)?;
        validate_state(current)?;

        let ease_factor = self.ease_after(current.ease_factor, score);
        let interval = self.interval_after(current.interval, ease_factor, score);
        let next_review_at = now
            .checked_add_signed(Duration::days(i64::from(interval)))
            .ok_or_else(|| SchedulerError::InvalidState {
                field: "interval",
                value: interval.to_string(),
            })?;

        tracing::debug!(
            score = score.value(),
            old_ease = current.ease_factor,
            new_ease = ease_factor,
            old_interval = current.interval,
            new_interval = interval,
            "computed next review state"
        );

        Ok(ReviewOutcome {
            ease_factor,
            interval,
            next_review_at,
            last_score: score.value(),
        })
    }
}
