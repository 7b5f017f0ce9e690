//! Review orchestration over an item store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::error::{ReviewError, StoreError};
use crate::item::ReviewableItem;
use crate::policy::SchedulerPolicy;
use crate::practice::PracticeSession;
use crate::scheduler::{self, Score};
use crate::session;

/// Storage collaborator. `persist` must replace one item's state atomically;
/// applying a review to a stale snapshot would silently drop an earlier review.
pub trait ItemStore {
    fn due_items(&self, now: DateTime<Utc>) -> Result<Vec<ReviewableItem>, StoreError>;
    fn all_items(&self) -> Result<Vec<ReviewableItem>, StoreError>;
    fn find(&self, id: Uuid) -> Result<Option<ReviewableItem>, StoreError>;
    fn persist(&mut self, item: &ReviewableItem) -> Result<(), StoreError>;
}

/// In-process store, ordered by next review like the backing database query.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<Uuid, ReviewableItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ReviewableItem> {
        self.items.remove(&id)
    }
}

fn by_next_review(mut items: Vec<ReviewableItem>) -> Vec<ReviewableItem> {
    items.sort_by_key(|item| (item.next_review_at, item.id));
    items
}

impl FromIterator<ReviewableItem> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = ReviewableItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.id, item)).collect(),
        }
    }
}

impl ItemStore for MemoryStore {
    fn due_items(&self, now: DateTime<Utc>) -> Result<Vec<ReviewableItem>, StoreError> {
        let due = self
            .items
            .values()
            .filter(|item| item.is_due(now))
            .cloned()
            .collect();
        Ok(by_next_review(due))
    }

    fn all_items(&self) -> Result<Vec<ReviewableItem>, StoreError> {
        Ok(by_next_review(self.items.values().cloned().collect()))
    }

    fn find(&self, id: Uuid) -> Result<Option<ReviewableItem>, StoreError> {
        Ok(self.items.get(&id).cloned())
    }

    fn persist(&mut self, item: &ReviewableItem) -> Result<(), StoreError> {
        self.items.insert(item.id, item.clone());
        Ok(())
    }
}

/// One scored review of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEvent {
    pub item_id: Uuid,
    pub score: i64,
    /// Replaces the item's note when present.
    pub insight_note: Option<String>,
}

impl ReviewEvent {
    pub fn new(item_id: Uuid, score: i64) -> Self {
        Self {
            item_id,
            score,
            insight_note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.insight_note = Some(note.into());
        self
    }
}

pub struct ReviewService<S> {
    store: S,
    policy: SchedulerPolicy,
}

impl<S: ItemStore> ReviewService<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, SchedulerPolicy::default())
    }

    pub fn with_policy(store: S, policy: SchedulerPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn policy(&self) -> &SchedulerPolicy {
        &self.policy
    }

    /// Score one item and persist its new schedule.
    pub fn review(
        &mut self,
        event: &ReviewEvent,
        now: DateTime<Utc>,
    ) -> Result<ReviewableItem, ReviewError> {
        // Reject bad scores before touching the store.
        if let Err(err) = Score::try_from(event.score) {
            tracing::warn!(item = %event.item_id, score = event.score, "rejected review");
            return Err(err.into());
        }

        let mut item = self
            .store
            .find(event.item_id)?
            .ok_or(ReviewError::NotFound(event.item_id))?;

        if let Err(err) = scheduler::apply_review(&mut item, event.score, now, &self.policy) {
            tracing::warn!(item = %item.id, error = %err, "rejected review");
            return Err(err.into());
        }
        if let Some(note) = &event.insight_note {
            item.insight_note = Some(note.clone());
        }

        self.store.persist(&item)?;
        tracing::info!(
            item = %item.id,
            score = item.last_score,
            interval = item.interval,
            next_review = %item.next_review_at,
            "review recorded"
        );
        Ok(item)
    }

    pub fn due_for_display(&self, now: DateTime<Utc>) -> Result<Vec<ReviewableItem>, ReviewError> {
        Ok(session::sort_due_for_display(self.store.due_items(now)?))
    }

    pub fn library(&self) -> Result<Vec<ReviewableItem>, ReviewError> {
        Ok(session::sort_for_library(self.store.all_items()?))
    }

    pub fn summary(&self, now: DateTime<Utc>) -> Result<session::QueueSummary, ReviewError> {
        Ok(session::queue_summary(&self.store.all_items()?, now))
    }

    /// Shuffle the current due set once and start a session on it.
    pub fn start_session<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<PracticeSession, ReviewError> {
        let due = self.store.due_items(now)?;
        let queue = session::build_session_queue_with(due, &self.policy.session, rng);
        Ok(PracticeSession::start(queue))
    }
}
