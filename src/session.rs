//! Orderings over a set of reviewable items.
//!
//! None of these functions mutate items; they only reorder what they are given.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::item::ReviewableItem;
use crate::policy::SessionWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSummary {
    pub due: usize,
    pub total: usize,
}

pub fn filter_due(items: Vec<ReviewableItem>, now: DateTime<Utc>) -> Vec<ReviewableItem> {
    items.into_iter().filter(|item| item.is_due(now)).collect()
}

pub fn queue_summary(items: &[ReviewableItem], now: DateTime<Utc>) -> QueueSummary {
    QueueSummary {
        due: items.iter().filter(|item| item.is_due(now)).count(),
        total: items.len(),
    }
}

/// Weakest first: ascending by ease factor, then interval. Stable.
pub fn sort_due_for_display(mut items: Vec<ReviewableItem>) -> Vec<ReviewableItem> {
    items.sort_by(|a, b| {
        a.ease_factor
            .total_cmp(&b.ease_factor)
            .then(a.interval.cmp(&b.interval))
    });
    items
}

/// Case-insensitive title order for the full library listing.
pub fn sort_for_library(mut items: Vec<ReviewableItem>) -> Vec<ReviewableItem> {
    items.sort_by_cached_key(|item| item.title.to_lowercase());
    items
}

/// Selection weight: harder, fresher-interval and struggling items weigh more.
pub fn session_weight(item: &ReviewableItem, weights: &SessionWeights) -> f64 {
    let cap = weights.interval_cap_days;
    // Negative intervals only come from corrupt records; treat them as zero.
    let interval = item.interval.max(0).min(cap);
    let ease_part = (weights.max_ease - item.ease_factor) * weights.ease_weight;
    let interval_part = (f64::from(cap) - f64::from(interval)) * weights.interval_weight;
    let weight = ease_part + interval_part;
    if item.last_score <= weights.struggling_score {
        weight * weights.struggling_multiplier
    } else {
        weight
    }
}

/// Weighted random practice order using the default weights.
pub fn build_session_queue<R: Rng + ?Sized>(
    items: Vec<ReviewableItem>,
    rng: &mut R,
) -> Vec<ReviewableItem> {
    build_session_queue_with(items, &SessionWeights::default(), rng)
}

pub fn build_session_queue_thread_rng(items: Vec<ReviewableItem>) -> Vec<ReviewableItem> {
    build_session_queue(items, &mut rand::thread_rng())
}

/// Every item draws `u^(1/w)` with `u` uniform in [0, 1); sorting the keys
/// descending yields a weighted sample without replacement of the whole set.
pub fn build_session_queue_with<R: Rng + ?Sized>(
    items: Vec<ReviewableItem>,
    weights: &SessionWeights,
    rng: &mut R,
) -> Vec<ReviewableItem> {
    let mut keyed: Vec<(f64, ReviewableItem)> = items
        .into_iter()
        .map(|item| {
            let weight = session_weight(&item, weights).max(weights.min_weight);
            let u: f64 = rng.gen_range(0.0..1.0);
            (u.powf(1.0 / weight), item)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    tracing::debug!(items = keyed.len(), "built session queue");
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Difficulty, Pattern};
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap()
    }

    fn item(title: &str, ease_factor: f64, interval: i32, last_score: u8) -> ReviewableItem {
        let mut item = ReviewableItem::new(title, "", Pattern::Greedy, Difficulty::Medium, now());
        item.ease_factor = ease_factor;
        item.interval = interval;
        item.last_score = last_score;
        item
    }

    fn ids(items: &[ReviewableItem]) -> Vec<Uuid> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn filter_due_drops_future_items() {
        let mut later = item("later", 2.5, 3, 4);
        later.next_review_at = now() + Duration::days(3);
        let due = item("due", 2.5, 1, 2);
        let result = filter_due(vec![later, due.clone()], now());
        assert_eq!(ids(&result), vec![due.id]);
    }

    #[test]
    fn summary_counts() {
        let mut later = item("later", 2.5, 3, 4);
        later.next_review_at = now() + Duration::hours(1);
        let items = vec![later, item("a", 2.5, 1, 0), item("b", 1.3, 1, 1)];
        assert_eq!(queue_summary(&items, now()), QueueSummary { due: 2, total: 3 });
    }

    #[test]
    fn display_sort_orders_by_ease_then_interval() {
        let a = item("a", 2.5, 3, 3);
        let b = item("b", 1.3, 10, 1);
        let c = item("c", 1.3, 2, 2);
        let d = item("d", 2.0, 1, 3);
        let sorted = sort_due_for_display(vec![a.clone(), b.clone(), c.clone(), d.clone()]);
        assert_eq!(ids(&sorted), vec![c.id, b.id, d.id, a.id]);
    }

    #[test]
    fn display_sort_is_stable_and_idempotent() {
        let first = item("first", 2.0, 5, 3);
        let second = item("second", 2.0, 5, 3);
        let third = item("third", 1.5, 5, 3);
        let once = sort_due_for_display(vec![first.clone(), second.clone(), third.clone()]);
        assert_eq!(ids(&once), vec![third.id, first.id, second.id]);
        let twice = sort_due_for_display(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn library_sort_ignores_case() {
        let sorted = sort_for_library(vec![
            item("word Ladder", 2.5, 1, 0),
            item("Alien Dictionary", 2.5, 1, 0),
            item("jump Game", 2.5, 1, 0),
        ]);
        let titles: Vec<&str> = sorted.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien Dictionary", "jump Game", "word Ladder"]);
    }

    #[test]
    fn weight_formula() {
        let weights = SessionWeights::default();
        // (5 - 2.5) * 10 + (30 - 6) * 1
        assert!((session_weight(&item("x", 2.5, 6, 3), &weights) - 49.0).abs() < 1e-9);
        // struggling doubles
        assert!((session_weight(&item("x", 2.5, 6, 1), &weights) - 98.0).abs() < 1e-9);
        // never reviewed counts as struggling
        assert!((session_weight(&item("x", 2.5, 6, 0), &weights) - 98.0).abs() < 1e-9);
        // interval contribution is capped
        assert!((session_weight(&item("x", 4.0, 400, 5), &weights) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn weight_may_go_negative_for_high_ease() {
        let weights = SessionWeights::default();
        assert!(session_weight(&item("x", 8.0, 60, 5), &weights) < 0.0);
    }

    #[test]
    fn empty_queue() {
        let mut rng = Pcg64::seed_from_u64(7);
        assert!(build_session_queue(Vec::new(), &mut rng).is_empty());
    }

    #[test]
    fn queue_is_a_permutation() {
        let mut rng = Pcg64::seed_from_u64(42);
        let items: Vec<_> = (0..25)
            .map(|i| item(&format!("p{i}"), 1.3 + f64::from(i) * 0.1, i, (i % 6) as u8))
            .collect();
        let queue = build_session_queue(items.clone(), &mut rng);
        assert_eq!(queue.len(), items.len());
        let mut expected = ids(&items);
        let mut got = ids(&queue);
        expected.sort();
        got.sort();
        assert_eq!(expected, got);
    }

    #[test]
    fn non_positive_weights_still_queued() {
        let mut rng = Pcg64::seed_from_u64(3);
        let items = vec![item("a", 9.0, 90, 5), item("b", 7.0, 45, 4)];
        let queue = build_session_queue(items.clone(), &mut rng);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn corrupt_intervals_are_still_queued() {
        let weights = SessionWeights::default();
        let mut broken = item("broken", 2.5, 0, 3);
        broken.interval = i32::MIN;
        // weighted like a zero-day interval: (5 - 2.5) * 10 + 30
        assert!((session_weight(&broken, &weights) - 55.0).abs() < 1e-9);

        let mut rng = Pcg64::seed_from_u64(1);
        let items = vec![broken.clone(), item("fine", 2.0, 4, 2)];
        let queue = build_session_queue(items.clone(), &mut rng);
        let mut expected = ids(&items);
        let mut got = ids(&queue);
        expected.sort();
        got.sort();
        assert_eq!(expected, got);
    }

    #[test]
    fn repeated_builds_vary_order() {
        let mut rng = Pcg64::seed_from_u64(1234);
        let items: Vec<_> = (0..10)
            .map(|i| item(&format!("p{i}"), 2.5, 5, 3))
            .collect();
        let first = ids(&build_session_queue(items.clone(), &mut rng));
        let differs = (0..20).any(|_| ids(&build_session_queue(items.clone(), &mut rng)) != first);
        assert!(differs);
    }

    #[test]
    fn weak_items_tend_to_come_first() {
        let mut rng = Pcg64::seed_from_u64(99);
        // weight 132 against weight 20
        let weak = item("weak", 1.3, 1, 1);
        let strong = item("strong", 3.0, 30, 5);
        let trials = 2000;
        let mut weak_first = 0;
        for _ in 0..trials {
            let queue = build_session_queue(vec![strong.clone(), weak.clone()], &mut rng);
            if queue[0].id == weak.id {
                weak_first += 1;
            }
        }
        assert!(weak_first > trials * 7 / 10, "weak first {weak_first}/{trials}");
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let items: Vec<_> = (0..8)
            .map(|i| item(&format!("p{i}"), 2.0, i, 3))
            .collect();
        let a = build_session_queue(items.clone(), &mut Pcg64::seed_from_u64(5));
        let b = build_session_queue(items, &mut Pcg64::seed_from_u64(5));
        assert_eq!(ids(&a), ids(&b));
    }
}
