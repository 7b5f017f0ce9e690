use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::{DEFAULT_EASE_FACTOR, INITIAL_INTERVAL_DAYS};
use crate::scheduler::ReviewState;

/// Algorithmic pattern a practiced problem exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    #[serde(rename = "Sliding Window")]
    SlidingWindow,
    #[serde(rename = "Two Pointers")]
    TwoPointers,
    #[serde(rename = "Fast & Slow Pointers")]
    FastSlowPointers,
    #[serde(rename = "Merge Intervals")]
    MergeIntervals,
    #[serde(rename = "Cyclic Sort")]
    CyclicSort,
    #[serde(rename = "In-place Reversal")]
    InPlaceReversal,
    #[serde(rename = "BFS")]
    Bfs,
    #[serde(rename = "DFS")]
    Dfs,
    #[serde(rename = "Two Heaps")]
    TwoHeaps,
    #[serde(rename = "Subsets")]
    Subsets,
    #[serde(rename = "Binary Search")]
    BinarySearch,
    #[serde(rename = "Top K Elements")]
    TopKElements,
    #[serde(rename = "K-way Merge")]
    KWayMerge,
    #[serde(rename = "Backtracking")]
    Backtracking,
    #[serde(rename = "Dynamic Programming")]
    DynamicProgramming,
    #[serde(rename = "Greedy")]
    Greedy,
    #[serde(rename = "Graphs")]
    Graphs,
    #[serde(rename = "Trie")]
    Trie,
    #[serde(rename = "Topological Sort")]
    TopologicalSort,
    #[serde(rename = "Union Find")]
    UnionFind,
    #[serde(rename = "Monotonic Stack")]
    MonotonicStack,
    #[serde(rename = "Bit Manipulation")]
    BitManipulation,
}

impl Pattern {
    pub fn label(self) -> &'static str {
        match self {
            Pattern::SlidingWindow => "Sliding Window",
            Pattern::TwoPointers => "Two Pointers",
            Pattern::FastSlowPointers => "Fast & Slow Pointers",
            Pattern::MergeIntervals => "Merge Intervals",
            Pattern::CyclicSort => "Cyclic Sort",
            Pattern::InPlaceReversal => "In-place Reversal",
            Pattern::Bfs => "BFS",
            Pattern::Dfs => "DFS",
            Pattern::TwoHeaps => "Two Heaps",
            Pattern::Subsets => "Subsets",
            Pattern::BinarySearch => "Binary Search",
            Pattern::TopKElements => "Top K Elements",
            Pattern::KWayMerge => "K-way Merge",
            Pattern::Backtracking => "Backtracking",
            Pattern::DynamicProgramming => "Dynamic Programming",
            Pattern::Greedy => "Greedy",
            Pattern::Graphs => "Graphs",
            Pattern::Trie => "Trie",
            Pattern::TopologicalSort => "Topological Sort",
            Pattern::UnionFind => "Union Find",
            Pattern::MonotonicStack => "Monotonic Stack",
            Pattern::BitManipulation => "Bit Manipulation",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Problem difficulty. Unrelated to the review score scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Coarse progress label derived from the last review score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryStatus {
    Learning,
    Reviewing,
    Mastered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewableItem {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub pattern: Pattern,
    pub difficulty: Difficulty,
    /// 0 until the first review.
    pub last_score: u8,
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: i32,
    #[serde(rename = "next_review")]
    pub next_review_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReviewableItem {
    /// A never-reviewed item, due immediately.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        pattern: Pattern,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            url: url.into(),
            pattern,
            difficulty,
            last_score: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: INITIAL_INTERVAL_DAYS,
            next_review_at: now,
            insight_note: None,
            created_at: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }

    pub fn is_new(&self) -> bool {
        self.last_score == 0
    }

    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            ease_factor: self.ease_factor,
            interval: self.interval,
        }
    }

    pub fn mastery_status(&self) -> MasteryStatus {
        match self.last_score {
            s if s >= 4 => MasteryStatus::Mastered,
            s if s >= 2 => MasteryStatus::Reviewing,
            _ => MasteryStatus::Learning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_item_defaults() {
        let item = ReviewableItem::new(
            "Two Sum",
            "https://leetcode.com/problems/two-sum/",
            Pattern::TwoPointers,
            Difficulty::Easy,
            now(),
        );
        assert!(item.is_new());
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.interval, 1);
        assert!(item.is_due(now()));
        assert_eq!(item.mastery_status(), MasteryStatus::Learning);
    }

    #[test]
    fn due_boundary() {
        let mut item =
            ReviewableItem::new("Trapping Rain Water", "", Pattern::TwoPointers, Difficulty::Hard, now());
        item.next_review_at = now() + Duration::days(1);
        assert!(!item.is_due(now()));
        assert!(item.is_due(now() + Duration::days(1)));
    }

    #[test]
    fn mastery_status_thresholds() {
        let mut item = ReviewableItem::new("Subsets", "", Pattern::Subsets, Difficulty::Medium, now());
        let expected = [
            (1, MasteryStatus::Learning),
            (2, MasteryStatus::Reviewing),
            (3, MasteryStatus::Reviewing),
            (4, MasteryStatus::Mastered),
            (5, MasteryStatus::Mastered),
        ];
        for (score, status) in expected {
            item.last_score = score;
            assert_eq!(item.mastery_status(), status, "score {score}");
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let item = ReviewableItem::new(
            "Course Schedule",
            "https://leetcode.com/problems/course-schedule/",
            Pattern::TopologicalSort,
            Difficulty::Medium,
            now(),
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pattern"], "Topological Sort");
        assert_eq!(json["difficulty"], "Medium");
        assert_eq!(json["ease_factor"], 2.5);
        assert_eq!(json["last_score"], 0);
        assert!(json.get("next_review").is_some());
        assert!(json.get("insight_note").is_none());

        let back: ReviewableItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn pattern_label_matches_serde_name() {
        let json = serde_json::to_string(&Pattern::FastSlowPointers).unwrap();
        assert_eq!(json, format!("\"{}\"", Pattern::FastSlowPointers));
    }
}
