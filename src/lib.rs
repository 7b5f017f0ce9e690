//! Spaced-repetition scheduling core for a mastery queue of practiced problems.
//!
//! [`compute_next_state`] turns a review score into the next schedule,
//! [`sort_due_for_display`] orders due items weakest first, and
//! [`build_session_queue`] draws a weighted random practice order.

pub mod error;
pub mod item;
pub mod policy;
pub mod practice;
pub mod scheduler;
pub mod service;
pub mod session;

pub use error::{PolicyError, ReviewError, SchedulerError, StoreError};
pub use item::{Difficulty, MasteryStatus, Pattern, ReviewableItem};
pub use policy::{SchedulerPolicy, SessionWeights};
pub use practice::{PracticeSession, ScoreTally};
pub use scheduler::{ReviewOutcome, ReviewState, Score, apply_review, compute_next_state};
pub use service::{ItemStore, MemoryStore, ReviewEvent, ReviewService};
pub use session::{build_session_queue, sort_due_for_display};
