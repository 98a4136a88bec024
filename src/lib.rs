//! Spaced-repetition scheduling core for a language-learning flashcard app.
//!
//! Persistence, audio and UI live elsewhere; they hand a card's memory state,
//! the user's rating and the deck's step ladders to [`srs::Scheduler`] and store
//! the state it returns.

pub mod config;
pub mod domain;
pub mod session;
pub mod srs;

pub use config::{SchedulerConfig, SchedulerParams};
pub use domain::{CardMemoryState, DeckStepConfig, LifecycleState, Rating};
pub use srs::{schedule_review, Scheduler, SchedulerError};
