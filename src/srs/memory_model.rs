use chrono::{DateTime, Utc};

use super::SchedulerError;
use crate::domain::{CardMemoryState, LifecycleState, Rating};

/// What the memory model proposes for a single review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutcome {
  /// Normalized to [0,1]; the scheduler clamps it again regardless
  pub difficulty: f64,
  pub stability: f64,
  pub retrievability: f64,
  /// Candidate lifecycle state after this review
  pub state: LifecycleState,
  /// Raw interval until the next review, in (possibly fractional) days
  pub interval_days: f64,
}

/// The spaced-repetition memory model behind the scheduler.
///
/// Implementations compute the memory-state update only. Step ladders, interval
/// floors, fuzz and review bookkeeping are applied by the scheduler on top.
pub trait MemoryModel: Send + Sync {
  fn next_state(
    &self,
    card: &CardMemoryState,
    rating: Rating,
    now: DateTime<Utc>,
  ) -> Result<ModelOutcome, SchedulerError>;
}
