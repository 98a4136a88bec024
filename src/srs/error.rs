use crate::domain::{Ladder, LifecycleState};

/// Scheduling errors.
///
/// Everything here is a caller or configuration mistake; the scheduler has no
/// I/O and therefore no transient failures.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerError {
  EmptySteps { ladder: Ladder },
  ZeroStep { ladder: Ladder, index: usize },
  InvalidStability(f64),
  InvalidDifficulty(f64),
  MissingLastReview(LifecycleState),
  IntervalOutOfRange { days: u32, maximum: u32 },
  InvalidParams(String),
  Model(String),
}

impl std::fmt::Display for SchedulerError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SchedulerError::EmptySteps { ladder } => {
        write!(f, "Deck has no {} steps configured", ladder.as_str())
      }
      SchedulerError::ZeroStep { ladder, index } => {
        write!(f, "{} step {} is zero minutes", ladder.as_str(), index)
      }
      SchedulerError::InvalidStability(value) => {
        write!(f, "Stability must be finite and non-negative, got {}", value)
      }
      SchedulerError::InvalidDifficulty(value) => {
        write!(f, "Difficulty must be finite, got {}", value)
      }
      SchedulerError::MissingLastReview(state) => {
        write!(f, "{} card has no last review timestamp", state.as_str())
      }
      SchedulerError::IntervalOutOfRange { days, maximum } => {
        write!(f, "Stored interval of {} days exceeds the maximum of {}", days, maximum)
      }
      SchedulerError::InvalidParams(err) => write!(f, "{}", err),
      SchedulerError::Model(err) => write!(f, "Memory model failed: {}", err),
    }
  }
}

impl SchedulerError {
  /// Returns a user-facing error message without internal values.
  pub fn user_message(&self) -> &'static str {
    match self {
      SchedulerError::EmptySteps { .. } | SchedulerError::ZeroStep { .. } => {
        "This deck's learning steps are misconfigured"
      }
      SchedulerError::InvalidStability(_)
      | SchedulerError::InvalidDifficulty(_)
      | SchedulerError::MissingLastReview(_)
      | SchedulerError::IntervalOutOfRange { .. } => "This card's review history is corrupted",
      SchedulerError::InvalidParams(_) => "The scheduler settings are invalid",
      SchedulerError::Model(_) => "Could not schedule the next review",
    }
  }

  pub fn is_configuration(&self) -> bool {
    matches!(
      self,
      SchedulerError::EmptySteps { .. } | SchedulerError::ZeroStep { .. } | SchedulerError::InvalidParams(_)
    )
  }
}

impl std::error::Error for SchedulerError {}
