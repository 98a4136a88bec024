use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Coarse phase of a card's review progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LifecycleState {
  #[default]
  New,
  Learning,
  Review,
  Relearning,
}

impl LifecycleState {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "New" => Some(Self::New),
      "Learning" => Some(Self::Learning),
      "Review" => Some(Self::Review),
      "Relearning" => Some(Self::Relearning),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "New",
      Self::Learning => "Learning",
      Self::Review => "Review",
      Self::Relearning => "Relearning",
    }
  }

  /// True while the card is walking a sub-day step ladder
  pub fn is_stepping(&self) -> bool {
    matches!(self, Self::Learning | Self::Relearning)
  }
}

/// Persisted per-card memory state.
///
/// The scheduler never mutates one of these in place: it reads the current
/// value and hands back a successor for the persistence layer to store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMemoryState {
  #[serde(default)]
  pub lifecycle_state: LifecycleState,
  /// Normalized difficulty, 0 = easiest, 1 = hardest
  #[serde(default)]
  pub difficulty: f64,
  /// Days until retrievability decays to the target retention
  #[serde(default)]
  pub stability: f64,
  /// Estimated recall probability at the last review
  #[serde(default)]
  pub retrievability: f64,
  #[serde(default)]
  pub elapsed_days: u32,
  #[serde(default)]
  pub scheduled_days: u32,
  // Only set while Learning/Relearning
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scheduled_in_minutes: Option<u32>,
  #[serde(default)]
  pub step_index: usize,
  #[serde(default)]
  pub reps: u32,
  #[serde(default)]
  pub lapses: u32,
  #[serde(default)]
  pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Default for CardMemoryState {
  fn default() -> Self {
    Self::new()
  }
}

impl CardMemoryState {
  /// A never-reviewed card
  pub fn new() -> Self {
    Self {
      lifecycle_state: LifecycleState::New,
      difficulty: 0.0,
      stability: 0.0,
      retrievability: 0.0,
      elapsed_days: 0,
      scheduled_days: 0,
      scheduled_in_minutes: None,
      step_index: 0,
      reps: 0,
      lapses: 0,
      last_reviewed_at: None,
    }
  }

  /// When the card next becomes due.
  ///
  /// `None` for cards with no recorded review (due immediately) and for waits
  /// that run past the end of the calendar.
  pub fn due_at(&self) -> Option<DateTime<Utc>> {
    let last = self.last_reviewed_at?;
    let wait = match self.scheduled_in_minutes {
      Some(minutes) if self.lifecycle_state.is_stepping() => Duration::minutes(i64::from(minutes)),
      _ => Duration::days(i64::from(self.scheduled_days)),
    };
    last.checked_add_signed(wait)
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    if self.last_reviewed_at.is_none() {
      return true;
    }
    self.due_at().is_some_and(|due| due <= now)
  }
}
