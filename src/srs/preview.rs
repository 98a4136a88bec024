//! Interval previews shown on the rating buttons.

use serde::Serialize;

use crate::domain::{CardMemoryState, Rating};

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Outcome of a single rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPreview {
  pub rating: Rating,
  pub next: CardMemoryState,
  /// Compact wait until the next review, e.g. "10m" or "3w"
  pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPreview {
  pub again: RatingPreview,
  pub hard: RatingPreview,
  pub good: RatingPreview,
  pub easy: RatingPreview,
}

impl ReviewPreview {
  pub fn get(&self, rating: Rating) -> &RatingPreview {
    match rating {
      Rating::Again => &self.again,
      Rating::Hard => &self.hard,
      Rating::Good => &self.good,
      Rating::Easy => &self.easy,
    }
  }
}

/// Format the wait before a card's next review
pub fn format_interval(card: &CardMemoryState) -> String {
  match card.scheduled_in_minutes {
    Some(minutes) if card.lifecycle_state.is_stepping() => format_minutes(minutes),
    _ => format_days(card.scheduled_days),
  }
}

pub fn format_minutes(minutes: u32) -> String {
  if minutes < MINUTES_PER_HOUR {
    format!("{}m", minutes)
  } else if minutes < MINUTES_PER_DAY {
    format!("{}h", minutes / MINUTES_PER_HOUR)
  } else {
    format_days(minutes / MINUTES_PER_DAY)
  }
}

pub fn format_days(days: u32) -> String {
  if days == 0 {
    "now".to_string()
  } else if days < 7 {
    format!("{}d", days)
  } else if days < 30 {
    format!("{}w", days / 7)
  } else if days < 365 {
    format!("{}mo", days / 30)
  } else {
    format!("{}y", days / 365)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::LifecycleState;

  #[test]
  fn test_format_minutes() {
    assert_eq!(format_minutes(1), "1m");
    assert_eq!(format_minutes(59), "59m");
    assert_eq!(format_minutes(60), "1h");
    assert_eq!(format_minutes(240), "4h");
    assert_eq!(format_minutes(1440), "1d");
  }

  #[test]
  fn test_format_days() {
    assert_eq!(format_days(0), "now");
    assert_eq!(format_days(1), "1d");
    assert_eq!(format_days(6), "6d");
    assert_eq!(format_days(7), "1w");
    assert_eq!(format_days(21), "3w");
    assert_eq!(format_days(30), "1mo");
    assert_eq!(format_days(90), "3mo");
    assert_eq!(format_days(365), "1y");
    assert_eq!(format_days(36500), "100y");
  }

  #[test]
  fn test_format_interval_picks_unit_by_state() {
    let learning = CardMemoryState {
      lifecycle_state: LifecycleState::Learning,
      scheduled_in_minutes: Some(10),
      ..CardMemoryState::new()
    };
    assert_eq!(format_interval(&learning), "10m");

    let review = CardMemoryState {
      lifecycle_state: LifecycleState::Review,
      scheduled_days: 14,
      ..CardMemoryState::new()
    };
    assert_eq!(format_interval(&review), "2w");
  }
}
