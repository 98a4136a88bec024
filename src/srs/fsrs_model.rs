//! FSRS memory model backed by `rs-fsrs`.
//!
//! Card difficulty is persisted normalized to [0,1]; FSRS works on a [1,10]
//! scale, so values are mapped on the way in and out.

use chrono::{DateTime, Utc};
use rs_fsrs::{Card, Parameters, Rating as FsrsRating, State, FSRS};

use super::memory_model::{MemoryModel, ModelOutcome};
use super::SchedulerError;
use crate::config::SchedulerParams;
use crate::domain::{CardMemoryState, LifecycleState, Rating};

const FSRS_MIN_DIFFICULTY: f64 = 1.0;
const FSRS_MAX_DIFFICULTY: f64 = 10.0;
/// Floor applied to stored stability before it reaches the forgetting curve
const MIN_STABILITY: f64 = 0.01;

// Forgetting curve constants (FSRS-4.5/5): R(t) = (1 + FACTOR * t / S) ^ DECAY
const DECAY: f64 = -0.5;
const FACTOR: f64 = 19.0 / 81.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub struct FsrsModel {
  fsrs: FSRS,
}

impl FsrsModel {
  pub fn new(params: &SchedulerParams) -> Self {
    let parameters = Parameters {
      request_retention: params.desired_retention,
      maximum_interval: i32::try_from(params.maximum_interval).unwrap_or(i32::MAX),
      ..Default::default()
    };
    Self {
      fsrs: FSRS::new(parameters),
    }
  }
}

impl Default for FsrsModel {
  fn default() -> Self {
    Self::new(&SchedulerParams::default())
  }
}

impl std::fmt::Debug for FsrsModel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FsrsModel").finish_non_exhaustive()
  }
}

impl MemoryModel for FsrsModel {
  fn next_state(
    &self,
    card: &CardMemoryState,
    rating: Rating,
    now: DateTime<Utc>,
  ) -> Result<ModelOutcome, SchedulerError> {
    let input = to_fsrs_card(card, now)?;
    let retrievability = retrievability_at(card, now);

    let record_log = self.fsrs.repeat(input, now);
    let scheduled = &record_log[&to_fsrs_rating(rating)];
    let next = &scheduled.card;

    if !next.stability.is_finite() || !next.difficulty.is_finite() {
      return Err(SchedulerError::Model(format!(
        "non-finite memory state (stability {}, difficulty {})",
        next.stability, next.difficulty
      )));
    }

    let interval_days = (next.due - now).num_seconds().max(0) as f64 / SECONDS_PER_DAY;

    Ok(ModelOutcome {
      difficulty: normalize_difficulty(next.difficulty),
      stability: next.stability,
      retrievability,
      state: from_fsrs_state(next.state),
      interval_days,
    })
  }
}

fn to_fsrs_card(card: &CardMemoryState, now: DateTime<Utc>) -> Result<Card, SchedulerError> {
  let mut fsrs_card = Card::new();
  if card.lifecycle_state == LifecycleState::New {
    return Ok(fsrs_card);
  }

  let last_review = card
    .last_reviewed_at
    .ok_or(SchedulerError::MissingLastReview(card.lifecycle_state))?;

  fsrs_card.state = to_fsrs_state(card.lifecycle_state);
  fsrs_card.stability = card.stability.max(MIN_STABILITY);
  fsrs_card.difficulty = denormalize_difficulty(card.difficulty);
  // A review stamped in the future (clock skew) counts as happening now
  fsrs_card.last_review = last_review.min(now);
  fsrs_card.due = card.due_at().unwrap_or(now);
  Ok(fsrs_card)
}

/// Recall probability at the moment of this review
fn retrievability_at(card: &CardMemoryState, now: DateTime<Utc>) -> f64 {
  if card.lifecycle_state == LifecycleState::New {
    return 0.0;
  }
  let Some(last_review) = card.last_reviewed_at else {
    return 0.0;
  };
  let elapsed_days = (now - last_review).num_seconds().max(0) as f64 / SECONDS_PER_DAY;
  forgetting_curve(elapsed_days, card.stability.max(MIN_STABILITY))
}

pub(crate) fn forgetting_curve(elapsed_days: f64, stability: f64) -> f64 {
  (1.0 + FACTOR * elapsed_days / stability).powf(DECAY).clamp(0.0, 1.0)
}

fn normalize_difficulty(native: f64) -> f64 {
  ((native - FSRS_MIN_DIFFICULTY) / (FSRS_MAX_DIFFICULTY - FSRS_MIN_DIFFICULTY)).clamp(0.0, 1.0)
}

fn denormalize_difficulty(normalized: f64) -> f64 {
  FSRS_MIN_DIFFICULTY + normalized.clamp(0.0, 1.0) * (FSRS_MAX_DIFFICULTY - FSRS_MIN_DIFFICULTY)
}

fn to_fsrs_rating(rating: Rating) -> FsrsRating {
  match rating {
    Rating::Again => FsrsRating::Again,
    Rating::Hard => FsrsRating::Hard,
    Rating::Good => FsrsRating::Good,
    Rating::Easy => FsrsRating::Easy,
  }
}

fn to_fsrs_state(state: LifecycleState) -> State {
  match state {
    LifecycleState::New => State::New,
    LifecycleState::Learning => State::Learning,
    LifecycleState::Review => State::Review,
    LifecycleState::Relearning => State::Relearning,
  }
}

fn from_fsrs_state(state: State) -> LifecycleState {
  match state {
    State::New => LifecycleState::New,
    State::Learning => LifecycleState::Learning,
    State::Review => LifecycleState::Review,
    State::Relearning => LifecycleState::Relearning,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
  }

  fn review_card(stability: f64, days_ago: i64) -> CardMemoryState {
    CardMemoryState {
      lifecycle_state: LifecycleState::Review,
      difficulty: 0.5,
      stability,
      scheduled_days: days_ago as u32,
      reps: 4,
      last_reviewed_at: Some(now() - Duration::days(days_ago)),
      ..CardMemoryState::new()
    }
  }

  #[test]
  fn test_difficulty_mapping() {
    assert!((normalize_difficulty(1.0) - 0.0).abs() < 1e-9);
    assert!((normalize_difficulty(10.0) - 1.0).abs() < 1e-9);
    assert!((normalize_difficulty(5.5) - 0.5).abs() < 1e-9);
    assert!((denormalize_difficulty(0.5) - 5.5).abs() < 1e-9);
    // Out of range values are pinned to the scale ends
    assert!((normalize_difficulty(12.0) - 1.0).abs() < 1e-9);
    assert!((denormalize_difficulty(-0.3) - 1.0).abs() < 1e-9);
  }

  #[test]
  fn test_forgetting_curve_hits_target_at_stability() {
    // By definition R(S) = 0.9
    let r = forgetting_curve(7.0, 7.0);
    assert!((r - 0.9).abs() < 1e-9, "got {}", r);
    assert!((forgetting_curve(0.0, 3.0) - 1.0).abs() < 1e-9);
    assert!(forgetting_curve(30.0, 3.0) < forgetting_curve(3.0, 3.0));
  }

  #[test]
  fn test_new_card_retrievability_is_zero() {
    let model = FsrsModel::default();
    let outcome = model.next_state(&CardMemoryState::new(), Rating::Good, now()).unwrap();
    assert_eq!(outcome.retrievability, 0.0);
    assert!(outcome.stability > 0.0);
    assert!((0.0..=1.0).contains(&outcome.difficulty));
  }

  #[test]
  fn test_new_card_again_stays_in_learning() {
    let model = FsrsModel::default();
    let outcome = model.next_state(&CardMemoryState::new(), Rating::Again, now()).unwrap();
    assert_eq!(outcome.state, LifecycleState::Learning);
  }

  #[test]
  fn test_review_card_again_relearns() {
    let model = FsrsModel::default();
    let card = review_card(20.0, 20);
    let outcome = model.next_state(&card, Rating::Again, now()).unwrap();

    assert_eq!(outcome.state, LifecycleState::Relearning);
    assert!(outcome.stability < card.stability);
  }

  #[test]
  fn test_review_card_good_grows_stability() {
    let model = FsrsModel::default();
    let card = review_card(10.0, 10);
    let outcome = model.next_state(&card, Rating::Good, now()).unwrap();

    assert_eq!(outcome.state, LifecycleState::Review);
    assert!(outcome.stability > card.stability);
    assert!(outcome.interval_days > 10.0);
    assert!((outcome.retrievability - 0.9).abs() < 1e-6);
  }

  #[test]
  fn test_review_intervals_ordered_by_rating() {
    let model = FsrsModel::default();
    let card = review_card(10.0, 10);
    let hard = model.next_state(&card, Rating::Hard, now()).unwrap();
    let good = model.next_state(&card, Rating::Good, now()).unwrap();
    let easy = model.next_state(&card, Rating::Easy, now()).unwrap();

    assert!(hard.interval_days <= good.interval_days);
    assert!(good.interval_days < easy.interval_days);
  }

  #[test]
  fn test_model_interval_respects_maximum() {
    let params = SchedulerParams {
      maximum_interval: 5,
      ..SchedulerParams::default()
    };
    let model = FsrsModel::new(&params);
    let outcome = model.next_state(&review_card(10.0, 10), Rating::Easy, now()).unwrap();

    assert_eq!(outcome.state, LifecycleState::Review);
    assert!(outcome.interval_days <= 5.0);
  }

  #[test]
  fn test_overflowing_due_date_does_not_panic() {
    let model = FsrsModel::default();
    let card = CardMemoryState {
      scheduled_days: u32::MAX,
      ..review_card(10.0, 10)
    };
    assert!(model.next_state(&card, Rating::Good, now()).is_ok());
  }

  #[test]
  fn test_missing_last_review_rejected() {
    let model = FsrsModel::default();
    let card = CardMemoryState {
      last_reviewed_at: None,
      ..review_card(5.0, 5)
    };

    assert_eq!(
      model.next_state(&card, Rating::Good, now()),
      Err(SchedulerError::MissingLastReview(LifecycleState::Review))
    );
  }
}
