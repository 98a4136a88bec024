use chrono::{DateTime, Utc};

use super::fsrs_model::FsrsModel;
use super::fuzz::{fuzz_interval, review_seed, whole_days};
use super::memory_model::{MemoryModel, ModelOutcome};
use super::preview::{format_interval, RatingPreview, ReviewPreview};
use super::steps::{ladder_state, next_step, select_ladder, StepOutcome};
use super::SchedulerError;
use crate::config::{SchedulerConfig, SchedulerParams};
use crate::domain::{CardMemoryState, DeckStepConfig, Ladder, LifecycleState, Rating};

/// Review scheduler: memory model plus step ladders.
///
/// Immutable after construction, so one instance can serve every study session
/// concurrently.
#[derive(Debug)]
pub struct Scheduler<M = FsrsModel> {
  params: SchedulerParams,
  model: M,
}

impl Scheduler<FsrsModel> {
  /// Scheduler over FSRS; rejects retention outside (0, 1) and a zero
  /// maximum interval
  pub fn new(params: SchedulerParams) -> Result<Self, SchedulerError> {
    check_params(&params)?;
    Ok(Self {
      model: FsrsModel::new(&params),
      params,
    })
  }

  pub fn from_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
    Self::new(config.params)
  }
}

impl Default for Scheduler<FsrsModel> {
  fn default() -> Self {
    let params = SchedulerParams::default();
    Self {
      model: FsrsModel::new(&params),
      params,
    }
  }
}

impl<M: MemoryModel> Scheduler<M> {
  /// Scheduler over a custom memory model
  pub fn with_model(params: SchedulerParams, model: M) -> Result<Self, SchedulerError> {
    check_params(&params)?;
    Ok(Self { params, model })
  }

  pub fn params(&self) -> &SchedulerParams {
    &self.params
  }

  /// Compute the state a card moves to after being rated at `now`.
  ///
  /// Cards in (or entering) learning/relearning walk the deck's step ladder:
  /// - Again: back to the first step
  /// - Hard: repeat the current step
  /// - Good: next step, or graduate to review in 1 day after the last one
  /// - Easy: graduate immediately with a 4 day interval
  ///
  /// Review cards that stay in review get the memory model's interval, fuzzed
  /// and clamped to `[1, maximum_interval]` days.
  pub fn schedule_review(
    &self,
    card: &CardMemoryState,
    rating: Rating,
    steps: &DeckStepConfig,
    now: DateTime<Utc>,
  ) -> Result<CardMemoryState, SchedulerError> {
    steps.validate()?;
    let input = sanitize(card, self.params.maximum_interval)?;
    let outcome = self.model.next_state(&input, rating, now)?;
    let difficulty = checked_outcome(&outcome)?;

    let mut next = CardMemoryState {
      difficulty,
      stability: outcome.stability,
      retrievability: outcome.retrievability.clamp(0.0, 1.0),
      elapsed_days: 0,
      reps: card.reps.saturating_add(1),
      lapses: card.lapses.saturating_add(u32::from(rating.is_lapse())),
      last_reviewed_at: Some(now),
      ..input
    };

    match select_ladder(card.lifecycle_state, outcome.state) {
      Some(ladder) => self.walk_ladder(&mut next, card.step_index, ladder, steps.steps(ladder), rating),
      None => {
        let days = self.review_interval(&outcome, card.reps, now);
        place_in_review(&mut next, days);
      }
    }

    tracing::debug!(
      "Scheduled {} card as {} ({:?}): {} -> {}",
      card.lifecycle_state.as_str(),
      rating.as_str(),
      outcome.state,
      next.lifecycle_state.as_str(),
      describe_wait(&next)
    );

    Ok(next)
  }

  /// What each of the four ratings would do to `card`
  pub fn preview(
    &self,
    card: &CardMemoryState,
    steps: &DeckStepConfig,
    now: DateTime<Utc>,
  ) -> Result<ReviewPreview, SchedulerError> {
    let preview_one = |rating: Rating| -> Result<RatingPreview, SchedulerError> {
      let next = self.schedule_review(card, rating, steps, now)?;
      Ok(RatingPreview {
        rating,
        label: format_interval(&next),
        next,
      })
    };

    Ok(ReviewPreview {
      again: preview_one(Rating::Again)?,
      hard: preview_one(Rating::Hard)?,
      good: preview_one(Rating::Good)?,
      easy: preview_one(Rating::Easy)?,
    })
  }

  fn walk_ladder(
    &self,
    next: &mut CardMemoryState,
    step_index: usize,
    ladder: Ladder,
    steps: &[u32],
    rating: Rating,
  ) {
    match next_step(step_index, steps.len(), rating) {
      StepOutcome::Step(index) => {
        next.lifecycle_state = ladder_state(ladder);
        next.step_index = index;
        next.scheduled_days = 0;
        next.scheduled_in_minutes = steps.get(index).copied();
      }
      StepOutcome::Graduate { interval_days } => {
        let days = whole_days(f64::from(interval_days), self.params.maximum_interval);
        place_in_review(next, days);
      }
    }
  }

  fn review_interval(&self, outcome: &ModelOutcome, reps: u32, now: DateTime<Utc>) -> u32 {
    let maximum = self.params.maximum_interval;
    if self.params.enable_fuzz {
      fuzz_interval(outcome.interval_days, maximum, review_seed(now, reps, outcome.stability))
    } else {
      whole_days(outcome.interval_days, maximum)
    }
  }
}

/// Schedule a review with the default FSRS model and parameters
pub fn schedule_review(
  card: &CardMemoryState,
  rating: Rating,
  steps: &DeckStepConfig,
  now: DateTime<Utc>,
) -> Result<CardMemoryState, SchedulerError> {
  Scheduler::<FsrsModel>::default().schedule_review(card, rating, steps, now)
}

fn check_params(params: &SchedulerParams) -> Result<(), SchedulerError> {
  params
    .validate()
    .map_err(|e| SchedulerError::InvalidParams(e.to_string()))
}

fn place_in_review(next: &mut CardMemoryState, days: u32) {
  next.lifecycle_state = LifecycleState::Review;
  next.scheduled_days = days;
  next.scheduled_in_minutes = None;
  next.step_index = 0;
}

/// Copy of the input with difficulty pulled back into [0,1].
///
/// Difficulty drift from storage is corrected here; anything that cannot be
/// corrected meaningfully (NaN, negative stability, an interval past the
/// configured maximum) is rejected.
fn sanitize(card: &CardMemoryState, maximum_interval: u32) -> Result<CardMemoryState, SchedulerError> {
  if !card.difficulty.is_finite() {
    return Err(SchedulerError::InvalidDifficulty(card.difficulty));
  }
  if !card.stability.is_finite() || card.stability < 0.0 {
    return Err(SchedulerError::InvalidStability(card.stability));
  }
  if card.scheduled_days > maximum_interval {
    return Err(SchedulerError::IntervalOutOfRange {
      days: card.scheduled_days,
      maximum: maximum_interval,
    });
  }

  let mut input = card.clone();
  if !(0.0..=1.0).contains(&card.difficulty) {
    tracing::warn!("Clamping stored difficulty {} into [0, 1]", card.difficulty);
    input.difficulty = card.difficulty.clamp(0.0, 1.0);
  }
  Ok(input)
}

fn checked_outcome(outcome: &ModelOutcome) -> Result<f64, SchedulerError> {
  if !outcome.stability.is_finite() || outcome.stability < 0.0 {
    return Err(SchedulerError::Model(format!("stability {} out of domain", outcome.stability)));
  }
  if !outcome.difficulty.is_finite() {
    return Err(SchedulerError::Model(format!("difficulty {} out of domain", outcome.difficulty)));
  }
  if !outcome.interval_days.is_finite() {
    return Err(SchedulerError::Model(format!("interval {} out of domain", outcome.interval_days)));
  }
  Ok(outcome.difficulty.clamp(0.0, 1.0))
}

fn describe_wait(card: &CardMemoryState) -> String {
  match card.scheduled_in_minutes {
    Some(minutes) => format!("{} min", minutes),
    None => format!("{} days", card.scheduled_days),
  }
}
