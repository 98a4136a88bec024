//! Sub-day step ladders for learning and relearning cards.

use crate::domain::{Ladder, LifecycleState, Rating};

/// Initial interval after walking off the end of a ladder
pub const GRADUATING_INTERVAL_DAYS: u32 = 1;
/// Initial interval when Easy skips the rest of the ladder
pub const EASY_INTERVAL_DAYS: u32 = 4;

/// Where a rating moves a card on its ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
  /// Stay on the ladder at this index
  Step(usize),
  /// Leave the ladder for day-granularity review
  Graduate { interval_days: u32 },
}

/// Check `next_index` against the ladder before indexing into it
pub fn advance(next_index: usize, len: usize) -> StepOutcome {
  if next_index >= len {
    StepOutcome::Graduate {
      interval_days: GRADUATING_INTERVAL_DAYS,
    }
  } else {
    StepOutcome::Step(next_index)
  }
}

/// Move a card along a ladder of `len` rungs.
///
/// `len` must be non-zero. A stored `step_index` past the end (the deck's ladder
/// was shortened since the card was last reviewed) is treated as the last rung.
pub fn next_step(step_index: usize, len: usize, rating: Rating) -> StepOutcome {
  debug_assert!(len > 0, "step ladder must not be empty");
  let current = step_index.min(len.saturating_sub(1));
  match rating {
    Rating::Again => StepOutcome::Step(0),
    Rating::Hard => StepOutcome::Step(current),
    Rating::Good => advance(current + 1, len),
    Rating::Easy => StepOutcome::Graduate {
      interval_days: EASY_INTERVAL_DAYS,
    },
  }
}

/// Which ladder governs this review, if any.
///
/// Cards still in (or entering) the sub-day phase walk a ladder; only a Review
/// card the model keeps in Review is scheduled from the model's interval.
pub fn select_ladder(current: LifecycleState, candidate: LifecycleState) -> Option<Ladder> {
  match (current, candidate) {
    (LifecycleState::Relearning, _) | (_, LifecycleState::Relearning) => Some(Ladder::Relearning),
    (LifecycleState::New | LifecycleState::Learning, _) | (_, LifecycleState::Learning) => {
      Some(Ladder::Learning)
    }
    _ => None,
  }
}

pub fn ladder_state(ladder: Ladder) -> LifecycleState {
  match ladder {
    Ladder::Learning => LifecycleState::Learning,
    Ladder::Relearning => LifecycleState::Relearning,
  }
}
