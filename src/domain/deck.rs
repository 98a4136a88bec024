use serde::{Deserialize, Serialize};

use crate::srs::SchedulerError;

/// Which step ladder a card is walking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ladder {
  Learning,
  Relearning,
}

impl Ladder {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Learning => "learning",
      Self::Relearning => "relearning",
    }
  }
}

/// Per-deck sub-day step ladders, in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStepConfig {
  pub learning_steps: Vec<u32>,
  pub relearning_steps: Vec<u32>,
}

impl Default for DeckStepConfig {
  fn default() -> Self {
    Self {
      learning_steps: crate::config::DEFAULT_LEARNING_STEPS.to_vec(),
      relearning_steps: crate::config::DEFAULT_RELEARNING_STEPS.to_vec(),
    }
  }
}

impl DeckStepConfig {
  pub fn new(learning_steps: Vec<u32>, relearning_steps: Vec<u32>) -> Self {
    Self {
      learning_steps,
      relearning_steps,
    }
  }

  pub fn steps(&self, ladder: Ladder) -> &[u32] {
    match ladder {
      Ladder::Learning => &self.learning_steps,
      Ladder::Relearning => &self.relearning_steps,
    }
  }

  /// Reject empty ladders and zero-minute steps.
  ///
  /// There is no fallback ladder: a deck with a broken configuration must be
  /// fixed by the caller before any review is scheduled against it.
  pub fn validate(&self) -> Result<(), SchedulerError> {
    for ladder in [Ladder::Learning, Ladder::Relearning] {
      let steps = self.steps(ladder);
      if steps.is_empty() {
        return Err(SchedulerError::EmptySteps { ladder });
      }
      if let Some(index) = steps.iter().position(|&minutes| minutes == 0) {
        return Err(SchedulerError::ZeroStep { ladder, index });
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_steps() {
    let config = DeckStepConfig::default();
    assert_eq!(config.learning_steps, vec![1, 10]);
    assert_eq!(config.relearning_steps, vec![10]);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_steps_selects_ladder() {
    let config = DeckStepConfig::new(vec![1, 5, 15], vec![20]);
    assert_eq!(config.steps(Ladder::Learning), &[1, 5, 15]);
    assert_eq!(config.steps(Ladder::Relearning), &[20]);
  }

  #[test]
  fn test_empty_learning_steps_rejected() {
    let config = DeckStepConfig::new(vec![], vec![10]);
    assert_eq!(
      config.validate(),
      Err(SchedulerError::EmptySteps { ladder: Ladder::Learning })
    );
  }

  #[test]
  fn test_empty_relearning_steps_rejected() {
    let config = DeckStepConfig::new(vec![1], vec![]);
    assert_eq!(
      config.validate(),
      Err(SchedulerError::EmptySteps { ladder: Ladder::Relearning })
    );
  }

  #[test]
  fn test_zero_minute_step_rejected() {
    let config = DeckStepConfig::new(vec![1, 0, 10], vec![10]);
    assert_eq!(
      config.validate(),
      Err(SchedulerError::ZeroStep { ladder: Ladder::Learning, index: 1 })
    );
  }

  #[test]
  fn test_deserialize_from_json() {
    let config: DeckStepConfig =
      serde_json::from_str(r#"{"learning_steps":[1,10,60],"relearning_steps":[10]}"#).unwrap();
    assert_eq!(config.learning_steps, vec![1, 10, 60]);
  }

  #[test]
  fn test_negative_step_fails_to_parse() {
    let parsed: Result<DeckStepConfig, _> =
      serde_json::from_str(r#"{"learning_steps":[-1],"relearning_steps":[10]}"#);
    assert!(parsed.is_err());
  }
}
