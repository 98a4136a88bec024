use serde::{Deserialize, Serialize};

/// The user's answer to a review prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
  Again = 1,
  Hard = 2,
  Good = 3,
  Easy = 4,
}

impl Rating {
  pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  /// Map a rating button value (1-4) to a rating
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      1 => Some(Self::Again),
      2 => Some(Self::Hard),
      3 => Some(Self::Good),
      4 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "again" => Some(Self::Again),
      "hard" => Some(Self::Hard),
      "good" => Some(Self::Good),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  /// Again is the only rating counted as a lapse
  pub fn is_lapse(&self) -> bool {
    matches!(self, Self::Again)
  }
}
