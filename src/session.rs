//! Review queue for a single study session.
//!
//! A card rated Again goes to the back of the queue so it comes around again
//! before the session ends; any other rating takes it out of the session.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::domain::{CardMemoryState, Rating};

#[derive(Debug, Clone)]
pub struct ReviewQueue<Id> {
  queue: VecDeque<Id>,
  /// Cards answered with something other than Again
  completed: usize,
}

impl<Id> Default for ReviewQueue<Id> {
  fn default() -> Self {
    Self {
      queue: VecDeque::new(),
      completed: 0,
    }
  }
}

impl<Id: Clone + PartialEq> ReviewQueue<Id> {
  pub fn new(card_ids: impl IntoIterator<Item = Id>) -> Self {
    let mut queue = Self::default();
    for id in card_ids {
      queue.push(id);
    }
    queue
  }

  /// Build a session from the cards that are due at `now`, in the given order
  pub fn from_due<'a>(
    cards: impl IntoIterator<Item = (Id, &'a CardMemoryState)>,
    now: DateTime<Utc>,
  ) -> Self {
    Self::new(
      cards
        .into_iter()
        .filter(|(_, state)| state.is_due(now))
        .map(|(id, _)| id),
    )
  }

  /// Add a card unless it is already queued
  pub fn push(&mut self, card_id: Id) {
    if !self.queue.contains(&card_id) {
      self.queue.push_back(card_id);
    }
  }

  /// Card currently at the front of the session
  pub fn next_card(&self) -> Option<&Id> {
    self.queue.front()
  }

  /// Record a rating for `card_id`: Again requeues at the back, anything else
  /// finishes the card for this session
  pub fn record(&mut self, card_id: &Id, rating: Rating) {
    let Some(id) = self
      .queue
      .iter()
      .position(|id| id == card_id)
      .and_then(|pos| self.queue.remove(pos))
    else {
      tracing::debug!("Rating recorded for a card not in the session queue");
      return;
    };
    if rating.is_lapse() {
      self.queue.push_back(id);
    } else {
      self.completed += 1;
    }
  }

  pub fn remaining(&self) -> usize {
    self.queue.len()
  }

  pub fn completed(&self) -> usize {
    self.completed
  }

  pub fn is_finished(&self) -> bool {
    self.queue.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::LifecycleState;
  use chrono::{Duration, TimeZone};

  #[test]
  fn test_new_queue_skips_duplicates() {
    let queue = ReviewQueue::new([1, 2, 2, 3]);
    assert_eq!(queue.remaining(), 3);
    assert_eq!(queue.next_card(), Some(&1));
  }

  #[test]
  fn test_again_moves_card_to_back() {
    let mut queue = ReviewQueue::new([1, 2, 3]);
    queue.record(&1, Rating::Again);

    assert_eq!(queue.next_card(), Some(&2));
    assert_eq!(queue.remaining(), 3);
    assert_eq!(queue.completed(), 0);
  }

  #[test]
  fn test_other_ratings_finish_card() {
    let mut queue = ReviewQueue::new(["a", "b"]);
    queue.record(&"a", Rating::Hard);
    queue.record(&"b", Rating::Easy);

    assert!(queue.is_finished());
    assert_eq!(queue.completed(), 2);
    assert_eq!(queue.next_card(), None);
  }

  #[test]
  fn test_single_card_again_comes_straight_back() {
    let mut queue = ReviewQueue::new([7]);
    queue.record(&7, Rating::Again);
    assert_eq!(queue.next_card(), Some(&7));
    queue.record(&7, Rating::Good);
    assert!(queue.is_finished());
  }

  #[test]
  fn test_again_from_middle_of_queue() {
    let mut queue = ReviewQueue::new([1, 2, 3]);
    queue.record(&2, Rating::Again);
    queue.record(&1, Rating::Good);

    assert_eq!(queue.next_card(), Some(&3));
    queue.record(&3, Rating::Good);
    assert_eq!(queue.next_card(), Some(&2));
    assert_eq!(queue.completed(), 2);
  }

  #[test]
  fn test_unknown_card_is_ignored() {
    let mut queue = ReviewQueue::new([1]);
    queue.record(&99, Rating::Good);
    assert_eq!(queue.remaining(), 1);
    assert_eq!(queue.completed(), 0);
  }

  #[test]
  fn test_from_due_filters_future_cards() {
    let now = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap();
    let fresh = CardMemoryState::new();
    let due = CardMemoryState {
      lifecycle_state: LifecycleState::Review,
      scheduled_days: 2,
      last_reviewed_at: Some(now - Duration::days(3)),
      ..CardMemoryState::new()
    };
    let not_due = CardMemoryState {
      lifecycle_state: LifecycleState::Learning,
      scheduled_in_minutes: Some(10),
      last_reviewed_at: Some(now - Duration::minutes(5)),
      ..CardMemoryState::new()
    };

    let queue = ReviewQueue::from_due([(1, &fresh), (2, &due), (3, &not_due)], now);
    assert_eq!(queue.remaining(), 2);
    assert_eq!(queue.next_card(), Some(&1));
  }
}
