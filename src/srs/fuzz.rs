//! Interval fuzz, so cards learned together don't stay due together.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (start, end, factor): the fuzz spread grows by `factor` per day in each range
const FUZZ_RANGES: [(f64, f64, f64); 3] = [
  (2.5, 7.0, 0.15),
  (7.0, 20.0, 0.1),
  (20.0, f64::INFINITY, 0.05),
];

/// Intervals shorter than this are never fuzzed
const MIN_FUZZ_INTERVAL: f64 = 2.5;

/// Round an interval to whole days, clamped to `[1, maximum_interval]`
pub fn whole_days(interval_days: f64, maximum_interval: u32) -> u32 {
  interval_days.round().clamp(1.0, f64::from(maximum_interval.max(1))) as u32
}

/// Spread around `interval_days` the fuzzed interval is drawn from
pub fn fuzz_range(interval_days: f64, maximum_interval: u32) -> (u32, u32) {
  let delta = 1.0
    + FUZZ_RANGES
      .iter()
      .map(|&(start, end, factor)| factor * (interval_days.min(end) - start).max(0.0))
      .sum::<f64>();

  let max_ivl = whole_days(interval_days + delta, maximum_interval);
  let min_ivl = whole_days(interval_days - delta, maximum_interval).max(2).min(max_ivl);
  (min_ivl, max_ivl)
}

/// Apply fuzz to a model interval and return whole days.
///
/// The draw comes from `seed`, so the same review always fuzzes the same way.
pub fn fuzz_interval(interval_days: f64, maximum_interval: u32, seed: u64) -> u32 {
  if interval_days < MIN_FUZZ_INTERVAL {
    return whole_days(interval_days, maximum_interval);
  }
  let (min_ivl, max_ivl) = fuzz_range(interval_days, maximum_interval);
  let mut rng = StdRng::seed_from_u64(seed);
  rng.random_range(min_ivl..=max_ivl)
}

/// Seed derived from the review itself
pub fn review_seed(now: DateTime<Utc>, reps: u32, stability: f64) -> u64 {
  (now.timestamp_millis() as u64) ^ u64::from(reps).rotate_left(32) ^ stability.to_bits()
}
