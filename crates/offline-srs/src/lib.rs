//! WASM module for offline study mode.
//!
//! Lets the mobile client schedule reviews without a connection; the resulting
//! card states are uploaded with the session's recordings on the next sync.

use chrono::{DateTime, Utc};
use langdeck::srs::{Scheduler, SchedulerError};
use langdeck::{CardMemoryState, DeckStepConfig, Rating, SchedulerParams};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

/// Everything that can go wrong between the JSON boundary and the scheduler
#[derive(Debug)]
enum OfflineError {
    Parse(&'static str, String),
    Rating(u8),
    Schedule(SchedulerError),
}

impl std::fmt::Display for OfflineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfflineError::Parse(what, err) => write!(f, "Failed to parse {}: {}", what, err),
            OfflineError::Rating(value) => write!(f, "Unknown rating {}, expected 1-4", value),
            OfflineError::Schedule(err) => write!(f, "{}", err),
        }
    }
}

fn parse_inputs(
    card_json: &str,
    steps_json: &str,
    now_rfc3339: &str,
) -> Result<(CardMemoryState, DeckStepConfig, DateTime<Utc>), OfflineError> {
    let card: CardMemoryState =
        serde_json::from_str(card_json).map_err(|e| OfflineError::Parse("card state", e.to_string()))?;
    let steps: DeckStepConfig =
        serde_json::from_str(steps_json).map_err(|e| OfflineError::Parse("step config", e.to_string()))?;
    let now = DateTime::parse_from_rfc3339(now_rfc3339)
        .map_err(|e| OfflineError::Parse("review time", e.to_string()))?
        .with_timezone(&Utc);
    Ok((card, steps, now))
}

fn offline_scheduler(enable_fuzz: bool) -> Result<Scheduler, OfflineError> {
    let params = SchedulerParams {
        enable_fuzz,
        ..SchedulerParams::default()
    };
    Scheduler::new(params).map_err(OfflineError::Schedule)
}

fn schedule_internal(
    card_json: &str,
    rating: u8,
    steps_json: &str,
    now_rfc3339: &str,
    enable_fuzz: bool,
) -> Result<CardMemoryState, OfflineError> {
    let rating = Rating::from_u8(rating).ok_or(OfflineError::Rating(rating))?;
    let (card, steps, now) = parse_inputs(card_json, steps_json, now_rfc3339)?;
    offline_scheduler(enable_fuzz)?
        .schedule_review(&card, rating, &steps, now)
        .map_err(OfflineError::Schedule)
}

fn to_json<T: Serialize>(result: Result<T, OfflineError>) -> String {
    let value = result.and_then(|value| {
        serde_json::to_string(&value).map_err(|e| OfflineError::Parse("result", e.to_string()))
    });
    match value {
        Ok(json) => json,
        Err(e) => {
            let user_message = match &e {
                OfflineError::Schedule(err) => err.user_message(),
                _ => "Could not schedule the next review",
            };
            serde_json::json!({
                "error": e.to_string(),
                "user_message": user_message,
            })
            .to_string()
        }
    }
}

// ============================================================================
// WASM Exports
// ============================================================================

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();
}

/// Calculate the next memory state for a card.
///
/// card_json: the persisted card state
/// rating: 1=Again, 2=Hard, 3=Good, 4=Easy
/// steps_json: {"learning_steps": [...], "relearning_steps": [...]} in minutes
/// now_rfc3339: review time
///
/// Returns the new card state as JSON, or {"error", "user_message"}.
#[wasm_bindgen]
pub fn schedule_review_json(
    card_json: &str,
    rating: u8,
    steps_json: &str,
    now_rfc3339: &str,
    enable_fuzz: bool,
) -> String {
    to_json(schedule_internal(card_json, rating, steps_json, now_rfc3339, enable_fuzz))
}

/// Preview all four ratings for the rating buttons
#[wasm_bindgen]
pub fn preview_json(card_json: &str, steps_json: &str, now_rfc3339: &str) -> String {
    let preview = parse_inputs(card_json, steps_json, now_rfc3339).and_then(|(card, steps, now)| {
        offline_scheduler(true)?
            .preview(&card, &steps, now)
            .map_err(OfflineError::Schedule)
    });
    to_json(preview)
}

// ============================================================================
// Tests
// ============================================================================
