pub mod card;
pub mod deck;
pub mod review;

pub use card::{CardMemoryState, LifecycleState};
pub use deck::{DeckStepConfig, Ladder};
pub use review::Rating;
