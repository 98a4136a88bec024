pub mod error;
pub mod fsrs_model;
pub mod fuzz;
pub mod memory_model;
pub mod preview;
pub mod scheduler;
pub mod steps;

pub use error::SchedulerError;
pub use fsrs_model::FsrsModel;
pub use memory_model::{MemoryModel, ModelOutcome};
pub use preview::{format_interval, RatingPreview, ReviewPreview};
pub use scheduler::{schedule_review, Scheduler};
pub use steps::StepOutcome;
