#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod progress_store;
pub mod random;
pub mod sessions;

pub use quiz_core::Clock;

pub use engine::{AnswerOutcome, QuizEngine, RoundStart};
pub use error::SessionError;
pub use progress_store::ProgressStore;
pub use random::RngSource;
pub use sessions::{MAX_DISTRACTORS, SessionContext, generate};
