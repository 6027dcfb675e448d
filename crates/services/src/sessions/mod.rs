mod context;
mod generator;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use context::SessionContext;
pub use generator::{MAX_DISTRACTORS, generate};

pub(crate) use generator::random_direction;
