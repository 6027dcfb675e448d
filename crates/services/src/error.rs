//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionError;
use storage::repository::StorageError;

/// Errors emitted by the quiz engine and its session layer.
///
/// An exhausted eligibility pool is deliberately *not* represented here; it
/// is a normal terminal state surfaced as `RoundStart::Exhausted`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// An answer arrived with no outstanding round, e.g. a duplicate
    /// delivery of the same answer. Nothing is scored.
    #[error("no active question for this user")]
    NoActiveQuestion,

    /// The submitted choice index does not resolve against the posed
    /// question. The round stays open and nothing is scored.
    #[error("choice index {index} out of range for {len} choices")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
