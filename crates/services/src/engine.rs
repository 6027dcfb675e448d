use std::sync::Arc;
use tracing::debug;

use quiz_core::model::{Direction, Mode, ProgressSnapshot, Question, UserId};
use quiz_core::{Catalog, CategoryInfo, Clock};
use storage::repository::ProgressRepository;

use crate::error::SessionError;
use crate::progress_store::ProgressStore;
use crate::random::RngSource;
use crate::sessions::{SessionContext, generate, random_direction};

//
// ─── ROUND RESULTS ─────────────────────────────────────────────────────────────
//

/// Result of starting a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStart {
    /// A question was posed and is awaiting an answer.
    Posed(Question),
    /// Nothing is eligible for this mode/category; a normal terminal state,
    /// not a failure.
    Exhausted { mode: Mode },
}

/// Result of answering a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Front door of the quiz engine.
///
/// Ties the catalog, progress store, session registry, clock and randomness
/// together behind the contract a hosting collaborator (chat transport, CLI,
/// UI) drives: list categories, start a round, submit an answer, report
/// progress. The engine is passive; it never calls out.
#[derive(Clone)]
pub struct QuizEngine {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressStore>,
    sessions: Arc<SessionContext>,
    rng: RngSource,
    clock: Clock,
}

impl QuizEngine {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            progress: Arc::new(ProgressStore::new(Arc::clone(&catalog))),
            sessions: Arc::new(SessionContext::new()),
            rng: RngSource::entropy(),
            clock: Clock::default(),
            catalog,
        }
    }

    /// Attach a progress repository for lazy loads and write-throughs.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn ProgressRepository>) -> Self {
        self.progress = Arc::new(
            ProgressStore::new(Arc::clone(&self.catalog)).with_repository(repository),
        );
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: RngSource) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Ordered category listing, the derived `"all"` aggregate last.
    #[must_use]
    pub fn list_categories(&self) -> Vec<CategoryInfo> {
        self.catalog.categories()
    }

    /// Whether the user has a round awaiting an answer.
    #[must_use]
    pub fn has_pending_round(&self, user_id: UserId) -> bool {
        self.sessions.has_pending(user_id)
    }

    /// Starts a round, superseding any outstanding one for the user.
    ///
    /// A `None` direction is resolved by a fair coin flip — the engine owns
    /// that choice so the generator stays deterministic given its inputs.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydrating the user's progress
    /// fails; an exhausted pool is returned as `RoundStart::Exhausted`, not
    /// an error.
    pub async fn start_round(
        &self,
        user_id: UserId,
        category_key: &str,
        mode: Mode,
        direction: Option<Direction>,
    ) -> Result<RoundStart, SessionError> {
        let direction = direction.unwrap_or_else(|| self.rng.with(|rng| random_direction(rng)));

        let generated = self
            .progress
            .with_progress(user_id, |progress| {
                self.rng.with(|rng| {
                    generate(&self.catalog, progress, category_key, mode, direction, rng)
                })
            })
            .await??;

        match generated {
            Some(question) => {
                debug!(user = %user_id, category = category_key, %mode, %direction, "round posed");
                self.sessions.pose(user_id, question.clone());
                Ok(RoundStart::Posed(question))
            }
            None => {
                debug!(user = %user_id, category = category_key, %mode, "pool exhausted");
                self.sessions.clear(user_id);
                Ok(RoundStart::Exhausted { mode })
            }
        }
    }

    /// Scores the answer to the user's outstanding round.
    ///
    /// The round is consumed before scoring, so a duplicate delivery of the
    /// same answer cannot double-count.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveQuestion` with no outstanding round,
    /// `SessionError::IndexOutOfRange` for an invalid index (the round stays
    /// open, nothing is scored), or `SessionError::Storage` if the progress
    /// write-through fails (the answer is still applied in memory).
    pub async fn submit_answer(
        &self,
        user_id: UserId,
        choice_index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        let (question, correct) = self.sessions.take_answer(user_id, choice_index)?;
        debug!(user = %user_id, entry = %question.entry_id(), correct, "answer scored");

        self.progress
            .record_answer(
                user_id,
                question.entry_id(),
                question.entry_category(),
                question.mode(),
                correct,
                self.clock.now(),
            )
            .await?;

        Ok(AnswerOutcome {
            correct,
            correct_answer: question.correct_value().to_owned(),
            explanation: question.explanation().map(str::to_owned),
        })
    }

    /// Drops any outstanding round, returning the user to an idle state.
    pub fn end_session(&self, user_id: UserId) {
        self.sessions.clear(user_id);
    }

    /// Read-only progress summary for the user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydrating the user's progress
    /// fails.
    pub async fn snapshot(&self, user_id: UserId) -> Result<ProgressSnapshot, SessionError> {
        self.progress.snapshot(user_id).await
    }

    /// Study/review pools, exposed for collaborators that want to show
    /// "n left" style counters.
    #[must_use]
    pub fn progress_store(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
