use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

use quiz_core::Catalog;
use quiz_core::model::{EntryId, IdiomEntry, Mode, ProgressSnapshot, UserId, UserProgress};
use storage::repository::ProgressRepository;

use crate::error::SessionError;

type ProgressCell = Arc<AsyncMutex<UserProgress>>;

/// Per-user mastery state with serialized mutation and optional write-through.
///
/// Each user gets one async-locked cell, created lazily on first access (and
/// hydrated from the repository when one is configured). The cell lock is
/// held across the write-through, so there is at most one in-flight mutation
/// per user while different users proceed in parallel.
pub struct ProgressStore {
    catalog: Arc<Catalog>,
    repository: Option<Arc<dyn ProgressRepository>>,
    users: Mutex<HashMap<UserId, ProgressCell>>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            repository: None,
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a backing repository for lazy loads and write-throughs.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn ProgressRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    fn lock_users(&self) -> MutexGuard<'_, HashMap<UserId, ProgressCell>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The user's progress cell, creating (and hydrating) it on first access.
    async fn cell(&self, user_id: UserId) -> Result<ProgressCell, SessionError> {
        if let Some(cell) = self.lock_users().get(&user_id) {
            return Ok(Arc::clone(cell));
        }

        let loaded = match &self.repository {
            Some(repository) => repository.load(user_id).await?.unwrap_or_default(),
            None => UserProgress::default(),
        };

        // Two tasks may race the load; the first insert wins and the loser's
        // copy is dropped, so both end up sharing one cell.
        let mut guard = self.lock_users();
        let cell = guard
            .entry(user_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(loaded)));
        Ok(Arc::clone(cell))
    }

    /// Runs a read-only closure against the user's progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydrating the user fails.
    pub(crate) async fn with_progress<T>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&UserProgress) -> T,
    ) -> Result<T, SessionError> {
        let cell = self.cell(user_id).await?;
        let guard = cell.lock().await;
        Ok(f(&guard))
    }

    /// Entries of the category the user still has to study: never studied,
    /// or answered wrong since.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydrating the user fails.
    pub async fn eligible_for_study(
        &self,
        user_id: UserId,
        category_key: &str,
    ) -> Result<Vec<IdiomEntry>, SessionError> {
        self.with_progress(user_id, |progress| {
            self.catalog
                .entries_for(category_key)
                .iter()
                .filter(|entry| progress.is_study_eligible(entry.id()))
                .cloned()
                .collect()
        })
        .await
    }

    /// Entries of the category the user has mastered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydrating the user fails.
    pub async fn eligible_for_review(
        &self,
        user_id: UserId,
        category_key: &str,
    ) -> Result<Vec<IdiomEntry>, SessionError> {
        self.with_progress(user_id, |progress| {
            self.catalog
                .entries_for(category_key)
                .iter()
                .filter(|entry| progress.is_review_eligible(entry.id()))
                .cloned()
                .collect()
        })
        .await
    }

    /// Applies one answer and writes the updated state through.
    ///
    /// The in-memory state keeps the answer even when the write-through
    /// fails; the storage error is surfaced to the caller.
    ///
    /// Returns `true` when this answer studied the entry for the first time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydration or the write-through
    /// fails.
    pub async fn record_answer(
        &self,
        user_id: UserId,
        entry_id: &EntryId,
        origin_category: &str,
        mode: Mode,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        let cell = self.cell(user_id).await?;
        let mut guard = cell.lock().await;
        let first_study = guard.record_answer(entry_id, origin_category, mode, correct, now);

        if let Some(repository) = &self.repository {
            repository.save(user_id, &guard).await?;
        }
        Ok(first_study)
    }

    /// Read-only progress summary for the user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if hydrating the user fails.
    pub async fn snapshot(&self, user_id: UserId) -> Result<ProgressSnapshot, SessionError> {
        self.with_progress(user_id, |progress| progress.snapshot(&self.catalog))
            .await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
