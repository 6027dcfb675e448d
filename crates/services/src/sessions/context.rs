use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use quiz_core::model::{Question, UserId};

use crate::error::SessionError;

/// Outstanding rounds, at most one per user.
///
/// Posing a new round supersedes the previous one; answering consumes the
/// round atomically, so a duplicate delivery of the same answer finds nothing
/// to score. A round that is never answered simply sits here until the next
/// round overwrites it.
#[derive(Debug, Default)]
pub struct SessionContext {
    pending: Mutex<HashMap<UserId, Question>>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, Question>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the question for the user's new round, superseding any
    /// previous one.
    pub fn pose(&self, user_id: UserId, question: Question) {
        self.lock().insert(user_id, question);
    }

    /// Whether the user has an outstanding round.
    #[must_use]
    pub fn has_pending(&self, user_id: UserId) -> bool {
        self.lock().contains_key(&user_id)
    }

    /// Drops any outstanding round for the user.
    pub fn clear(&self, user_id: UserId) {
        self.lock().remove(&user_id);
    }

    /// Resolves an answer against the outstanding round and consumes it.
    ///
    /// Returns the consumed question and whether the chosen index was
    /// correct.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveQuestion` if no round is outstanding,
    /// or `SessionError::IndexOutOfRange` for an invalid index — in that
    /// case the round stays open so the caller can retry.
    pub fn take_answer(
        &self,
        user_id: UserId,
        choice_index: usize,
    ) -> Result<(Question, bool), SessionError> {
        let mut guard = self.lock();
        match guard.entry(user_id) {
            Entry::Vacant(_) => Err(SessionError::NoActiveQuestion),
            Entry::Occupied(posed) => {
                let Some(correct) = posed.get().is_correct(choice_index) else {
                    return Err(SessionError::IndexOutOfRange {
                        index: choice_index,
                        len: posed.get().choice_count(),
                    });
                };
                Ok((posed.remove(), correct))
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
