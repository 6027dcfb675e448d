use async_trait::async_trait;
use quiz_core::model::{UserId, UserProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-user progress.
///
/// The engine keeps the authoritative state in memory; a repository only has
/// to load it on first access and absorb write-throughs. A failure here must
/// never corrupt in-memory state, so implementations get a read-only
/// reference on save.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored progress for a user, `None` when the user is new.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached or the stored
    /// data does not deserialize.
    async fn load(&self, user_id: UserId) -> Result<Option<UserProgress>, StorageError>;

    /// Persist the full progress state for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn save(&self, user_id: UserId, progress: &UserProgress) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressRepository {
    records: Arc<Mutex<HashMap<UserId, UserProgress>>>,
}

impl InMemoryProgressRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn load(&self, user_id: UserId) -> Result<Option<UserProgress>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.get(&user_id).cloned())
    }

    async fn save(&self, user_id: UserId, progress: &UserProgress) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.insert(user_id, progress.clone());
        Ok(())
    }
}

/// Aggregates storage adapters behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryProgressRepository::new()),
        }
    }
}
