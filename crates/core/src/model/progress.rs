use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::catalog::{ALL_CATEGORY_KEY, Catalog};
use crate::model::ids::EntryId;
use crate::model::question::Mode;

//
// ─── USER PROGRESS ─────────────────────────────────────────────────────────────
//

/// Per-user mastery state.
///
/// `studied` holds ids answered correctly at least once in study mode;
/// `mistakes` holds ids whose most recent answer was wrong. A correct study
/// answer evicts the id from `mistakes`, which is what retires an entry from
/// the study pool again after a slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    studied: HashSet<EntryId>,
    mistakes: HashSet<EntryId>,
    correct_count: u64,
    total_count: u64,
    studied_by_category: HashMap<String, u32>,
    last_answer_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the entry belongs in the study pool: never studied, or wrong
    /// since it was last studied.
    #[must_use]
    pub fn is_study_eligible(&self, id: &EntryId) -> bool {
        !self.studied.contains(id) || self.mistakes.contains(id)
    }

    /// Whether the entry belongs in the review pool. Mistakes do not affect
    /// review eligibility.
    #[must_use]
    pub fn is_review_eligible(&self, id: &EntryId) -> bool {
        self.studied.contains(id)
    }

    /// Applies one answer.
    ///
    /// Counters always move; the mastery sets only move as the mode and
    /// outcome dictate. `origin_category` must be the answered entry's own
    /// category key, not the (possibly `"all"`) category of the round.
    ///
    /// Returns `true` when this answer studied the entry for the first time,
    /// i.e. the per-category counter was bumped.
    pub fn record_answer(
        &mut self,
        entry_id: &EntryId,
        origin_category: &str,
        mode: Mode,
        correct: bool,
        now: DateTime<Utc>,
    ) -> bool {
        self.total_count += 1;
        self.last_answer_at = Some(now);

        if !correct {
            self.mistakes.insert(entry_id.clone());
            return false;
        }

        self.correct_count += 1;
        if mode != Mode::Study {
            return false;
        }

        self.mistakes.remove(entry_id);
        let first_study = self.studied.insert(entry_id.clone());
        if first_study {
            *self
                .studied_by_category
                .entry(origin_category.to_owned())
                .or_insert(0) += 1;
        }
        first_study
    }

    #[must_use]
    pub fn studied_count(&self) -> usize {
        self.studied.len()
    }

    #[must_use]
    pub fn mistake_count(&self) -> usize {
        self.mistakes.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> u64 {
        self.correct_count
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// First-study count for one category key.
    #[must_use]
    pub fn studied_in(&self, category_key: &str) -> u32 {
        self.studied_by_category
            .get(category_key)
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn last_answer_at(&self) -> Option<DateTime<Utc>> {
        self.last_answer_at
    }

    /// Read-only aggregate for reporting; does not mutate state.
    #[must_use]
    pub fn snapshot(&self, catalog: &Catalog) -> ProgressSnapshot {
        let per_category = catalog
            .categories()
            .into_iter()
            .filter(|info| info.key != ALL_CATEGORY_KEY)
            .map(|info| CategoryProgress {
                studied: self.studied_in(&info.key),
                total: catalog.entries_for(&info.key).len(),
                key: info.key,
                label: info.label,
            })
            .collect();

        ProgressSnapshot {
            studied_count: self.studied.len(),
            total_entries: catalog.entry_count(),
            correct_count: self.correct_count,
            total_count: self.total_count,
            last_answer_at: self.last_answer_at,
            per_category,
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Progress of one category for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub key: String,
    pub label: String,
    pub studied: u32,
    pub total: usize,
}

/// Read-only progress summary for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub studied_count: usize,
    pub total_entries: usize,
    pub correct_count: u64,
    pub total_count: u64,
    pub last_answer_at: Option<DateTime<Utc>>,
    pub per_category: Vec<CategoryProgress>,
}

impl ProgressSnapshot {
    /// Answer accuracy as a percentage; zero when nothing was answered yet.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.correct_count as f64 / self.total_count as f64 * 100.0
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
