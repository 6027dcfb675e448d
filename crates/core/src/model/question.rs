use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::entry::IdiomEntry;
use crate::model::ids::EntryId;

//
// ─── MODE AND DIRECTION ────────────────────────────────────────────────────────
//

/// Which pool a quiz round draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Entries not yet mastered, plus entries answered wrong since.
    Study,
    /// Entries already mastered.
    Review,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Study => "study",
            Mode::Review => "review",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which field is shown as the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// English idiom shown, meanings offered as choices.
    Forward,
    /// Meaning shown, English idioms offered as choices.
    Reverse,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One posed multiple-choice round.
///
/// The choice list is fixed once constructed; the correct value is guaranteed
/// to appear exactly once among the choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    category_key: String,
    entry_id: EntryId,
    entry_category: String,
    mode: Mode,
    direction: Direction,
    prompt: String,
    choices: Vec<String>,
    correct_value: String,
    explanation: Option<String>,
}

impl Question {
    /// Assembles a question for the given entry.
    ///
    /// `category_key` is the category the round was requested under (possibly
    /// `"all"`); the entry keeps its own origin category for scoring.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the choice list is empty or the correct
    /// value does not appear in it exactly once.
    pub fn new(
        category_key: impl Into<String>,
        entry: &IdiomEntry,
        mode: Mode,
        direction: Direction,
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_value: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let correct_value = correct_value.into();
        if choices.is_empty() {
            return Err(QuestionError::NoChoices);
        }
        let occurrences = choices
            .iter()
            .filter(|choice| **choice == correct_value)
            .count();
        if occurrences != 1 {
            return Err(QuestionError::CorrectValueCount { count: occurrences });
        }

        Ok(Self {
            category_key: category_key.into(),
            entry_id: entry.id().clone(),
            entry_category: entry.category_key().to_owned(),
            mode,
            direction,
            prompt: prompt.into(),
            choices,
            correct_value,
            explanation: entry.example().map(str::to_owned),
        })
    }

    /// The category key the round was requested under.
    #[must_use]
    pub fn category_key(&self) -> &str {
        &self.category_key
    }

    /// The id of the entry being asked about.
    #[must_use]
    pub fn entry_id(&self) -> &EntryId {
        &self.entry_id
    }

    /// The asked entry's own origin category.
    #[must_use]
    pub fn entry_category(&self) -> &str {
        &self.entry_category
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Returns the choice at `index`, if in range.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    /// Whether the choice at `index` is the correct one; `None` if out of range.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> Option<bool> {
        self.choice(index).map(|choice| choice == self.correct_value)
    }

    #[must_use]
    pub fn correct_value(&self) -> &str {
        &self.correct_value
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no choices")]
    NoChoices,

    #[error("correct value appears {count} times among the choices")]
    CorrectValueCount { count: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
