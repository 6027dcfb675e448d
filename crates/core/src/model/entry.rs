use thiserror::Error;

use crate::model::ids::EntryId;

//
// ─── ENTRY TYPES ───────────────────────────────────────────────────────────────
//

/// Unvalidated idiom data as supplied by a catalog source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub phrase: String,
    pub meaning: String,
    pub example: Option<String>,
}

impl EntryDraft {
    #[must_use]
    pub fn new(
        phrase: impl Into<String>,
        meaning: impl Into<String>,
        example: Option<String>,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            meaning: meaning.into(),
            example,
        }
    }

    /// Validates the draft and tags it with its origin category.
    ///
    /// Text fields are trimmed; a blank example collapses to `None`.
    ///
    /// # Errors
    ///
    /// Returns `EntryError` if the phrase or meaning is blank.
    pub fn validate(&self, category_key: &str) -> Result<IdiomEntry, EntryError> {
        let phrase = self.phrase.trim();
        if phrase.is_empty() {
            return Err(EntryError::BlankPhrase);
        }
        let meaning = self.meaning.trim();
        if meaning.is_empty() {
            return Err(EntryError::BlankMeaning);
        }
        let example = self
            .example
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);

        Ok(IdiomEntry {
            id: EntryId::from_phrase(phrase),
            phrase: phrase.to_owned(),
            meaning: meaning.to_owned(),
            example,
            category_key: category_key.to_owned(),
        })
    }
}

/// One idiom with its meaning, optional usage example and origin category.
///
/// Immutable after construction. The origin category is set exactly once,
/// including for the copies living in the aggregate "all" category, so the
/// same entry is never retagged depending on how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdiomEntry {
    id: EntryId,
    phrase: String,
    meaning: String,
    example: Option<String>,
    category_key: String,
}

impl IdiomEntry {
    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// The English idiom text.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The translation/gloss shown as the meaning.
    #[must_use]
    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    #[must_use]
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// The key of the category this entry was loaded under.
    #[must_use]
    pub fn category_key(&self) -> &str {
        &self.category_key
    }
}

//
// ─── ENTRY VALIDATION ERRORS ───────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("idiom phrase is blank")]
    BlankPhrase,

    #[error("idiom meaning is blank")]
    BlankMeaning,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
