use thiserror::Error;

use std::collections::HashSet;

use crate::model::{EntryDraft, EntryError, IdiomEntry};

/// Key of the derived aggregate category spanning every concrete category.
pub const ALL_CATEGORY_KEY: &str = "all";

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// One category worth of raw idiom data, as supplied by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySource {
    pub key: String,
    pub label: String,
    pub entries: Vec<EntryDraft>,
}

impl CategorySource {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, entries: Vec<EntryDraft>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            entries,
        }
    }
}

/// Key/label pair for category listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub key: String,
    pub label: String,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
struct Category {
    key: String,
    label: String,
    entries: Vec<IdiomEntry>,
}

/// Immutable, process-lifetime collection of idiom entries grouped by
/// category, with a derived `"all"` aggregate built once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    all: Vec<IdiomEntry>,
    all_label: String,
}

impl Catalog {
    /// Builds a catalog from the given sources, in declaration order.
    ///
    /// The `"all"` aggregate is the concatenation of every concrete category
    /// in that same order, each entry keeping its origin category key. An
    /// empty source is valid and simply yields an empty category.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if a source claims the reserved `"all"` key,
    /// repeats a category key, or contains an invalid entry.
    pub fn load(
        sources: Vec<CategorySource>,
        all_label: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let mut seen_keys = HashSet::new();
        let mut categories = Vec::with_capacity(sources.len());

        for source in sources {
            if source.key == ALL_CATEGORY_KEY {
                return Err(LoadError::ReservedKey);
            }
            if !seen_keys.insert(source.key.clone()) {
                return Err(LoadError::DuplicateCategory { key: source.key });
            }

            let mut entries = Vec::with_capacity(source.entries.len());
            for draft in &source.entries {
                let entry = draft.validate(&source.key).map_err(|source_err| {
                    LoadError::Entry {
                        category: source.key.clone(),
                        source: source_err,
                    }
                })?;
                entries.push(entry);
            }

            categories.push(Category {
                key: source.key,
                label: source.label,
                entries,
            });
        }

        let all = categories
            .iter()
            .flat_map(|category| category.entries.iter().cloned())
            .collect();

        Ok(Self {
            categories,
            all,
            all_label: all_label.into(),
        })
    }

    /// Entries for the given category key, in load order.
    ///
    /// `"all"` returns the aggregate; an unknown key returns an empty slice.
    #[must_use]
    pub fn entries_for(&self, key: &str) -> &[IdiomEntry] {
        if key == ALL_CATEGORY_KEY {
            return &self.all;
        }
        self.categories
            .iter()
            .find(|category| category.key == key)
            .map_or(&[], |category| category.entries.as_slice())
    }

    /// Ordered category listing: concrete categories first, `"all"` last.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryInfo> {
        let mut listing: Vec<CategoryInfo> = self
            .categories
            .iter()
            .map(|category| CategoryInfo {
                key: category.key.clone(),
                label: category.label.clone(),
            })
            .collect();
        listing.push(CategoryInfo {
            key: ALL_CATEGORY_KEY.to_owned(),
            label: self.all_label.clone(),
        });
        listing
    }

    #[must_use]
    pub fn contains_category(&self, key: &str) -> bool {
        key == ALL_CATEGORY_KEY || self.categories.iter().any(|category| category.key == key)
    }

    /// Total number of entries across all concrete categories.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.all.len()
    }
}

//
// ─── LOAD ERRORS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("category key \"all\" is reserved for the derived aggregate")]
    ReservedKey,

    #[error("duplicate category key: {key}")]
    DuplicateCategory { key: String },

    #[error("invalid entry in category {category}: {source}")]
    Entry {
        category: String,
        #[source]
        source: EntryError,
    },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(phrase: &str, meaning: &str) -> EntryDraft {
        EntryDraft::new(phrase, meaning, None)
    }

    fn sample_sources() -> Vec<CategorySource> {
        vec![
            CategorySource::new(
                "business",
                "Business",
                vec![draft("think outside the box", "мыслить нестандартно")],
            ),
            CategorySource::new(
                "quick",
                "Quick & Easy",
                vec![
                    draft("piece of cake", "проще простого"),
                    draft("call it a day", "закончить работу"),
                ],
            ),
        ]
    }

    #[test]
    fn all_is_concatenation_in_declaration_order() {
        let catalog = Catalog::load(sample_sources(), "All").unwrap();

        let mut expected: Vec<IdiomEntry> = catalog.entries_for("business").to_vec();
        expected.extend(catalog.entries_for("quick").iter().cloned());
        assert_eq!(catalog.entries_for(ALL_CATEGORY_KEY), expected.as_slice());
        assert_eq!(catalog.entry_count(), 3);
    }

    #[test]
    fn all_entries_preserve_origin_category() {
        let catalog = Catalog::load(sample_sources(), "All").unwrap();

        let origins: Vec<&str> = catalog
            .entries_for(ALL_CATEGORY_KEY)
            .iter()
            .map(IdiomEntry::category_key)
            .collect();
        assert_eq!(origins, vec!["business", "quick", "quick"]);
    }

    #[test]
    fn unknown_category_yields_empty_slice() {
        let catalog = Catalog::load(sample_sources(), "All").unwrap();
        assert!(catalog.entries_for("nope").is_empty());
        assert!(!catalog.contains_category("nope"));
    }

    #[test]
    fn empty_source_degrades_to_empty_category() {
        let mut sources = sample_sources();
        sources.push(CategorySource::new("emotions", "Emotions", Vec::new()));
        let catalog = Catalog::load(sources, "All").unwrap();

        assert!(catalog.contains_category("emotions"));
        assert!(catalog.entries_for("emotions").is_empty());
        assert_eq!(catalog.entry_count(), 3);
    }

    #[test]
    fn listing_puts_all_last() {
        let catalog = Catalog::load(sample_sources(), "All categories").unwrap();
        let listing = catalog.categories();

        let keys: Vec<&str> = listing.iter().map(|info| info.key.as_str()).collect();
        assert_eq!(keys, vec!["business", "quick", ALL_CATEGORY_KEY]);
        assert_eq!(listing.last().unwrap().label, "All categories");
    }

    #[test]
    fn reserved_key_is_rejected() {
        let sources = vec![CategorySource::new("all", "All", Vec::new())];
        let err = Catalog::load(sources, "All").unwrap_err();
        assert_eq!(err, LoadError::ReservedKey);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut sources = sample_sources();
        sources.push(CategorySource::new("quick", "Quick again", Vec::new()));
        let err = Catalog::load(sources, "All").unwrap_err();
        assert!(matches!(err, LoadError::DuplicateCategory { key } if key == "quick"));
    }

    #[test]
    fn invalid_entry_is_rejected_with_category() {
        let sources = vec![CategorySource::new(
            "quick",
            "Quick",
            vec![draft("", "meaning")],
        )];
        let err = Catalog::load(sources, "All").unwrap_err();
        assert!(matches!(err, LoadError::Entry { category, .. } if category == "quick"));
    }
}
