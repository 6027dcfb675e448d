use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use quiz_core::catalog::CategorySource;
use quiz_core::model::EntryDraft;

/// Configured category: which key/label to expose and which file backs it.
///
/// The backing file is `<key>_idioms.json`, a JSON array of records with
/// `idiom`, `meaning` and an optional `example` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    pub key: String,
    pub label: String,
}

impl CategorySpec {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_idioms.json", self.key)
    }
}

/// On-disk record shape for one idiom.
#[derive(Debug, Deserialize)]
struct IdiomRecord {
    idiom: String,
    meaning: String,
    #[serde(default)]
    example: Option<String>,
}

/// Parses one category file's contents into a `CategorySource`.
///
/// Policy: a malformed file degrades the whole category to empty, and an
/// individually invalid record is skipped; both are warn-logged, never fatal,
/// so a broken source file cannot take the quiz down.
#[must_use]
pub fn parse_category_source(spec: &CategorySpec, json: &str) -> CategorySource {
    let records: Vec<IdiomRecord> = match serde_json::from_str(json) {
        Ok(records) => records,
        Err(err) => {
            warn!(category = %spec.key, %err, "malformed category source, loading it empty");
            Vec::new()
        }
    };

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let draft = EntryDraft::new(record.idiom, record.meaning, record.example);
        if let Err(err) = draft.validate(&spec.key) {
            warn!(category = %spec.key, phrase = %draft.phrase, %err, "skipping invalid entry");
            continue;
        }
        entries.push(draft);
    }

    CategorySource::new(spec.key.clone(), spec.label.clone(), entries)
}

/// Loads one source per spec from `dir`, in spec order.
///
/// A missing file degrades to an empty category, matching the parse policy.
#[must_use]
pub fn load_catalog_sources(dir: &Path, specs: &[CategorySpec]) -> Vec<CategorySource> {
    specs
        .iter()
        .map(|spec| {
            let path = dir.join(spec.file_name());
            match fs::read_to_string(&path) {
                Ok(json) => parse_category_source(spec, &json),
                Err(err) => {
                    warn!(
                        category = %spec.key,
                        path = %path.display(),
                        %err,
                        "category source missing, loading it empty"
                    );
                    CategorySource::new(spec.key.clone(), spec.label.clone(), Vec::new())
                }
            }
        })
        .collect()
}
