use crate::domain::model::KeywordEntry;
use crate::utils::error::{Result, TaggerError};
use crate::utils::validation::validate_non_empty_string;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

const BUILTIN_VOCABULARY: &str = include_str!("../../data/keywords.toml");

/// Immutable keyword -> concept vocabulary.
///
/// Keywords are stored lower-cased, each with a `\b...\b` pattern compiled
/// at construction. Entries keep their definition order and the table is
/// never mutated afterwards, so one instance can be shared behind an `Arc`
/// by any number of concurrent extraction calls.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
    patterns: Vec<Regex>,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    keywords: toml::Table,
}

impl KeywordTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from keyword/concept pairs.
    ///
    /// Keywords and concepts must be non-blank. A keyword (compared
    /// case-insensitively) may appear more than once only if every
    /// occurrence names the same concept; repeats are dropped.
    pub fn new(entries: impl IntoIterator<Item = KeywordEntry>) -> Result<Self> {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut table = Vec::new();
        let mut patterns = Vec::new();

        for entry in entries {
            validate_non_empty_string("keywords.keyword", &entry.keyword)?;
            validate_non_empty_string(&format!("keywords.{}", entry.keyword), &entry.concept)?;

            let keyword = entry.keyword.to_lowercase();
            match seen.get(&keyword) {
                Some(existing) if *existing == entry.concept => {
                    tracing::debug!("Skipping repeated keyword '{}'", keyword);
                }
                Some(existing) => {
                    return Err(TaggerError::InvalidConfigValueError {
                        field: format!("keywords.{}", keyword),
                        value: entry.concept,
                        reason: format!("keyword is already mapped to '{}'", existing),
                    });
                }
                None => {
                    seen.insert(keyword.clone(), entry.concept.clone());
                    patterns.push(whole_word_pattern(&keyword)?);
                    table.push(KeywordEntry {
                        keyword,
                        concept: entry.concept,
                    });
                }
            }
        }

        Ok(Self {
            entries: table,
            patterns,
        })
    }

    pub fn from_pairs<K, C>(pairs: impl IntoIterator<Item = (K, C)>) -> Result<Self>
    where
        K: Into<String>,
        C: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(k, c)| KeywordEntry::new(k, c)))
    }

    /// The vocabulary compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_VOCABULARY)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading keyword vocabulary from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a `[keywords]` table of `"phrase" = "Concept"` pairs.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: VocabularyFile = toml::from_str(content)?;
        Self::from_toml_table(&file.keywords)
    }

    pub(crate) fn from_toml_table(table: &toml::Table) -> Result<Self> {
        let mut entries = Vec::with_capacity(table.len());
        for (keyword, value) in table {
            let concept = value
                .as_str()
                .ok_or_else(|| TaggerError::ConfigValidationError {
                    field: format!("keywords.{}", keyword),
                    message: format!("concept must be a string, found {}", value.type_str()),
                })?;
            entries.push(KeywordEntry::new(keyword.as_str(), concept));
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    /// Entries paired with their compiled whole-word patterns.
    pub fn matchers(&self) -> impl Iterator<Item = (&KeywordEntry, &Regex)> {
        self.entries.iter().zip(self.patterns.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct concept labels in the table.
    pub fn concepts(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.concept.as_str()).collect()
    }
}

fn whole_word_pattern(keyword: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(keyword))).map_err(|e| {
        TaggerError::InvalidConfigValueError {
            field: "keywords.keyword".to_string(),
            value: keyword.to_string(),
            reason: format!("cannot build match pattern: {}", e),
        }
    })
}
