use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Label assigned when no keyword matches a question.
pub const FALLBACK_CONCEPT: &str = "General Knowledge";

/// Set of concept labels for one question, ordered by label.
pub type ConceptSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub keyword: String,
    pub concept: String,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<String>, concept: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            concept: concept.into(),
        }
    }
}

/// One input row. Field names follow the column headers of the subject CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "Question Number")]
    pub number: String,
    #[serde(rename = "Question")]
    pub text: String,
}

impl Question {
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedQuestion {
    pub question: Question,
    pub concepts: ConceptSet,
}

#[derive(Debug, Clone, Default)]
pub struct TaggingResult {
    pub tagged: Vec<TaggedQuestion>,
}

impl TaggingResult {
    pub fn len(&self) -> usize {
        self.tagged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tagged.is_empty()
    }

    /// Number of questions that only received the fallback label.
    pub fn unlabeled_count(&self) -> usize {
        self.tagged
            .iter()
            .filter(|t| t.concepts.len() == 1 && t.concepts.contains(FALLBACK_CONCEPT))
            .count()
    }
}

pub fn join_concepts(concepts: &ConceptSet, delimiter: &str) -> String {
    concepts
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Subject {
    AncientHistory,
    Math,
    Physics,
    Economics,
}

impl Subject {
    pub const ALL: [Subject; 4] = [
        Subject::AncientHistory,
        Subject::Math,
        Subject::Physics,
        Subject::Economics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::AncientHistory => "ancient_history",
            Subject::Math => "math",
            Subject::Physics => "physics",
            Subject::Economics => "economics",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Subject::ALL
            .iter()
            .copied()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Subject::ALL.iter().map(Subject::as_str).collect();
                format!("unknown subject '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_round_trips_through_str() {
        for subject in Subject::ALL {
            assert_eq!(subject.as_str().parse::<Subject>().unwrap(), subject);
        }
        assert!("chemistry".parse::<Subject>().is_err());
    }

    #[test]
    fn test_join_concepts_is_sorted() {
        let concepts: ConceptSet = ["Physics", "Algebra"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_concepts(&concepts, "; "), "Algebra; Physics");
        assert_eq!(join_concepts(&concepts, ", "), "Algebra, Physics");
    }

    #[test]
    fn test_unlabeled_count() {
        let mut fallback = ConceptSet::new();
        fallback.insert(FALLBACK_CONCEPT.to_string());
        let mut labeled = ConceptSet::new();
        labeled.insert("Geometry".to_string());

        let result = TaggingResult {
            tagged: vec![
                TaggedQuestion {
                    question: Question::new("1", "Describe trade routes."),
                    concepts: fallback,
                },
                TaggedQuestion {
                    question: Question::new("2", "Who was Pythagoras?"),
                    concepts: labeled,
                },
            ],
        };
        assert_eq!(result.len(), 2);
        assert_eq!(result.unlabeled_count(), 1);
    }
}
