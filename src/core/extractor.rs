use crate::core::keywords::KeywordTable;
use crate::domain::model::{ConceptSet, Question, TaggedQuestion, FALLBACK_CONCEPT};

/// Returns the concepts whose keywords occur as whole words in `text`.
///
/// Matching is case-insensitive and purely literal. When nothing matches
/// the result is `{"General Knowledge"}`, so the set is never empty.
pub fn extract(text: &str, table: &KeywordTable) -> ConceptSet {
    let normalized = text.to_lowercase();
    let mut concepts = ConceptSet::new();

    for (entry, pattern) in table.matchers() {
        if pattern.is_match(&normalized) {
            concepts.insert(entry.concept.clone());
        }
    }

    if concepts.is_empty() {
        concepts.insert(FALLBACK_CONCEPT.to_string());
    }

    concepts
}

pub fn tag(question: Question, table: &KeywordTable) -> TaggedQuestion {
    let concepts = extract(&question.text, table);
    TaggedQuestion { question, concepts }
}

/// Tags every question, preserving input order.
pub fn extract_all(questions: &[Question], table: &KeywordTable) -> Vec<TaggedQuestion> {
    questions.iter().cloned().map(|q| tag(q, table)).collect()
}
