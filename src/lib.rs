pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, CliConfig, Settings};
pub use crate::core::{
    engine::TaggerEngine,
    extractor::{extract, extract_all},
    keywords::KeywordTable,
    pipeline::TaggingPipeline,
};
pub use domain::model::{
    ConceptSet, KeywordEntry, OutputFormat, Question, Subject, TaggedQuestion, FALLBACK_CONCEPT,
};
pub use utils::error::{Result, TaggerError};
