pub mod cli;
pub mod toml_config;

use crate::core::keywords::KeywordTable;
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, Subject};
use crate::utils::error::{Result, TaggerError};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use clap::Parser;
use self::toml_config::TomlConfig;

pub const DEFAULT_INPUT_DIR: &str = "./data";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "concept-tagger")]
#[command(about = "Tag questions with topical concepts by keyword matching")]
pub struct CliConfig {
    /// Subject whose question file is processed
    #[arg(long, value_enum)]
    pub subject: Option<Subject>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding <subject>.csv (default: ./data)
    #[arg(long)]
    pub input_dir: Option<String>,

    /// Directory for output_concepts_<subject>.<ext> (default: .)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// TOML keyword vocabulary replacing the built-in one
    #[arg(long)]
    pub keywords: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of tagging workers
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Tag and report without writing output")]
    pub dry_run: bool,
}

impl CliConfig {
    /// Merges flags over the optional config file. Flags win.
    pub fn resolve(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };
        Settings::merge(self, file)
    }
}

/// Where the keyword vocabulary comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum VocabularySource {
    Builtin,
    File(String),
    Inline(toml::Table),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub subject: Subject,
    pub input_dir: String,
    pub output_dir: String,
    pub format: OutputFormat,
    pub workers: usize,
    pub vocabulary: VocabularySource,
}

impl Settings {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            input_dir: DEFAULT_INPUT_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            format: OutputFormat::default(),
            workers: 1,
            vocabulary: VocabularySource::Builtin,
        }
    }

    fn merge(cli: &CliConfig, file: TomlConfig) -> Result<Self> {
        let tagger = file.tagger;
        let subject = cli
            .subject
            .or(tagger.subject)
            .ok_or_else(|| TaggerError::ConfigValidationError {
                field: "subject".to_string(),
                message: "no subject given; pass --subject or set tagger.subject".to_string(),
            })?;

        let vocabulary = match (&cli.keywords, file.keywords, tagger.keywords_file) {
            (Some(path), _, _) => VocabularySource::File(path.clone()),
            (None, Some(table), _) => VocabularySource::Inline(table),
            (None, None, Some(path)) => VocabularySource::File(path),
            (None, None, None) => VocabularySource::Builtin,
        };

        Ok(Self {
            subject,
            input_dir: cli
                .input_dir
                .clone()
                .or(tagger.input_dir)
                .unwrap_or_else(|| DEFAULT_INPUT_DIR.to_string()),
            output_dir: cli
                .output_dir
                .clone()
                .or(tagger.output_dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            format: cli.format.or(tagger.format).unwrap_or_default(),
            workers: cli.workers.or(tagger.workers).unwrap_or(1),
            vocabulary,
        })
    }

    pub fn keyword_table(&self) -> Result<KeywordTable> {
        match &self.vocabulary {
            VocabularySource::Builtin => KeywordTable::builtin(),
            VocabularySource::File(path) => KeywordTable::from_file(path),
            VocabularySource::Inline(table) => KeywordTable::from_toml_table(table),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("input_dir", &self.input_dir)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_positive_number("workers", self.workers, 1)?;
        if let VocabularySource::File(path) = &self.vocabulary {
            validate_path("keywords", path)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn subject(&self) -> Subject {
        self.subject
    }

    fn input_dir(&self) -> &str {
        &self.input_dir
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn workers(&self) -> usize {
        self.workers
    }
}
