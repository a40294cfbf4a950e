use crate::core::extractor::extract_all;
use crate::core::keywords::KeywordTable;
use crate::core::{ConfigProvider, Pipeline, Question, Storage, TaggingResult};
use crate::domain::model::{join_concepts, OutputFormat, TaggedQuestion};
use crate::utils::error::{Result, TaggerError};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub const NUMBER_COLUMN: &str = "Question Number";
pub const TEXT_COLUMN: &str = "Question";
pub const CONCEPTS_COLUMN: &str = "Concepts";

/// Delimiter between concept labels in file output.
pub const FILE_CONCEPT_DELIMITER: &str = "; ";

pub struct TaggingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    table: Arc<KeywordTable>,
}

impl<S: Storage, C: ConfigProvider> TaggingPipeline<S, C> {
    pub fn new(storage: S, config: C, table: Arc<KeywordTable>) -> Self {
        Self {
            storage,
            config,
            table,
        }
    }

    pub fn input_path(&self) -> String {
        join_path(
            self.config.input_dir(),
            &format!("{}.csv", self.config.subject()),
        )
    }

    pub fn output_path(&self) -> String {
        let format = self.config.output_format();
        join_path(
            self.config.output_dir(),
            &format!(
                "output_concepts_{}.{}",
                self.config.subject(),
                format.extension()
            ),
        )
    }
}

fn join_path(dir: &str, file: &str) -> String {
    Path::new(dir).join(file).to_string_lossy().into_owned()
}

pub fn parse_questions(data: &[u8], source: &str) -> Result<Vec<Question>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in [NUMBER_COLUMN, TEXT_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(TaggerError::MissingColumn {
                column: column.to_string(),
                file: source.to_string(),
            });
        }
    }

    let mut questions = Vec::new();
    for row in reader.deserialize() {
        let question: Question = row?;
        questions.push(question);
    }
    Ok(questions)
}

#[derive(Serialize)]
struct JsonRow<'a> {
    question_number: &'a str,
    question: &'a str,
    concepts: Vec<&'a str>,
}

pub fn render_output(tagged: &[TaggedQuestion], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_delimited(tagged, b','),
        OutputFormat::Tsv => render_delimited(tagged, b'\t'),
        OutputFormat::Json => {
            let rows: Vec<JsonRow<'_>> = tagged
                .iter()
                .map(|t| JsonRow {
                    question_number: &t.question.number,
                    question: &t.question.text,
                    concepts: t.concepts.iter().map(String::as_str).collect(),
                })
                .collect();
            Ok(serde_json::to_vec_pretty(&rows)?)
        }
    }
}

fn render_delimited(tagged: &[TaggedQuestion], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record([NUMBER_COLUMN, TEXT_COLUMN, CONCEPTS_COLUMN])?;
    for t in tagged {
        let concepts = join_concepts(&t.concepts, FILE_CONCEPT_DELIMITER);
        writer.write_record([
            t.question.number.as_str(),
            t.question.text.as_str(),
            concepts.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| TaggerError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TaggingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Question>> {
        let path = self.input_path();
        tracing::debug!("Reading questions from {}", path);

        let data = self.storage.read_file(&path).await?;
        let questions = parse_questions(&data, &path)?;

        tracing::debug!("Parsed {} questions from {}", questions.len(), path);
        Ok(questions)
    }

    async fn transform(&self, questions: Vec<Question>) -> Result<TaggingResult> {
        let workers = self.config.workers().max(1);
        if questions.is_empty() {
            return Ok(TaggingResult::default());
        }
        if workers == 1 {
            return Ok(TaggingResult {
                tagged: extract_all(&questions, &self.table),
            });
        }

        let chunk_size = questions.len().div_ceil(workers);
        tracing::debug!(
            "Tagging {} questions on {} workers ({} per chunk)",
            questions.len(),
            workers,
            chunk_size
        );

        let handles: Vec<_> = questions
            .chunks(chunk_size)
            .map(|chunk| {
                let chunk = chunk.to_vec();
                let table = Arc::clone(&self.table);
                tokio::task::spawn_blocking(move || extract_all(&chunk, &table))
            })
            .collect();

        let mut tagged = Vec::with_capacity(questions.len());
        for handle in handles {
            let part = handle.await.map_err(|e| TaggerError::ProcessingError {
                message: format!("tagging worker failed: {}", e),
            })?;
            tagged.extend(part);
        }

        Ok(TaggingResult { tagged })
    }

    async fn load(&self, result: TaggingResult) -> Result<String> {
        let output_path = self.output_path();
        let data = render_output(&result.tagged, self.config.output_format())?;

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            result.len(),
            data.len(),
            output_path
        );
        self.storage.write_file(&output_path, &data).await?;

        Ok(output_path)
    }
}
