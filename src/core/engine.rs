use crate::core::Pipeline;
use crate::domain::model::{join_concepts, Subject, TaggingResult};
use crate::utils::error::Result;
use std::io::Write;

/// Delimiter between concept labels on the console.
pub const CONSOLE_CONCEPT_DELIMITER: &str = ", ";

pub struct TaggerEngine<P: Pipeline> {
    pipeline: P,
    subject: Subject,
}

impl<P: Pipeline> TaggerEngine<P> {
    pub fn new(pipeline: P, subject: Subject) -> Self {
        Self { pipeline, subject }
    }

    /// Extracts and tags, printing the per-question report to stdout.
    pub async fn tag(&self) -> Result<TaggingResult> {
        tracing::info!("Reading questions for subject '{}'", self.subject);
        let questions = self.pipeline.extract().await?;
        println!(
            "Loaded {} questions for subject: {}",
            questions.len(),
            self.subject
        );

        let result = self.pipeline.transform(questions).await?;
        tracing::info!(
            "Tagged {} questions ({} without a matching keyword)",
            result.len(),
            result.unlabeled_count()
        );

        let stdout = std::io::stdout();
        write_report(&mut stdout.lock(), &result)?;
        Ok(result)
    }

    pub async fn run(&self) -> Result<String> {
        let result = self.tag().await?;

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}

pub fn write_report<W: Write>(out: &mut W, result: &TaggingResult) -> Result<()> {
    for t in &result.tagged {
        writeln!(
            out,
            "Question {}: {}",
            t.question.number,
            join_concepts(&t.concepts, CONSOLE_CONCEPT_DELIMITER)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::tag;
    use crate::core::keywords::KeywordTable;
    use crate::domain::model::Question;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct StubPipeline {
        table: KeywordTable,
        loaded: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<Question>> {
            Ok(vec![
                Question::new("1", "When did the war begin?"),
                Question::new("2", "Who wrote the Iliad?"),
            ])
        }

        async fn transform(&self, questions: Vec<Question>) -> Result<TaggingResult> {
            Ok(TaggingResult {
                tagged: questions.into_iter().map(|q| tag(q, &self.table)).collect(),
            })
        }

        async fn load(&self, result: TaggingResult) -> Result<String> {
            assert_eq!(result.len(), 2);
            self.loaded.store(true, Ordering::SeqCst);
            Ok("out/output_concepts_ancient_history.csv".to_string())
        }
    }

    fn stub() -> (StubPipeline, Arc<AtomicBool>) {
        let loaded = Arc::new(AtomicBool::new(false));
        let pipeline = StubPipeline {
            table: KeywordTable::from_pairs([("war", "Warfare"), ("battle", "Warfare")]).unwrap(),
            loaded: Arc::clone(&loaded),
        };
        (pipeline, loaded)
    }

    #[tokio::test]
    async fn test_run_loads_output() {
        let (pipeline, loaded) = stub();
        let engine = TaggerEngine::new(pipeline, Subject::AncientHistory);

        let path = engine.run().await.unwrap();

        assert_eq!(path, "out/output_concepts_ancient_history.csv");
        assert!(loaded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_tag_does_not_load() {
        let (pipeline, loaded) = stub();
        let engine = TaggerEngine::new(pipeline, Subject::AncientHistory);

        let result = engine.tag().await.unwrap();

        assert_eq!(result.unlabeled_count(), 1);
        assert!(!loaded.load(Ordering::SeqCst));
    }

    #[test]
    fn test_write_report() {
        let table = KeywordTable::from_pairs([("war", "Warfare"), ("rome", "Ancient Rome")]).unwrap();
        let result = TaggingResult {
            tagged: vec![
                tag(Question::new("1", "Rome went to war"), &table),
                tag(Question::new("2", "Who wrote the Iliad?"), &table),
            ],
        };

        let mut out = Vec::new();
        write_report(&mut out, &result).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Question 1: Ancient Rome, Warfare\nQuestion 2: General Knowledge\n"
        );
    }
}
