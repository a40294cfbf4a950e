use crate::domain::model::{OutputFormat, Question, Subject, TaggingResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn subject(&self) -> Subject;
    fn input_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn workers(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Question>>;
    async fn transform(&self, questions: Vec<Question>) -> Result<TaggingResult>;
    async fn load(&self, result: TaggingResult) -> Result<String>;
}
