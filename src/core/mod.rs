pub mod engine;
pub mod extractor;
pub mod keywords;
pub mod pipeline;

pub use crate::domain::model::{Question, TaggingResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
