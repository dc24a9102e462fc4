use crate::core::extractor::ExtractionConfig;
use crate::core::renderer::MapConfig;
use crate::domain::model::{CoordinateTable, PageText};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Turns a document into per-page plain text.
pub trait PageSource: Send + Sync {
    fn page_texts(&self, document: &[u8]) -> Result<Vec<PageText>>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &Path;
    fn output_path(&self) -> &str;
    fn csv_path(&self) -> Option<&str>;
    fn extraction(&self) -> &ExtractionConfig;
    fn map(&self) -> &MapConfig;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PageText>>;
    async fn transform(&self, pages: Vec<PageText>) -> Result<CoordinateTable>;
    async fn load(&self, table: CoordinateTable) -> Result<String>;
}
