use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting coordinate extraction...");

        // Extract
        let pages = self.pipeline.extract().await?;
        tracing::debug!("Extract finished in {:?}", started.elapsed());

        // Transform
        let table = self.pipeline.transform(pages).await?;
        tracing::info!("🔎 Found {} unique coordinate(s)", table.len());

        // Load
        let output_path = self.pipeline.load(table).await?;
        tracing::debug!("Run finished in {:?}", started.elapsed());

        Ok(output_path)
    }
}
