use crate::core::extractor::CoordinateExtractor;
use crate::core::renderer::MapRenderer;
use crate::core::{ConfigProvider, CoordinateTable, PageSource, PageText, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};

/// PDF → coordinates → Leaflet map (and optionally a CSV table).
pub struct CoordinatePipeline<S: Storage, T: PageSource, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) source: T,
    pub(crate) config: C,
    extractor: CoordinateExtractor,
    renderer: MapRenderer,
}

impl<S: Storage, T: PageSource, C: ConfigProvider> CoordinatePipeline<S, T, C> {
    pub fn new(storage: S, source: T, config: C) -> Result<Self> {
        let extractor = CoordinateExtractor::new(config.extraction().clone())?;
        let renderer = MapRenderer::new(config.map().clone());
        Ok(Self {
            storage,
            source,
            config,
            extractor,
            renderer,
        })
    }
}

/// Serializes the table as `lat,lon` rows.
pub fn table_to_csv(table: &CoordinateTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for pair in table {
        writer.serialize(pair)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, T: PageSource, C: ConfigProvider> Pipeline for CoordinatePipeline<S, T, C> {
    async fn extract(&self) -> Result<Vec<PageText>> {
        let input = self.config.input_path().to_string_lossy();
        tracing::debug!("Reading document: {}", input);

        let document = self.storage.read_file(&input).await?;
        tracing::debug!("Read {} bytes", document.len());

        let pages = self.source.page_texts(&document)?;
        let with_text = pages.iter().filter(|p| p.content().is_some()).count();
        tracing::info!("📄 {} page(s), {} with a text layer", pages.len(), with_text);

        Ok(pages)
    }

    async fn transform(&self, pages: Vec<PageText>) -> Result<CoordinateTable> {
        tracing::debug!(
            "Scanning with strategy {:?}, region {:?}",
            self.extractor.config().strategy,
            self.extractor.config().region
        );

        let table = self.extractor.extract_pages(&pages);
        if table.is_empty() {
            tracing::warn!("No coordinates matched in {} page(s)", pages.len());
        }
        Ok(table)
    }

    async fn load(&self, table: CoordinateTable) -> Result<String> {
        let html = self.renderer.render(&table)?;
        let output_path = self.config.output_path();

        tracing::debug!("Writing map ({} bytes) to {}", html.len(), output_path);
        self.storage.write_file(output_path, html.as_bytes()).await?;

        if let Some(csv_path) = self.config.csv_path() {
            let data = table_to_csv(&table)?;
            self.storage.write_file(csv_path, &data).await?;
            tracing::info!("📋 Coordinate table saved to: {}", csv_path);
        }

        Ok(output_path.to_string())
    }
}
