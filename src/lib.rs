pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, PdfTextSource};
pub use config::AppConfig;
pub use crate::core::extractor::{CoordinateExtractor, ExtractionConfig, Strategy};
pub use crate::core::renderer::{MapConfig, MapRenderer, MarkerStyle, TileLayer};
pub use crate::core::{etl::EtlEngine, pipeline::CoordinatePipeline};
pub use domain::model::{BoundingBox, CoordinatePair, CoordinateSet, CoordinateTable, PageText};
pub use utils::error::{EtlError, Result};
