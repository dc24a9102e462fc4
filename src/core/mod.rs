pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod renderer;

pub use crate::domain::model::{CoordinatePair, CoordinateTable, PageText};
pub use crate::domain::ports::{ConfigProvider, PageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
