use crate::core::extractor::ExtractionConfig;
use crate::core::renderer::MapConfig;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PATH: &str = "cameras_map.html";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Map document path.
    pub map: String,
    /// Optional `lat,lon` table.
    pub csv: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            map: DEFAULT_OUTPUT_PATH.to_string(),
            csv: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Set from the command line, never from the file.
    #[serde(skip)]
    pub input: PathBuf,
    pub extract: ExtractionConfig,
    pub map: MapConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Defaults for the given input document.
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string. Missing sections take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl ConfigProvider for AppConfig {
    fn input_path(&self) -> &Path {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output.map
    }

    fn csv_path(&self) -> Option<&str> {
        self.output.csv.as_deref()
    }

    fn extraction(&self) -> &ExtractionConfig {
        &self.extract
    }

    fn map(&self) -> &MapConfig {
        &self.map
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.map.validate()?;

        validate_path("output.map", &self.output.map)?;
        if let Some(csv) = &self.output.csv {
            validate_path("output.csv", csv)?;
            if csv == &self.output.map {
                return Err(EtlError::ConfigValidationError {
                    field: "output.csv".to_string(),
                    message: "must differ from output.map".to_string(),
                });
            }
        }
        Ok(())
    }
}
