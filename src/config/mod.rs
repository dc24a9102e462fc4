pub mod toml_config;

pub use toml_config::{AppConfig, OutputConfig, DEFAULT_OUTPUT_PATH};

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::AppConfig;
    use crate::core::extractor::Strategy;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_input_file, Validate};
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "pdf-coord-map")]
    #[command(about = "Extract coordinate pairs from a PDF and plot them on an interactive map")]
    pub struct CliConfig {
        /// PDF document to scan
        pub input: PathBuf,

        /// Map output path [default: cameras_map.html]
        #[arg(short, long)]
        pub output: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Extraction strategy
        #[arg(long, value_enum)]
        pub strategy: Option<Strategy>,

        /// Also write the coordinate table as CSV
        #[arg(long)]
        pub csv: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// Builds the effective configuration: file (or defaults), then flags.
        pub fn resolve(&self) -> Result<AppConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::info!("📁 Loading configuration from: {}", path.display());
                    AppConfig::from_file(path)?
                }
                None => AppConfig::default(),
            };

            config.input = self.input.clone();
            if let Some(output) = &self.output {
                config.output.map = output.clone();
            }
            if let Some(csv) = &self.csv {
                config.output.csv = Some(csv.clone());
            }
            if let Some(strategy) = self.strategy {
                config.extract.strategy = strategy;
            }

            config.validate()?;
            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_input_file(&self.input)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::utils::error::EtlError;
        use std::io::Write;
        use tempfile::NamedTempFile;

        #[test]
        fn test_single_positional_argument() {
            let cli = CliConfig::try_parse_from(["pdf-coord-map", "document.pdf"]).unwrap();
            assert_eq!(cli.input, PathBuf::from("document.pdf"));
            assert!(cli.output.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_missing_argument_is_an_error() {
            assert!(CliConfig::try_parse_from(["pdf-coord-map"]).is_err());
        }

        #[test]
        fn test_nonexistent_input_fails_validation() {
            let cli = CliConfig::try_parse_from(["pdf-coord-map", "/no/such/file.pdf"]).unwrap();
            let err = cli.validate().unwrap_err();
            assert!(matches!(err, EtlError::InputNotFound { .. }));
        }

        #[test]
        fn test_flags_override_file() {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(b"[extract]\nstrategy = \"whole-text\"\n\n[output]\nmap = \"from_file.html\"\n")
                .unwrap();
            let config_path = file.path().to_str().unwrap().to_string();

            let cli = CliConfig::try_parse_from([
                "pdf-coord-map",
                "document.pdf",
                "--config",
                &config_path,
                "--strategy",
                "line-anchored",
                "--csv",
                "coords.csv",
            ])
            .unwrap();
            let config = cli.resolve().unwrap();

            assert_eq!(config.input, PathBuf::from("document.pdf"));
            assert_eq!(config.extract.strategy, Strategy::LineAnchored);
            assert_eq!(config.output.map, "from_file.html");
            assert_eq!(config.output.csv.as_deref(), Some("coords.csv"));
        }

        #[test]
        fn test_defaults_without_config_file() {
            let cli = CliConfig::try_parse_from(["pdf-coord-map", "doc.pdf"]).unwrap();
            let config = cli.resolve().unwrap();
            assert_eq!(config.output.map, "cameras_map.html");
            assert_eq!(config.extract.strategy, Strategy::Combined);
        }
    }
}
