use clap::Parser;
use pdf_coord_map::utils::error::ErrorSeverity;
use pdf_coord_map::utils::{logger, validation::Validate};
use pdf_coord_map::{CliConfig, CoordinatePipeline, EtlEngine, LocalStorage, PdfTextSource};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::debug!("Input validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let engine = match CoordinatePipeline::new(LocalStorage::default(), PdfTextSource::new(), config)
    {
        Ok(pipeline) => EtlEngine::new(pipeline),
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    match engine.run().await {
        Ok(output_path) => {
            let shown = std::path::absolute(&output_path)
                .map(|p| p.display().to_string())
                .unwrap_or(output_path);
            tracing::info!("🗺  Map saved to {}", shown);
            println!("🗺  Map saved to {}", shown);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
