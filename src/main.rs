use clap::Parser;
use crux_vitals::core::report;
use crux_vitals::utils::error::{ErrorSeverity, VitalsError};
use crux_vitals::utils::{logger, validation::Validate};
use crux_vitals::{CliConfig, LocalStorage, TomlConfig, VitalsEngine, VitalsPipeline};

fn exit_code(e: &VitalsError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 網路或 API 錯誤，可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &VitalsError) -> ! {
    tracing::error!(
        "❌ Check failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting crux-vitals");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入設定檔（若有），再套用命令列參數
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path).unwrap_or_else(|e| fail(&e))
        }
        None => TomlConfig::default(),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let show_console = config.wants_console();
    let show_raw = config.show_raw();
    let show_summary = config.show_summary();

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = VitalsPipeline::new(storage, config);
    let engine = VitalsEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            if show_console {
                print!("{}", report::render_cards(&outcome.results, show_raw)?);
                print!("{}", report::render_chart(&outcome.results));
            }
            if show_summary {
                print!("{}", report::render_summary(&outcome.results));
            }
            for path in &outcome.written {
                println!("📁 Output saved to: {}", path);
            }
            tracing::info!("✅ Checked {} domain(s)", outcome.results.len());
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
