use clap::Parser;
use concept_tagger::utils::error::{ErrorSeverity, TaggerError};
use concept_tagger::utils::{logger, validation::Validate};
use concept_tagger::{CliConfig, LocalStorage, TaggerEngine, TaggingPipeline};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting concept-tagger");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e, "Configuration validation failed"),
    };

    let table = match settings.keyword_table() {
        Ok(table) => Arc::new(table),
        Err(e) => exit_with(&e, "Failed to load keyword vocabulary"),
    };
    tracing::info!(
        "Loaded {} keywords mapping to {} concepts",
        table.len(),
        table.concepts().len()
    );

    let subject = settings.subject;
    let pipeline = TaggingPipeline::new(LocalStorage::default(), settings, table);
    let engine = TaggerEngine::new(pipeline, subject);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no output will be written");
        if let Err(e) = engine.tag().await {
            exit_with(&e, "Tagging failed");
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(output_path) => {
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(&e, "Tagging failed"),
    }

    Ok(())
}

fn exit_with(e: &TaggerError, context: &str) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
