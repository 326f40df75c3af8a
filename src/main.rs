use asmtrack_ingest::utils::error::ErrorSeverity;
use asmtrack_ingest::utils::{logger, validation::Validate};
use asmtrack_ingest::{
    CliConfig, CollectionStore, Command, ConfigProvider, ImportResult, Importer, IngestError,
    JsonFileStore, TargetEntity, TomlConfig,
};
use clap::Parser;

fn print_summary(result: &ImportResult) {
    println!("✅ {}", result.message);
    println!(
        "   imported: {}, skipped: {}, total: {}",
        result.imported_count, result.skipped_count, result.total_count
    );
    if !result.warnings.is_empty() {
        println!("⚠️  {} warnings:", result.warnings.len());
        for warning in &result.warnings {
            println!("   - {}", warning);
        }
    }
}

async fn run(cli: &CliConfig, config: &TomlConfig) -> asmtrack_ingest::Result<()> {
    let store = JsonFileStore::new(config.store_path());
    // 匯入前先確保集合存在
    store.ensure_collections().await?;

    match &cli.command {
        Command::Import { entity, file, json } => {
            tracing::info!("📁 Reading {}", file);
            let csv_text = tokio::fs::read_to_string(file).await?;

            let importer = Importer::from_config(store, config);
            let result = importer.import_entity(*entity, &csv_text).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }
        Command::Export { entity, output } => {
            let importer = Importer::from_config(store, config);
            let csv_text = importer.export(*entity).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(path, csv_text).await?;
                    println!("📁 Exported {} to {}", entity.collection_name(), path);
                }
                None => print!("{}", csv_text),
            }
        }
        Command::Count => {
            for entity in TargetEntity::ALL {
                let records = store.find_all(entity).await?;
                println!("{:<20} {}", entity.collection_name(), records.len());
            }
        }
    }

    Ok(())
}

fn exit_code(error: &IngestError) -> i32 {
    match error.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.validate().and_then(|_| cli.resolve()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(exit_code(&e));
    }

    Ok(())
}
