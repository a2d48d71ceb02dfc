use clap::Parser;
use hackathon_snapshot::config::file::FileConfig;
use hackathon_snapshot::utils::{logger, validation::Validate};
use hackathon_snapshot::{
    CliArgs, EtlEngine, EtlError, ExporterConfig, LocalStorage, MongoSource, SnapshotPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    tracing::debug!("Resolved config: {:?}", config);

    if args.dry_run {
        display_plan(&config);
        return Ok(());
    }

    // 連線失敗時 MongoSource::connect 已自行關閉 client
    let source = match MongoSource::connect(&config.source).await {
        Ok(source) => source,
        Err(e) => fail(e),
    };

    let storage = LocalStorage::new(config.output.dir.clone());
    let pipeline = SnapshotPipeline::new(source, storage, config.output);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(written) => {
            tracing::info!("✅ Snapshot export completed, {} files written", written.len());
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn load_config(args: &CliArgs) -> hackathon_snapshot::Result<ExporterConfig> {
    let file = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            Some(FileConfig::from_file(path)?)
        }
        None => None,
    };

    let config = ExporterConfig::resolve(file, &args.overrides(), |name| {
        std::env::var(name).ok()
    })?;
    config.validate()?;
    Ok(config)
}

fn fail(e: EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Snapshot export failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

fn display_plan(config: &ExporterConfig) {
    let collection = &config.source.collection;

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📡 Data Source:");
    println!("  Database: {}", config.source.database);
    println!("  Collection: {}", collection.name);
    if collection.discover {
        println!(
            "  ⚠️ Discovery enabled, candidates: {}",
            collection.candidates.join(", ")
        );
    }

    println!();
    println!("💾 Output ({}):", config.output.dir);
    for kind in &config.output.views {
        println!("  {:<9} -> {}", kind.as_str(), config.output.file_name(*kind));
    }

    println!();
    println!("✅ Dry run complete. No connection was made.");
}
