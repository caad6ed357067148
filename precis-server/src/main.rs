use std::sync::Arc;

use clap::Parser;
use precis_core::{GeminiClient, PgSummaryStore, PrecisConfig, PromptTemplate, SummaryStore};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use precis_server::SummarizationService;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "precis.toml")]
    config: String,

    /// Check database connectivity and credential presence, then exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match PrecisConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // One connection attempt; degraded mode on failure
    let store = PgSummaryStore::connect(&config.database).await;

    if args.health {
        return health_report(&config, &store).await;
    }

    let generator = GeminiClient::new(&config.gemini)?;
    if config.api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set - summarize requests will fail until it is configured");
    }

    let service = SummarizationService::new(
        Arc::new(generator),
        Arc::new(store),
        PromptTemplate::new(config.prompt.template.clone()),
    );

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
        }
        let _ = shutdown_tx.send(());
    });

    precis_server::http::start_http_server(service, &config.server, tx.subscribe()).await
}

async fn health_report(config: &PrecisConfig, store: &PgSummaryStore) -> anyhow::Result<()> {
    match store.pool() {
        Some(pool) => match precis_core::db::health_check(pool).await {
            Ok(v) => println!("✅ PostgreSQL connected: {}", v),
            Err(e) => {
                println!("❌ PostgreSQL health check failed: {}", e);
                std::process::exit(1);
            }
        },
        None if config.database.url.is_some() => {
            println!("❌ PostgreSQL connection failed");
            std::process::exit(1);
        }
        None => println!("⚠️  No database configured - summaries will not be saved"),
    }

    if config.api_key().is_some() {
        println!("✅ Gemini API key configured (model: {})", config.gemini.model);
    } else {
        println!("⚠️  Gemini API key not configured");
    }

    if store.is_available() {
        println!("✅ Stored summaries: {}", store.count().await?);
    }

    println!("✅ Precis health check passed");
    Ok(())
}
