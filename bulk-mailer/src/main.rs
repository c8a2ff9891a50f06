use bulk_mailer::api::ApiServer;
use bulk_mailer::config::{AppConfig, LoggingConfig};
use bulk_mailer::smtp::SmtpTransportBuilder;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Templated bulk email sender
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML config file (default: ./bulk-mailer.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }

    init_tracing(&config.logging)?;

    info!("Starting bulk-mailer v{}", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", config.server.listen_addr);
    if config.server.allowed_origins.is_empty() {
        info!("  CORS: any origin");
    } else {
        info!("  CORS: {}", config.server.allowed_origins.join(", "));
    }

    let server = ApiServer::new(&config, Arc::new(SmtpTransportBuilder))?;
    server.run().await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).try_init()?;
    }

    Ok(())
}
