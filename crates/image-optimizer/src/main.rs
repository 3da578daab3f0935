use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_optimizer::{config::Config, services::ImageOptimizer, web::WebServer};

#[derive(Parser)]
#[command(name = "image-optimizer")]
#[command(version)]
#[command(about = "On-demand image transformation proxy with a disk cache")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Directory transformed images are cached in
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Comma-separated allowed source domains, `*` for any
    #[arg(short = 's', long, value_name = "DOMAINS")]
    allowed_domains: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!(
        "image_optimizer={level},sandboxed_cache_store={level}",
        level = cli.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Image Optimizer v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(output_dir) = cli.output_dir {
        config.storage.output_directory = output_dir;
    }
    if let Some(allowed_domains) = cli.allowed_domains {
        config.security.allowed_domains = allowed_domains;
    }

    let optimizer = ImageOptimizer::from_config(&config).await?;

    info!("Port: {}", config.web.port);
    info!("Allowed domains: {}", optimizer.allow_list());
    if optimizer.allow_list().allows_any() {
        tracing::warn!("Every source domain is allowed; pass --allowed-domains to restrict fetching");
    }
    info!(
        "Output directory: {}",
        optimizer.store().base_directory().display()
    );
    info!(
        "Fetch timeout: {}, max source size: {} bytes",
        humantime::format_duration(config.fetch.timeout),
        config.fetch.max_body_size
    );

    let web_server = WebServer::new(config, optimizer)?;
    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();
    let bind_addr = format!("{}:{}", web_server.host(), web_server.port());

    let server_handle = tokio::spawn(async move {
        if let Err(e) = web_server.serve_with_signal(server_ready_tx).await {
            tracing::error!("Web server failed: {}", e);
        }
    });

    match server_ready_rx.await {
        Ok(Ok(())) => {
            info!("Listening on http://{}", bind_addr);
        }
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    server_handle.await?;
    info!("Image Optimizer stopped");
    Ok(())
}
