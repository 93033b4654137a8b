use anyhow::{Context, Result};
use clap::Parser;

use std::net::{IpAddr, SocketAddr};

mod error;
mod routes;

#[derive(Parser)]
#[command(name = "enhancer-server")]
#[command(about = "Serve POST /enhance: sharpen uploaded PNG/JPEG images", long_about = None)]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT", default_value_t = 8080)]
    port: u16,

    /// Maximum request body size in MiB (1-1024)
    #[arg(long, value_name = "MIB", default_value_t = 32)]
    max_upload_mb: usize,

    /// Verbose output
    #[arg(short, long, default_value_t)]
    verbose: bool,

    /// Quiet mode (no log output)
    #[arg(short, long, default_value_t)]
    quiet: bool,
}

#[derive(Debug, PartialEq)]
struct ServerConfig {
    addr: SocketAddr,
    max_upload_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose, args.quiet);

    let config = build_config(&args)?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    log::info!(
        "Listening on http://{} (upload limit {} bytes)",
        listener.local_addr()?,
        config.max_upload_bytes
    );

    axum::serve(listener, routes::router(config.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<ServerConfig> {
    // Validate upload limit
    if !(1..=1024).contains(&args.max_upload_mb) {
        anyhow::bail!("Upload limit must be between 1 and 1024 MiB");
    }

    Ok(ServerConfig {
        addr: SocketAddr::new(args.host, args.port),
        max_upload_bytes: args.max_upload_mb * 1024 * 1024,
    })
}
