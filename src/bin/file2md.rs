//! Server binary for file2md.
//!
//! A thin shim over the library crate that maps CLI flags and `FILE2MD_*`
//! environment variables to a [`ServerConfig`], initialises logging once,
//! and serves until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use file2md::ServerConfig;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address (0.0.0.0:5000)
  file2md

  # Custom port, verbose request logging
  RUST_LOG=file2md=debug,tower_http=debug file2md --port 8080

  # Allow uploads up to 100 MiB
  file2md --max-upload-mb 100

  # Convert a document from the command line
  curl -F file=@report.pdf http://localhost:5000/convert

SUPPORTED UPLOAD TYPES:
  pdf docx pptx xlsx png jpg jpeg gif mp3 wav html csv json xml

ENVIRONMENT VARIABLES:
  FILE2MD_HOST               Interface to bind (default 0.0.0.0)
  FILE2MD_PORT               Port to listen on (default 5000)
  FILE2MD_MAX_UPLOAD_MB      Maximum upload size in MiB (default 25)
  FILE2MD_EXTRACT_MAX_CHARS  Extracted-text cap per conversion (default 500000)
  RUST_LOG                   Log filter (default "file2md=info,tower_http=info")
"#;

/// Upload-and-convert web service: documents in, Markdown out.
#[derive(Parser, Debug)]
#[command(
    name = "file2md",
    version,
    about = "Upload-and-convert web service: documents in, Markdown out",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "FILE2MD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// TCP port to listen on.
    #[arg(short, long, env = "FILE2MD_PORT", default_value_t = 5000)]
    port: u16,

    /// Maximum accepted upload size, in MiB.
    #[arg(long, env = "FILE2MD_MAX_UPLOAD_MB", default_value_t = 25)]
    max_upload_mb: usize,

    /// Upper bound on extracted text length per conversion, in characters.
    #[arg(long, env = "FILE2MD_EXTRACT_MAX_CHARS", default_value_t = 500_000)]
    extract_max_chars: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Process-wide structured logging, configured exactly once. Library
    // code only emits `tracing` events; it never touches the subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("file2md=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        max_upload_bytes: cli.max_upload_mb * 1024 * 1024,
        extract_max_chars: cli.extract_max_chars,
    };

    let app = file2md::server::router(&config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    tracing::info!("file2md listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("file2md shut down");
    Ok(())
}

/// Resolve when the process receives ctrl-c, letting in-flight requests
/// finish before the listener closes.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    }
}
