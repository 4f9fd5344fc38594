//! Mobilia REST API entry point.
//!
//! Binary name: `mobilia`
//!
//! Parses CLI arguments, initializes the database and services, then either
//! starts the REST API server or runs a one-shot maintenance command.

mod http;
mod state;

use clap::{Parser, Subcommand};

use state::AppState;

#[derive(Parser)]
#[command(name = "mobilia", version, about = "Furniture catalog search and assistant backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server.
    Serve {
        /// Bind host; overrides the config file.
        #[arg(long)]
        host: Option<String>,
        /// Bind port; overrides the config file.
        #[arg(long)]
        port: Option<u16>,
        /// Export spans via OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },
    /// Rebuild the image feature cache and exit.
    RefreshFeatures,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let otel = matches!(&cli.command, Commands::Serve { otel: true, .. });
    mobilia_observe::tracing_setup::init_tracing(otel)
        .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { host, port, .. } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Mobilia API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::RefreshFeatures => {
            let products_indexed = state
                .feature_cache
                .refresh()
                .await
                .map_err(|e| anyhow::anyhow!("feature refresh failed: {e}"))?;
            println!(
                "  {} Indexed {} products",
                console::style("✓").green(),
                console::style(products_indexed).cyan()
            );
        }
    }

    mobilia_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
