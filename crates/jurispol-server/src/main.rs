//! JurisPol — legal-assistant chat relay.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use jurispol_core::JurisPolConfig;
use jurispol_server::{build_router, console, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = JurisPolConfig::from_env()?;

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "chat" => {
                let relay_url = args.get(2).cloned().unwrap_or_else(|| config.relay_url.clone());
                return console::run(&relay_url).await;
            }
            "--help" | "-h" | "help" => {
                println!("JurisPol — asistente normativo (relay + consola)");
                println!();
                println!("Usage: jurispol [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the relay server");
                println!("  chat [relay-url]         Interactive console client");
                println!("  help                     Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'jurispol help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    info!("Model: {}", config.model);
    info!("Static bundle: {}", config.static_dir.display());

    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("JurisPol relay listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
