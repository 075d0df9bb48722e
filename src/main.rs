use tracing_subscriber::EnvFilter;

use remax_directory::config;
use remax_directory::database::open_repository;
use remax_directory::handlers;
use remax_directory::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("remax_directory=info,tower_http=info")),
        )
        .init();

    let config = config::config().clone();
    tracing::info!("Starting remax-directory in {:?} mode", config.environment);

    let repo = match open_repository(&config.storage, config.filter.debug_logging).await {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!("Database connection error: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::new(config.clone(), repo.clone()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Invalid security configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app = handlers::app(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server running in {:?} mode on http://{}", config.environment, bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    repo.close().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
