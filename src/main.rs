use foodbank::{AppState, build_router, database, load_config, schema, workers};
use tokio::{net::TcpListener, signal, sync::broadcast};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("foodbank=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    info!("Loaded configuration:\n{}", config);

    let pool = database::connect(&config).await?;

    if let Err(e) = schema::initialize_schema(&pool).await {
        error!(error = %e, "Schema initialization failed, refusing to start");
        database::close(&pool).await;
        return Err(e.into());
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let cleanup = tokio::spawn(workers::revoked_token_cleanup_worker(
        pool.clone(),
        config.workers.clone(),
        shutdown_tx.subscribe(),
    ));

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(());
    if let Err(e) = cleanup.await {
        error!(error = %e, "Cleanup worker did not stop cleanly");
    }

    database::close(&pool).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
