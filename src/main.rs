use dotenvy::dotenv;
use points_ledger::{
    config::{self, AppConfig},
    core::{roster::provision_roster, session::SessionIssuer},
    errors::Result,
    web::{self, AppState},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the real environment
    dotenv().ok();

    // 3. Load and validate configuration; a missing secret stops startup here
    let app_config = AppConfig::from_env()
        .inspect_err(|e| error!("Invalid configuration: {}", e))?;

    // 4. Connect to the record store and ensure tables exist
    let db = config::database::create_connection(&app_config)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ensured."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Provision participants and booths from the roster, if one is configured
    if let Some(path) = &app_config.roster_path {
        let roster = config::roster::load_roster(path)
            .inspect_err(|e| error!("Failed to load roster: {}", e))?;
        provision_roster(&db, &roster).await?;
    }

    // 6. Serve
    let sessions = SessionIssuer::new(&app_config.jwt_secret, app_config.session_ttl);
    let state = AppState::new(db, sessions, app_config.cookie_secure);
    let app = web::router(state);

    let listener = TcpListener::bind(app_config.bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.bind_addr, e))?;
    info!("Points ledger listening on {}", app_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
