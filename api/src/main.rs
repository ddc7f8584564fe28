mod error;
mod members;
mod settings;
mod sqlite;

use error::AppResult;
use settings::Settings;

use anyhow::Result;
use sqlx::SqlitePool;
use tokio::{net::TcpListener, time::Instant};

use axum::{routing::get, serve, Router};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    db: SqlitePool,
}

async fn create_app(settings: &sqlite::Settings) -> Result<Router> {
    let db = sqlite::create_pool(settings).await?;
    let app_state = AppState { db };

    let app = Router::new()
        .route("/", get(|| async { "Gym Management API is running" }))
        .route(
            "/api/members",
            get(members::get_members).post(members::create_member),
        )
        .route(
            "/api/members/{id}",
            get(members::get_member_by_id)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // the browser client is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Ok(app)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenv::dotenv().ok();
    dotenv::from_path("./api/.env").ok();

    let start = Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::load()?;
    let app = create_app(&settings.sqlite).await?;

    let listener = TcpListener::bind(settings.bind_address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    // Create a shutdown signal handler
    let shutdown = async move {
        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = signal::ctrl_c() => {},
            _ = terminate => {},
        }
        let duration = start.elapsed();
        info!("Shutting down gracefully... in {:?}", duration);
    };

    // Start the server with graceful shutdown
    let server = serve(listener, app).with_graceful_shutdown(shutdown);

    if let Err(e) = server.await {
        tracing::error!("Server error: {}", e);
    }

    Ok(())
}
