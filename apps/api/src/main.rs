use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use shared_config::AppConfig;
use shared_database::{AppState, SupabaseStore};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting slot booking API server");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    // Refuse to serve without a reachable store.
    let store = match SupabaseStore::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Could not connect to the database: {}", e);
            process::exit(1);
        }
    };
    info!("Connected to database at {}", config.supabase_url);

    let port = config.port;
    let state = AppState::new(config, Arc::new(store));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };
    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
