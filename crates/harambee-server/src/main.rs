use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use harambee_api::{AppState, AppStateInner};
use harambee_store::{MemStore, SharedStore};

mod demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "harambee_server=debug,harambee_api=debug,harambee_core=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("HARAMBEE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let host = std::env::var("HARAMBEE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("HARAMBEE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let demo_data = std::env::var("HARAMBEE_DEMO_DATA")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    // Shared state
    let store: SharedStore = Arc::new(MemStore::new());
    if demo_data {
        demo::seed(store.as_ref())?;
        info!("demo data seeded");
    }
    let state: AppState = Arc::new(AppStateInner { store, jwt_secret });

    let app = harambee_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Harambee server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
