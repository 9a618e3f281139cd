//! HTTP bridge between the browser editor and the local filesystem.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/` | Deploy a layout and its logic file |
//! | OPTIONS | any | CORS preflight |
//! | GET | `/health` | Liveness probe |

pub mod dto;
pub mod error;
pub mod handlers;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, Request, Response};
use axum::routing::{get, post};
use axum::Router;
use bridge_config::BridgeConfig;
use bridge_store::DeployStore;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest deploy body accepted.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub config: BridgeConfig,
    pub store: DeployStore,
}

impl ServerState {
    pub fn new(config: BridgeConfig) -> Self {
        let store = DeployStore::new(&config);
        Self { config, store }
    }
}

/// Builds the bridge router.
///
/// Every response, errors included, carries `Access-Control-Allow-Origin: *`.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", post(handlers::deploy::deploy))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve<F>(config: BridgeConfig, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    serve_with_listener(listener, config, shutdown).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    config: BridgeConfig,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Bridge active on http://{}", listener.local_addr()?);
    info!("Writing deploys under {}", config.base_dir.display());

    let state = Arc::new(ServerState::new(config));
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Bridge stopped");
    Ok(())
}
