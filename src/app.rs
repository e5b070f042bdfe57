use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, metrics_handler, throttle_middleware, waitlist_handler};
use crate::state::AppState;

// CORS for the signup page: explicit origins only, credentials allowed
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    // tower-http panics on `*` in a list, and credentials rule it out anyway
    if origins.iter().any(|o| o.trim() == "*") {
        anyhow::bail!("wildcard CORS origin is not allowed with credentials, list origins explicitly");
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn build_app(state: Arc<AppState>, cors: CorsLayer, static_dir: Option<&Path>) -> Router {
    // throttle only guards the signup route
    let waitlist = Router::new()
        .route("/api/waitlist", post(waitlist_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            throttle_middleware,
        ));

    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(waitlist);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
