use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::client_ip::ClientIp;
use crate::email;
use crate::error::WaitlistError;
use crate::metrics::{REQUEST_TOTAL, SIGNUPS_TOTAL, THROTTLE_DENIED, UPSTREAM_LATENCY};
use crate::models::{ApiResponse, WaitlistRequest};
use crate::rate_limit::Decision;
use crate::state::AppState;

// Throttle in front of the signup route; runs before the body is looked at,
// so malformed submissions still use up a slot
pub async fn throttle_middleware(
    State(state): State<Arc<AppState>>,
    client: ClientIp,
    request: Request,
    next: Next,
) -> Response {
    REQUEST_TOTAL.inc();

    match state.throttle.check(client.as_str()) {
        Decision::Admit => next.run(request).await,
        Decision::Deny => {
            THROTTLE_DENIED.inc();
            info!(client = %client.as_str(), "Waitlist submission throttled");
            WaitlistError::RateLimited.into_response()
        }
    }
}

pub async fn waitlist_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WaitlistRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, WaitlistError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(%rejection, "Unreadable waitlist body");
            WaitlistRequest::default()
        }
    };

    let email = request
        .email
        .as_ref()
        .and_then(email::sanitize)
        .ok_or(WaitlistError::EmailRequired)?;

    if !email::is_valid(&email) {
        return Err(WaitlistError::InvalidEmail);
    }

    let start_time = Instant::now();

    state.provider.create_contact(&email).await?;
    state.provider.send_confirmation(&email).await?;

    UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());
    SIGNUPS_TOTAL.inc();

    let domain = email.rsplit('@').next().unwrap_or_default();
    info!(%domain, "Added contact to waitlist");

    Ok(Json(ApiResponse::ok("Successfully added to waitlist!")))
}
