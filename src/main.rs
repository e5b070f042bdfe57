use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use waitlist_gateway::{
    AppState, Throttle, app,
    brevo::BrevoClient,
    clock::SystemClock,
    config::Args,
};

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let brevo_config = args.brevo_config();
    if brevo_config.api_key.is_none() {
        warn!("BREVO_API_KEY is not set, signups will fail with a configuration error");
    }
    let provider = Arc::new(BrevoClient::new(brevo_config)?);

    let throttle = Throttle::new(args.throttle_config(), Arc::new(SystemClock));
    let state = Arc::new(AppState::new(throttle, provider, args.trust_proxy));

    let origins = args.allowed_origins();
    let cors = app::cors_layer(&origins)?;
    let app = app::build_app(state, cors, args.static_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        environment = ?args.environment,
        origins = ?origins,
        rate_limit = args.rate_limit,
        rate_window_secs = args.rate_window,
        trust_proxy = args.trust_proxy,
        "Waitlist gateway listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
