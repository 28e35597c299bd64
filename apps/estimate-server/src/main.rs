//! Survey Estimate Server
//!
//! JSON API over the survey cost estimator. Provides REST endpoints for:
//!
//! - Single and batch estimates
//! - The service catalogue
//! - The active pricing tables
//!
//! Pricing is loaded once at start-up, either the built-in tables or a TOML
//! file passed with `--pricing`, and shared read-only across requests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use survey_estimator::{pricing::PricingConfig, Estimator};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{
    handle_estimate, handle_estimate_batch, handle_health, handle_list_service_types,
    handle_pricing,
};

/// Command-line arguments for the estimate server
#[derive(Parser, Debug)]
#[command(name = "estimate-server")]
#[command(about = "JSON API for land survey cost estimates")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// TOML file overriding the built-in pricing tables
    #[arg(long)]
    pricing: Option<PathBuf>,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<Estimator>,
}

impl AppState {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            estimator: Arc::new(estimator),
        }
    }
}

/// Routes without transport middleware; `main` adds rate limiting and CORS
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/service-types", get(handle_list_service_types))
        .route("/api/pricing", get(handle_pricing))
        .route("/api/estimate", post(handle_estimate))
        .route("/api/estimate/batch", post(handle_estimate_batch))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting estimate server on {}:{}", args.host, args.port);

    let pricing = match &args.pricing {
        Some(path) => {
            info!("Loading pricing from {}", path.display());
            PricingConfig::from_file(path)?
        }
        None => PricingConfig::default(),
    };

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit.saturating_mul(2))
            .finish()
            .context("Rate limit must be greater than zero")?,
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Apply middleware
    let app = build_router(AppState::new(Estimator::with_pricing(pricing)))
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
