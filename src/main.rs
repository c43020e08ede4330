mod config;
mod db;
mod error;
mod llm;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use config::{AppConfig, BookingBackend, ConfigError};
use llm::{GeminiClient, LlmConfig, LlmError};
use rate_limit::{RateLimitConfig, RateLimiter};
use services::assistant::Assistant;
use services::booking::{BookingError, BookingStore, PgBookingStore, RestBookingStore};
use services::testimonials::{self, TestimonialError};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("llm: {0}")]
    Llm(#[from] LlmError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("testimonials: {0}")]
    Testimonials(#[from] TestimonialError),
    #[error("booking store: {0}")]
    Booking(#[from] BookingError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal in deployment.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "concierge failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    // The assistant is the point of the service: no credentials, no start.
    let llm_config = LlmConfig::from_env()?;
    let client = GeminiClient::from_config(&llm_config)?;
    tracing::info!(model = client.model(), credentials = llm_config.ring.len(), "LLM client initialized");
    let assistant = Assistant::from_config(Arc::new(client), llm_config);

    let app_config = AppConfig::from_env()?;
    let bookings = booking_store(&app_config.booking).await?;
    tracing::info!(backend = bookings.backend(), "booking store ready");

    let testimonials = testimonials::load()?;
    let rate_limiter = RateLimiter::new(RateLimitConfig::from_env());

    let state = state::AppState::new(assistant, bookings, testimonials, rate_limiter);
    let app = routes::app(state, &app_config.site_dir);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], app_config.port))).await?;
    tracing::info!(port = app_config.port, site_dir = %app_config.site_dir.display(), "concierge listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

async fn booking_store(backend: &BookingBackend) -> Result<Arc<dyn BookingStore>, StartupError> {
    let store: Arc<dyn BookingStore> = match backend {
        BookingBackend::Rest { base_url, api_key } => Arc::new(RestBookingStore::new(base_url, api_key)?),
        BookingBackend::Postgres { database_url } => {
            Arc::new(PgBookingStore::new(db::init_pool(database_url).await?))
        }
    };
    Ok(store)
}
