use axum::http::{header, HeaderName, Method};
use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

mod handlers;
mod middleware;
mod models;
mod openai_client;
mod prompts;

#[cfg(test)]
mod testing;


use openai_client::{CompletionGateway, OpenAiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};

// AppState holds the shared gateway client; None when the API key is not
// configured, in which case both endpoints answer with a configuration error.
pub struct AppState {
    pub gateway: Option<Arc<dyn CompletionGateway>>,
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    // Initialize the OpenAI client if an API key is provided
    let gateway: Option<Arc<dyn CompletionGateway>> = match std::env::var("OPENAI_API_KEY").ok() {
        Some(api_key) if !api_key.is_empty() => {
            let base_url = std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
            let model =
                std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
            tracing::info!(model = %model, "Initializing OpenAI chat completion client...");
            Some(Arc::new(
                OpenAiClient::with_base_url(api_key, base_url).with_model(model),
            ))
        }
        _ => {
            tracing::warn!(
                "OPENAI_API_KEY not found. Itinerary and chatbot requests will fail with a configuration error."
            );
            None
        }
    };

    let shared_state = Arc::new(AppState { gateway });

    let app = app(shared_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

// Build the application router with all routes and shared state
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::itinerary::itinerary_routes())
        .merge(handlers::chatbot::chatbot_routes())
        .route("/api/status", axum::routing::get(api_status))
        .layer(axum::middleware::from_fn(
            middleware::logging::request_logging_middleware,
        ))
        .layer(cors_layer())
        .layer(Extension(state))
}

// Single CORS policy shared by every endpoint. Preflight OPTIONS requests are
// answered by the layer itself and never reach a handler.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,tourism_assistant=trace,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,tourism_assistant=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Jharkhand tourism assistant starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );

    let openai_configured = std::env::var("OPENAI_API_KEY").is_ok();
    tracing::info!(
        "Configuration - OpenAI API: {}",
        if openai_configured { "set" } else { "missing" }
    );

    Ok(())
}

// API status endpoint
async fn api_status(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Json<serde_json::Value> {
    use serde_json::json;

    let openai_status = if state.gateway.is_some() {
        "configured"
    } else {
        "not_configured"
    };

    axum::response::Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "openai": openai_status
        },
        "endpoints": {
            "itinerary_planner": "/itinerary-planner",
            "multilingual_chatbot": "/multilingual-chatbot",
            "status": "/api/status"
        }
    }))
}
