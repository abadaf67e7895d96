// src/handlers/itinerary.rs
use crate::models::itinerary::{Itinerary, ItineraryEnvelope, ItineraryFailure, ItineraryRequest};
use crate::openai_client::ITINERARY_GENERATION;
use crate::prompts::build_itinerary_messages;
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
    routing::{post, Router},
};
use std::sync::Arc;

pub fn itinerary_routes() -> Router {
    Router::new().route("/itinerary-planner", post(plan_itinerary))
}

async fn plan_itinerary(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ItineraryRequest>,
) -> Result<Json<ItineraryEnvelope>, (StatusCode, Json<ItineraryFailure>)> {
    if payload.duration <= 0 {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "duration must be a positive number of days".to_string(),
        ));
    }

    let Some(gateway) = state.gateway.as_ref() else {
        tracing::error!("itinerary request rejected: OpenAI API key not configured");
        return Err(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "OpenAI API key not configured".to_string(),
        ));
    };

    tracing::info!(
        duration = payload.duration,
        language = %payload.language,
        interests = payload.interests.len(),
        "generating itinerary"
    );

    let messages = build_itinerary_messages(&payload);
    let raw = match gateway.complete(messages, ITINERARY_GENERATION).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "itinerary generation failed");
            return Err(failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let itinerary = Itinerary::from_model_output(&raw);
    if matches!(itinerary, Itinerary::PlainText(_)) {
        tracing::info!("model output was not structured JSON, using plain text fallback");
    } else {
        tracing::info!("itinerary generated successfully");
    }

    Ok(Json(ItineraryEnvelope { itinerary }))
}

fn failure(status: StatusCode, error: String) -> (StatusCode, Json<ItineraryFailure>) {
    (
        status,
        Json(ItineraryFailure {
            error,
            details: "Failed to generate itinerary. Please try again.".to_string(),
        }),
    )
}
