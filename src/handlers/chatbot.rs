// src/handlers/chatbot.rs
use crate::models::chat::{ChatFailure, ChatReply, ChatRequest};
use crate::openai_client::CHAT_GENERATION;
use crate::prompts::build_chat_messages;
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
    routing::{post, Router},
};
use std::sync::Arc;

pub fn chatbot_routes() -> Router {
    Router::new().route("/multilingual-chatbot", post(chat))
}

async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatFailure>)> {
    if payload.message.trim().is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "message must not be empty".to_string(),
        ));
    }

    let Some(gateway) = state.gateway.as_ref() else {
        tracing::error!("chatbot request rejected: OpenAI API key not configured");
        return Err(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "OpenAI API key not configured".to_string(),
        ));
    };

    tracing::info!(
        language = %payload.language,
        history_len = payload.chat_history.len(),
        "processing chatbot message"
    );

    let messages = build_chat_messages(&payload);
    match gateway.complete(messages, CHAT_GENERATION).await {
        Ok(reply) => {
            tracing::info!("chatbot response generated successfully");
            Ok(Json(ChatReply::new(reply, payload.language)))
        }
        Err(e) => {
            tracing::error!(error = %e, "chatbot reply generation failed");
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn failure(status: StatusCode, error: String) -> (StatusCode, Json<ChatFailure>) {
    (status, Json(ChatFailure::new(error)))
}
