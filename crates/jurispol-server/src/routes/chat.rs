//! Chat relay routes.
//! `POST /api/chat` keeps the response shapes the browser client expects.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};

use crate::state::AppState;
use jurispol_chat::config::{
    INTERNAL_ERROR, INVALID_BODY_ERROR, MISSING_KEY_DETAILS, MISSING_MESSAGE_ERROR,
    OVERLOADED_DETAILS, OVERLOADED_ERROR,
};
use jurispol_chat::types::{ChatRequest, ChatStatus, ErrorBody};
use jurispol_chat::RelayError;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/status", get(get_status))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    info!("Chat request received");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                INVALID_BODY_ERROR,
                Some(rejection.body_text()),
            );
        }
    };

    match state.relay.handle(request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => relay_error_response(&e),
    }
}

/// GET /api/chat/status — whether the provider is usable.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<ChatStatus> {
    Json(ChatStatus {
        provider_configured: state.relay.is_configured(),
        model: state
            .relay
            .model_id()
            .unwrap_or(&state.config.model)
            .to_string(),
        search_grounding: true,
    })
}

fn relay_error_response(err: &RelayError) -> Response {
    match err {
        RelayError::MissingMessage => {
            error_response(StatusCode::BAD_REQUEST, MISSING_MESSAGE_ERROR, None)
        }
        RelayError::Quota(_) => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            OVERLOADED_ERROR,
            Some(OVERLOADED_DETAILS.to_string()),
        ),
        RelayError::Unconfigured => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            Some(MISSING_KEY_DETAILS.to_string()),
        ),
        RelayError::Upstream(detail) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            Some(detail.clone()),
        ),
    }
}

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: Some(error.to_string()),
            details,
        }),
    )
        .into_response()
}
