use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    data::models::{ChatError, ChatReply, ChatRequest},
    features::chat::ChatController,
};

#[axum::debug_handler]
pub async fn handle_message(
    State(controller): State<Arc<ChatController>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ChatError> {
    request.validate().map_err(|e| {
        log::warn!("Rejected message from user {}: {}", request.user_id, e);
        ChatError::from(e)
    })?;

    let reply = controller.handle(request.user_id, &request.text).map_err(|e| {
        log::error!("Failed to handle message from user {}: {}", request.user_id, e);
        e
    })?;

    Ok(Json(reply))
}

pub fn chat_router(controller: Arc<ChatController>) -> Router {
    Router::new()
        .route("/chat", post(handle_message))
        .with_state(controller)
}
