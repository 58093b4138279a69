pub mod chat;
pub mod words;

use axum::Router;
use std::sync::Arc;

use crate::data::DbPool;
use crate::features::chat::ChatController;

/// Routes served under `/api`.
pub fn api_router(pool: DbPool, controller: Arc<ChatController>, debug_routes: bool) -> Router {
    Router::new()
        .merge(chat::chat_router(controller))
        .merge(words::words_router(pool, debug_routes))
}
