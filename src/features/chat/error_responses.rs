use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::{ChatError, DictionaryError};

fn error_body(status: StatusCode, message: String) -> Response {
    let body = json!({
        "error": message,
        "status": status.as_u16()
    });

    (status, axum::Json(body)).into_response()
}

impl IntoResponse for DictionaryError {
    fn into_response(self) -> Response {
        let status = match self {
            DictionaryError::UnknownTable(_) => StatusCode::NOT_FOUND,
            DictionaryError::ReservedUser(_) => StatusCode::FORBIDDEN,
            DictionaryError::PoolError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("Dictionary store failure: {}", self);
        }
        error_body(status, self.to_string())
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            ChatError::Dictionary(e) => e.into_response(),
            ChatError::ValidationError(e) => {
                error_body(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e))
            }
        }
    }
}
