use serde::{Deserialize, Serialize};
use validator::Validate;

/// A message forwarded by the chat transport
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    pub user_id: i64,
    #[validate(length(min = 1, max = 4096, message = "Message must be 1 to 4096 characters"))]
    pub text: String,
}

/// What the transport should render back to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub keyboard: Vec<String>,
}

/// One side of a word typed in during the add-word flow.
/// Limits match the `VARCHAR(100)` columns of `dictionary`.
#[derive(Debug, Validate)]
pub struct WordText {
    #[validate(length(min = 1, max = 100))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordCount {
    pub user_id: i64,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TableCount {
    pub table: String,
    pub count: i64,
}
