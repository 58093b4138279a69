use validator::ValidationErrors;

use crate::data::models::ChatError;

impl From<ValidationErrors> for ChatError {
    fn from(err: ValidationErrors) -> Self {
        ChatError::ValidationError(err.to_string())
    }
}
