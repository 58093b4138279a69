pub mod chat_models;
pub mod dictionary_models;
pub mod error_models;

pub use chat_models::{ChatReply, ChatRequest, TableCount, WordCount, WordText};
pub use dictionary_models::{
    Deletion, NewWord, ResetSummary, SeedRecord, Table, TablesSnapshot,
    UserAddition, UserDeletion, Word, SENTINEL_USER,
};
pub use error_models::{ChatError, DictionaryError};
