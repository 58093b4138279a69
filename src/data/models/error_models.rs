use diesel::result::Error as DieselError;
use thiserror::Error;

// Dictionary store errors
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),
    #[error("Connection error: {0}")]
    ConnectionError(#[from] diesel::ConnectionError),
    #[error("Failed to read seed file: {0}")]
    SeedFileError(#[from] std::io::Error),
    #[error("Malformed seed data: {0}")]
    SeedFormatError(#[from] serde_json::Error),
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("User {0} holds the shared dictionary and cannot change it")]
    ReservedUser(i64),
}

// Chat endpoint errors
#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error("Invalid request: {0}")]
    ValidationError(String),
}
