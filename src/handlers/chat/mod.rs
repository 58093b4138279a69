pub mod chat;

pub use chat::chat_router;
