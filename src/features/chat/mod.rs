pub mod controller;
pub mod error_conversions;
pub mod error_responses;
pub mod state;

pub use controller::ChatController;
pub use state::{ConversationState, Event, StateKind, Step};
