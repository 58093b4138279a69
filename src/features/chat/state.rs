//! Conversation states and the table that decides what each message does.

use crate::data::models::Word;
use crate::features::quiz::QuizRound;

/// Button labels, which double as the commands they trigger.
pub mod labels {
    pub const BEGIN: &str = "Start learning";
    pub const NEXT: &str = "Next ⏭";
    pub const ADD_WORD: &str = "Add word";
    pub const DELETE_WORD: &str = "Delete word";
    pub const RESET: &str = "Reset changes";
}

/// Keyboard shown while waiting for the user to pick an action.
pub const MENU_KEYBOARD: [&str; 3] = [labels::BEGIN, labels::ADD_WORD, labels::RESET];

/// Buttons shown under every card, after the candidates.
pub const CARD_ACTIONS: [&str; 4] = [
    labels::NEXT,
    labels::ADD_WORD,
    labels::DELETE_WORD,
    labels::RESET,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    NextCard,
    AddWord,
    DeleteWord,
    Reset,
    Text(String),
}

impl Event {
    /// Commands win over free text whatever the current state.
    pub fn parse(text: &str) -> Event {
        let text = text.trim();
        // "/start@some_bot" is how group chats address a bot
        let command = match text.split_once('@') {
            Some((command, _)) if text.starts_with('/') => command,
            _ => text,
        };

        match command {
            "/start" => Event::Start,
            "/cards" | labels::BEGIN | labels::NEXT => Event::NextCard,
            labels::ADD_WORD => Event::AddWord,
            labels::DELETE_WORD => Event::DeleteWord,
            labels::RESET => Event::Reset,
            _ => Event::Text(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Standby,
    AwaitingAnswer(QuizRound),
    AwaitingNewWordSource,
    AwaitingNewWordTranslation {
        source_text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Standby,
    AwaitingAnswer,
    AwaitingNewWordSource,
    AwaitingNewWordTranslation,
}

impl ConversationState {
    pub fn kind(&self) -> StateKind {
        match self {
            ConversationState::Standby => StateKind::Standby,
            ConversationState::AwaitingAnswer(_) => StateKind::AwaitingAnswer,
            ConversationState::AwaitingNewWordSource => StateKind::AwaitingNewWordSource,
            ConversationState::AwaitingNewWordTranslation { .. } => {
                StateKind::AwaitingNewWordTranslation
            }
        }
    }
}

/// What the controller does in response to one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Greet,
    ShowCard,
    AskSource,
    DeleteCurrent,
    Reset,
    ShowMenu,
    CheckAnswer,
    AskTranslation,
    SaveWord,
}

pub fn transition(state: StateKind, event: &Event) -> Step {
    match (state, event) {
        (_, Event::Start) => Step::Greet,
        (_, Event::NextCard) => Step::ShowCard,
        (_, Event::AddWord) => Step::AskSource,
        (_, Event::DeleteWord) => Step::DeleteCurrent,
        (_, Event::Reset) => Step::Reset,
        (StateKind::Standby, Event::Text(_)) => Step::ShowMenu,
        (StateKind::AwaitingAnswer, Event::Text(_)) => Step::CheckAnswer,
        (StateKind::AwaitingNewWordSource, Event::Text(_)) => Step::AskTranslation,
        (StateKind::AwaitingNewWordTranslation, Event::Text(_)) => Step::SaveWord,
    }
}

/// Per-user conversation data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: ConversationState,
    /// Target of the last card shown, the word "Delete word" acts on.
    pub current_card: Option<Word>,
}

impl Session {
    pub fn enter_standby(&mut self) {
        self.state = ConversationState::Standby;
        self.current_card = None;
    }
}
