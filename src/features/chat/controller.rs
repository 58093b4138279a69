use diesel::SqliteConnection;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tera::{Context, Tera};
use validator::Validate;

use crate::data::models::{ChatError, ChatReply, DictionaryError, Word, WordText, SENTINEL_USER};
use crate::data::repositories::DictionaryRepository;
use crate::data::DbPool;
use crate::features::chat::state::{
    transition, ConversationState, Event, Session, StateKind, Step, CARD_ACTIONS, MENU_KEYBOARD,
};
use crate::features::quiz::{Answer, QuizRound};
use crate::utils::{normalize_text, render_template, Message};

/// Drives one conversation per user on top of the dictionary store.
pub struct ChatController {
    pool: DbPool,
    templates: Tera,
    // Held for the whole message, so messages are handled one at a time
    sessions: Mutex<HashMap<i64, Session>>,
}

impl ChatController {
    pub fn new(pool: DbPool, templates: Tera) -> Self {
        ChatController {
            pool,
            templates,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn handle(&self, user_id: i64, text: &str) -> Result<ChatReply, ChatError> {
        if user_id == SENTINEL_USER {
            log::warn!("Rejected message from reserved user {}", user_id);
            return Err(DictionaryError::ReservedUser(user_id).into());
        }

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.entry(user_id).or_default();
        let mut conn = self.pool.get().map_err(DictionaryError::from)?;

        let event = Event::parse(text);
        let step = transition(session.state.kind(), &event);
        log::debug!(
            "User {} in {:?} sent {:?}: {:?}",
            user_id,
            session.state.kind(),
            event,
            step
        );

        let reply = Turn {
            templates: &self.templates,
            conn: &mut *conn,
            session,
            user_id,
        }
        .run(step, event)?;
        Ok(reply)
    }

    /// State of a user's conversation, if the user ever wrote.
    pub fn state_of(&self, user_id: i64) -> Option<StateKind> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .map(|session| session.state.kind())
    }
}

/// Everything needed to answer a single message.
struct Turn<'a> {
    templates: &'a Tera,
    conn: &'a mut SqliteConnection,
    session: &'a mut Session,
    user_id: i64,
}

impl Turn<'_> {
    fn run(self, step: Step, event: Event) -> Result<ChatReply, ChatError> {
        let text = match event {
            Event::Text(text) => text,
            _ => String::new(),
        };

        match step {
            Step::Greet => self.greet(),
            Step::ShowCard => self.show_card(),
            Step::AskSource => self.ask_source(),
            Step::DeleteCurrent => self.delete_current(),
            Step::Reset => self.reset(),
            Step::ShowMenu => {
                self.session.enter_standby();
                self.menu(None)
            }
            Step::CheckAnswer => self.check_answer(&text),
            Step::AskTranslation => self.ask_translation(&text),
            Step::SaveWord => self.save_word(&text),
        }
    }

    fn render(&self, message: Message, context: &Context) -> String {
        render_template(self.templates, message, context)
    }

    fn render_word(&self, message: Message, word: &Word) -> String {
        let mut context = Context::new();
        context.insert("source", &word.source_text);
        context.insert("translated", &word.translated_text);
        self.render(message, &context)
    }

    /// The action menu, optionally preceded by another message.
    fn menu(self, before: Option<String>) -> Result<ChatReply, ChatError> {
        let count = DictionaryRepository::count_words(self.conn, self.user_id)?;
        let mut context = Context::new();
        context.insert("count", &count);
        let menu = self.render(Message::Standby, &context);

        let text = match before {
            Some(before) => format!("{}\n\n{}", before, menu),
            None => menu,
        };
        Ok(reply(text, MENU_KEYBOARD.iter().map(|label| label.to_string())))
    }

    fn greet(self) -> Result<ChatReply, ChatError> {
        self.session.enter_standby();
        let greeting = self.render(Message::Greeting, &Context::new());
        self.menu(Some(greeting))
    }

    fn show_card(self) -> Result<ChatReply, ChatError> {
        let words = DictionaryRepository::draw_words(self.conn, self.user_id)?;

        let Some(round) = QuizRound::from_draw(words, &mut rand::thread_rng()) else {
            log::info!("User {} has no words left to study", self.user_id);
            self.session.enter_standby();
            let empty = self.render(Message::NoWords, &Context::new());
            return self.menu(Some(empty));
        };

        let mut context = Context::new();
        context.insert("translated", &round.target.translated_text);
        let text = self.render(Message::Card, &context);
        let keyboard = card_keyboard(&round);

        self.session.current_card = Some(round.target.clone());
        self.session.state = ConversationState::AwaitingAnswer(round);
        Ok(reply(text, keyboard))
    }

    fn check_answer(self, text: &str) -> Result<ChatReply, ChatError> {
        let ConversationState::AwaitingAnswer(round) = &mut self.session.state else {
            return self.menu(None);
        };

        match round.answer(text) {
            Answer::Correct => {
                let target = round.target.clone();
                // The card stays current so it can still be deleted
                self.session.state = ConversationState::Standby;
                let text = self.render_word(Message::Correct, &target);
                Ok(reply(text, CARD_ACTIONS.iter().map(|label| label.to_string())))
            }
            Answer::Wrong => {
                let keyboard = card_keyboard(round);
                let mut context = Context::new();
                context.insert("translated", &round.target.translated_text);
                let text = self.render(Message::Wrong, &context);
                Ok(reply(text, keyboard))
            }
        }
    }

    fn ask_source(self) -> Result<ChatReply, ChatError> {
        self.session.state = ConversationState::AwaitingNewWordSource;
        let text = self.render(Message::AskSource, &Context::new());
        Ok(reply(text, Vec::new()))
    }

    fn ask_translation(self, text: &str) -> Result<ChatReply, ChatError> {
        let Some(source_text) = valid_word_text(text) else {
            return Ok(self.invalid_word());
        };

        self.session.state = ConversationState::AwaitingNewWordTranslation { source_text };
        let text = self.render(Message::AskTranslation, &Context::new());
        Ok(reply(text, Vec::new()))
    }

    fn save_word(self, text: &str) -> Result<ChatReply, ChatError> {
        let Some(translated_text) = valid_word_text(text) else {
            return Ok(self.invalid_word());
        };
        let ConversationState::AwaitingNewWordTranslation { source_text } = &self.session.state
        else {
            return self.menu(None);
        };

        let word =
            DictionaryRepository::add_word(self.conn, self.user_id, source_text, &translated_text)?;
        self.session.enter_standby();
        let added = self.render_word(Message::WordAdded, &word);
        self.menu(Some(added))
    }

    fn invalid_word(self) -> ChatReply {
        let text = self.render(Message::InvalidWord, &Context::new());
        reply(text, Vec::new())
    }

    fn delete_current(self) -> Result<ChatReply, ChatError> {
        let before = match self.session.current_card.take() {
            Some(word) => {
                DictionaryRepository::del_word(self.conn, self.user_id, word.id)?;
                self.render_word(Message::WordDeleted, &word)
            }
            None => self.render(Message::NothingToDelete, &Context::new()),
        };
        self.session.enter_standby();
        self.menu(Some(before))
    }

    fn reset(self) -> Result<ChatReply, ChatError> {
        DictionaryRepository::reset_db(self.conn, self.user_id)?;
        self.session.enter_standby();
        let done = self.render(Message::Reset, &Context::new());
        self.menu(Some(done))
    }
}

fn reply(text: String, keyboard: impl IntoIterator<Item = String>) -> ChatReply {
    ChatReply {
        text,
        keyboard: keyboard.into_iter().collect(),
    }
}

fn card_keyboard(round: &QuizRound) -> Vec<String> {
    round
        .labels()
        .into_iter()
        .chain(CARD_ACTIONS.iter().map(|label| label.to_string()))
        .collect()
}

fn valid_word_text(text: &str) -> Option<String> {
    let word = WordText {
        text: normalize_text(text),
    };
    match word.validate() {
        Ok(()) => Some(word.text),
        Err(e) => {
            log::debug!("Rejected word text {:?}: {}", text, e);
            None
        }
    }
}
