use tera::{Context, Tera};

/// Every text the bot can send, one template each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Greeting,
    Standby,
    Card,
    Correct,
    Wrong,
    AskSource,
    AskTranslation,
    WordAdded,
    WordDeleted,
    NothingToDelete,
    Reset,
    NoWords,
    InvalidWord,
}

macro_rules! message_templates {
    ($($variant:ident => $file:literal),* $(,)?) => {
        impl Message {
            pub fn template_name(self) -> &'static str {
                match self {
                    $(Message::$variant => $file,)*
                }
            }
        }

        /// Builds the message templates compiled into the binary.
        pub fn message_templates() -> Result<Tera, tera::Error> {
            let mut tera = Tera::default();
            tera.add_raw_templates(vec![
                $(($file, include_str!(concat!("../../templates/messages/", $file))),)*
            ])?;
            Ok(tera)
        }
    };
}

message_templates! {
    Greeting => "greeting.txt",
    Standby => "standby.txt",
    Card => "card.txt",
    Correct => "correct.txt",
    Wrong => "wrong.txt",
    AskSource => "ask_source.txt",
    AskTranslation => "ask_translation.txt",
    WordAdded => "word_added.txt",
    WordDeleted => "word_deleted.txt",
    NothingToDelete => "nothing_to_delete.txt",
    Reset => "reset.txt",
    NoWords => "no_words.txt",
    InvalidWord => "invalid_word.txt",
}

pub fn render_template(tera: &Tera, message: Message, context: &Context) -> String {
    tera.render(message.template_name(), context)
        .map(|text| text.trim_end().to_string())
        .unwrap_or_else(|e| {
            log::error!("Failed to render {}: {}", message.template_name(), e);
            format!("Error rendering template: {}", message.template_name())
        })
}
