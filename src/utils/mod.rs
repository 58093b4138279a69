pub mod render;
pub mod text;

pub use render::{message_templates, render_template, Message};
pub use text::{normalize_answer, normalize_text, WRONG_MARK};
