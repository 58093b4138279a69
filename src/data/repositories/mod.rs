pub mod dictionary;

pub use dictionary::{DictionaryRepository, QUIZ_SIZE};
