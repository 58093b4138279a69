use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::models::DictionaryError;
use crate::schema::{dictionary, words_del, words_user};

/// User id whose additions are visible to everybody.
pub const SENTINEL_USER: i64 = 0;

/// A shared dictionary entry
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = dictionary)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Word {
    pub id: i32,
    pub source_text: String,
    pub translated_text: String,
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_text, self.translated_text)
    }
}

#[derive(Insertable)]
#[diesel(table_name = dictionary)]
pub struct NewWord<'a> {
    pub source_text: &'a str,
    pub translated_text: &'a str,
}

/// Row of `words_user`: `word_id` is visible to `user_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = words_user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserAddition {
    pub user_id: i64,
    pub word_id: i32,
}

/// Row of `words_del`: `user_id` opted out of `word_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = words_del)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDeletion {
    pub user_id: i64,
    pub word_id: i32,
}

/// One entry of the seed file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SeedRecord {
    #[serde(alias = "target_word")]
    pub source_text: String,
    #[serde(alias = "translate")]
    pub translated_text: String,
}

/// What `del_word` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Deletion {
    /// The word belonged to the user and is gone from the dictionary
    Removed,
    /// A shared word is now hidden for the user
    Hidden,
    /// The shared word was already hidden
    AlreadyHidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub removed_words: usize,
    pub restored_words: usize,
}

/// Full contents of the three tables
#[derive(Debug, Serialize)]
pub struct TablesSnapshot {
    pub dictionary: Vec<Word>,
    pub words_user: Vec<UserAddition>,
    pub words_del: Vec<UserDeletion>,
}

/// The tables `amount_data` can count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Dictionary,
    WordsUser,
    WordsDel,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Dictionary => "dictionary",
            Table::WordsUser => "words_user",
            Table::WordsDel => "words_del",
        }
    }
}

impl FromStr for Table {
    type Err = DictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dictionary" => Ok(Table::Dictionary),
            "words_user" => Ok(Table::WordsUser),
            "words_del" => Ok(Table::WordsDel),
            other => Err(DictionaryError::UnknownTable(other.to_string())),
        }
    }
}
