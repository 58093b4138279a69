use diesel::dsl::{exists, sql};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::sql_types::Integer;
use diesel::sqlite::Sqlite;
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;

use crate::data::models::{
    Deletion, DictionaryError, NewWord, ResetSummary, SeedRecord, Table, TablesSnapshot,
    UserAddition, UserDeletion, Word, SENTINEL_USER,
};
use crate::schema::{dictionary, words_del, words_user};
use crate::utils::normalize_text;

/// Words drawn for one quiz round: the target plus three distractors.
pub const QUIZ_SIZE: usize = 4;

/// Only real users may change the store; the sentinel's rows are the shared dictionary.
fn ensure_regular_user(user_id: i64) -> Result<(), DictionaryError> {
    if user_id == SENTINEL_USER {
        return Err(DictionaryError::ReservedUser(user_id));
    }
    Ok(())
}

/// Words visible to `user_id`: shared or personally added, minus the ones
/// this user hid.
fn visible_words(user_id: i64) -> dictionary::BoxedQuery<'static, Sqlite> {
    let added = words_user::table
        .filter(words_user::user_id.eq(SENTINEL_USER).or(words_user::user_id.eq(user_id)))
        .select(words_user::word_id);
    let hidden = words_del::table
        .filter(words_del::user_id.eq(user_id))
        .select(words_del::word_id);

    dictionary::table
        .filter(dictionary::id.eq_any(added))
        .filter(dictionary::id.ne_all(hidden))
        .into_boxed()
}

pub struct DictionaryRepository;

impl DictionaryRepository {
    pub fn add_word(
        conn: &mut SqliteConnection,
        user_id: i64,
        source_text: &str,
        translated_text: &str,
    ) -> Result<Word, DictionaryError> {
        ensure_regular_user(user_id)?;
        let word = conn.transaction::<_, DictionaryError, _>(|conn| {
            insert_word(conn, user_id, source_text, translated_text)
        })?;
        log::info!("User {} added word {} ({})", user_id, word.id, word);
        Ok(word)
    }

    pub fn del_word(
        conn: &mut SqliteConnection,
        user_id: i64,
        word_id: i32,
    ) -> Result<Deletion, DictionaryError> {
        ensure_regular_user(user_id)?;
        let deletion = conn.transaction::<_, DictionaryError, _>(|conn| {
            let own = words_user::table
                .filter(words_user::user_id.eq(user_id))
                .filter(words_user::word_id.eq(word_id));

            if diesel::select(exists(own.clone())).get_result::<bool>(conn)? {
                diesel::delete(own).execute(conn)?;
                // Other users lose the word as well
                diesel::delete(dictionary::table.find(word_id)).execute(conn)?;
                return Ok(Deletion::Removed);
            }

            let hidden = diesel::insert_into(words_del::table)
                .values(&UserDeletion { user_id, word_id })
                .execute(conn);

            match hidden {
                Ok(_) => Ok(Deletion::Hidden),
                Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    log::debug!("Word {} already hidden for user {}", word_id, user_id);
                    Ok(Deletion::AlreadyHidden)
                }
                Err(e) => Err(e.into()),
            }
        })?;

        log::info!("User {} deleted word {}: {:?}", user_id, word_id, deletion);
        Ok(deletion)
    }

    pub fn reset_db(conn: &mut SqliteConnection, user_id: i64) -> Result<ResetSummary, DictionaryError> {
        ensure_regular_user(user_id)?;

        let summary = conn.transaction::<_, DictionaryError, _>(|conn| {
            let own_words = words_user::table
                .filter(words_user::user_id.eq(user_id))
                .select(words_user::word_id);

            let removed_words =
                diesel::delete(dictionary::table.filter(dictionary::id.eq_any(own_words)))
                    .execute(conn)?;
            let restored_words =
                diesel::delete(words_del::table.filter(words_del::user_id.eq(user_id)))
                    .execute(conn)?;

            Ok(ResetSummary {
                removed_words,
                restored_words,
            })
        })?;

        log::info!(
            "User {} reset: {} own words removed, {} shared words restored",
            user_id,
            summary.removed_words,
            summary.restored_words
        );
        Ok(summary)
    }

    /// Number of words `user_id` can currently study.
    pub fn count_words(conn: &mut SqliteConnection, user_id: i64) -> Result<i64, DictionaryError> {
        Ok(visible_words(user_id).count().get_result::<i64>(conn)?)
    }

    /// Up to four random visible words; the first one is the quiz target.
    pub fn draw_words(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<Word>, DictionaryError> {
        let mut words = visible_words(user_id)
            .select(Word::as_select())
            .load::<Word>(conn)?;

        words.shuffle(&mut rand::thread_rng());
        words.truncate(QUIZ_SIZE);
        Ok(words)
    }

    pub fn amount_data(conn: &mut SqliteConnection, table: Table) -> Result<i64, DictionaryError> {
        let count: i64 = match table {
            Table::Dictionary => dictionary::table.count().get_result(conn)?,
            Table::WordsUser => words_user::table.count().get_result(conn)?,
            Table::WordsDel => words_del::table.count().get_result(conn)?,
        };
        Ok(count)
    }

    /// Imports shared words; every record becomes visible to all users.
    /// Whitespace is normalised the same way typed words are.
    pub fn load_data(conn: &mut SqliteConnection, records: &[SeedRecord]) -> Result<usize, DictionaryError> {
        conn.transaction::<_, DictionaryError, _>(|conn| {
            for record in records {
                insert_word(
                    conn,
                    SENTINEL_USER,
                    &normalize_text(&record.source_text),
                    &normalize_text(&record.translated_text),
                )?;
            }
            Ok(())
        })?;

        log::info!("Loaded {} shared words", records.len());
        Ok(records.len())
    }

    pub fn load_seed_file(conn: &mut SqliteConnection, path: &Path) -> Result<usize, DictionaryError> {
        let content = fs::read_to_string(path)?;
        let records: Vec<SeedRecord> = serde_json::from_str(&content)?;
        Self::load_data(conn, &records)
    }

    pub fn snapshot(conn: &mut SqliteConnection) -> Result<TablesSnapshot, DictionaryError> {
        Ok(TablesSnapshot {
            dictionary: dictionary::table
                .order(dictionary::id)
                .select(Word::as_select())
                .load(conn)?,
            words_user: words_user::table
                .order((words_user::user_id, words_user::word_id))
                .select(UserAddition::as_select())
                .load(conn)?,
            words_del: words_del::table
                .order((words_del::user_id, words_del::word_id))
                .select(UserDeletion::as_select())
                .load(conn)?,
        })
    }
}

fn insert_word(
    conn: &mut SqliteConnection,
    user_id: i64,
    source_text: &str,
    translated_text: &str,
) -> Result<Word, DictionaryError> {
    diesel::insert_into(dictionary::table)
        .values(&NewWord {
            source_text,
            translated_text,
        })
        .execute(conn)?;

    let word_id = diesel::select(sql::<Integer>("last_insert_rowid()")).get_result::<i32>(conn)?;

    diesel::insert_into(words_user::table)
        .values(&UserAddition { user_id, word_id })
        .execute(conn)?;

    Ok(Word {
        id: word_id,
        source_text: source_text.to_string(),
        translated_text: translated_text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::database::{create_tables, establish_connection};
    use std::collections::HashSet;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn seeded(count: usize) -> SqliteConnection {
        let mut conn = establish_connection(":memory:").unwrap();
        create_tables(&mut conn).unwrap();
        let records: Vec<SeedRecord> = (0..count)
            .map(|i| SeedRecord {
                source_text: format!("word{}", i),
                translated_text: format!("слово{}", i),
            })
            .collect();
        DictionaryRepository::load_data(&mut conn, &records).unwrap();
        conn
    }

    fn first_shared_id(conn: &mut SqliteConnection) -> i32 {
        words_user::table
            .filter(words_user::user_id.eq(SENTINEL_USER))
            .select(words_user::word_id)
            .order(words_user::word_id)
            .first(conn)
            .unwrap()
    }

    fn visible_ids(conn: &mut SqliteConnection, user_id: i64) -> HashSet<i32> {
        visible_words(user_id)
            .select(dictionary::id)
            .load::<i32>(conn)
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn users_without_changes_see_shared_words() {
        let mut conn = seeded(10);
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 10);
        assert_eq!(DictionaryRepository::count_words(&mut conn, 42).unwrap(), 10);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::Dictionary).unwrap(), 10);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::WordsUser).unwrap(), 10);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::WordsDel).unwrap(), 0);
    }

    #[test]
    fn added_word_is_private() {
        let mut conn = seeded(3);
        let word = DictionaryRepository::add_word(&mut conn, ALICE, "cat", "кот").unwrap();

        assert_eq!(word.source_text, "cat");
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 4);
        assert_eq!(DictionaryRepository::count_words(&mut conn, BOB).unwrap(), 3);
        assert!(visible_ids(&mut conn, ALICE).contains(&word.id));
        assert!(!visible_ids(&mut conn, BOB).contains(&word.id));
    }

    #[test]
    fn deleting_shared_word_hides_it_for_one_user() {
        let mut conn = seeded(5);
        let shared = first_shared_id(&mut conn);

        let deletion = DictionaryRepository::del_word(&mut conn, ALICE, shared).unwrap();

        assert_eq!(deletion, Deletion::Hidden);
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 4);
        assert_eq!(DictionaryRepository::count_words(&mut conn, BOB).unwrap(), 5);
        assert!(!visible_ids(&mut conn, ALICE).contains(&shared));
    }

    #[test]
    fn deleting_shared_word_twice_is_idempotent() {
        let mut conn = seeded(5);
        let shared = first_shared_id(&mut conn);

        DictionaryRepository::del_word(&mut conn, ALICE, shared).unwrap();
        let again = DictionaryRepository::del_word(&mut conn, ALICE, shared).unwrap();

        assert_eq!(again, Deletion::AlreadyHidden);
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 4);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::WordsDel).unwrap(), 1);
    }

    #[test]
    fn word_hidden_by_two_users_stays_hidden_for_both() {
        let mut conn = seeded(5);
        let shared = first_shared_id(&mut conn);

        DictionaryRepository::del_word(&mut conn, ALICE, shared).unwrap();
        DictionaryRepository::del_word(&mut conn, BOB, shared).unwrap();

        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 4);
        assert_eq!(DictionaryRepository::count_words(&mut conn, BOB).unwrap(), 4);
        assert_eq!(DictionaryRepository::count_words(&mut conn, 3).unwrap(), 5);
    }

    #[test]
    fn deleting_own_word_removes_it_from_dictionary() {
        let mut conn = seeded(2);
        let word = DictionaryRepository::add_word(&mut conn, ALICE, "cat", "кот").unwrap();
        // Bob hides it too, which must not block the removal
        DictionaryRepository::del_word(&mut conn, BOB, word.id).unwrap();

        let deletion = DictionaryRepository::del_word(&mut conn, ALICE, word.id).unwrap();

        assert_eq!(deletion, Deletion::Removed);
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 2);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::Dictionary).unwrap(), 2);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::WordsDel).unwrap(), 0);
        for user in [ALICE, BOB, 3] {
            assert!(!visible_ids(&mut conn, user).contains(&word.id));
        }
    }

    #[test]
    fn deleting_unknown_word_fails() {
        let mut conn = seeded(1);
        let result = DictionaryRepository::del_word(&mut conn, ALICE, 999);
        assert!(matches!(result, Err(DictionaryError::DatabaseError(_))));
    }

    #[test]
    fn reset_restores_shared_view() {
        let mut conn = seeded(4);
        let shared = first_shared_id(&mut conn);
        DictionaryRepository::del_word(&mut conn, ALICE, shared).unwrap();
        DictionaryRepository::add_word(&mut conn, ALICE, "cat", "кот").unwrap();
        DictionaryRepository::add_word(&mut conn, ALICE, "dog", "собака").unwrap();
        DictionaryRepository::add_word(&mut conn, BOB, "owl", "сова").unwrap();

        let summary = DictionaryRepository::reset_db(&mut conn, ALICE).unwrap();

        assert_eq!(
            summary,
            ResetSummary {
                removed_words: 2,
                restored_words: 1
            }
        );
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 4);
        assert_eq!(DictionaryRepository::count_words(&mut conn, BOB).unwrap(), 5);
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::WordsUser).unwrap(), 5);
    }

    #[test]
    fn shared_dictionary_cannot_be_reset() {
        let mut conn = seeded(2);
        assert!(matches!(
            DictionaryRepository::reset_db(&mut conn, SENTINEL_USER),
            Err(DictionaryError::ReservedUser(SENTINEL_USER))
        ));
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::Dictionary).unwrap(), 2);
    }

    #[test]
    fn shared_dictionary_cannot_be_edited_as_a_user() {
        let mut conn = seeded(3);
        let shared = first_shared_id(&mut conn);

        assert!(matches!(
            DictionaryRepository::add_word(&mut conn, SENTINEL_USER, "cat", "кот"),
            Err(DictionaryError::ReservedUser(SENTINEL_USER))
        ));
        assert!(matches!(
            DictionaryRepository::del_word(&mut conn, SENTINEL_USER, shared),
            Err(DictionaryError::ReservedUser(SENTINEL_USER))
        ));
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::Dictionary).unwrap(), 3);
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), 3);
    }

    #[test]
    fn seed_text_is_normalised() {
        let mut conn = seeded(0);
        let records = vec![SeedRecord {
            source_text: " ice  cream ".into(),
            translated_text: "мороженое\n".into(),
        }];

        DictionaryRepository::load_data(&mut conn, &records).unwrap();

        let words = DictionaryRepository::draw_words(&mut conn, ALICE).unwrap();
        assert_eq!(words[0].source_text, "ice cream");
        assert_eq!(words[0].translated_text, "мороженое");
    }

    #[test]
    fn draw_returns_four_distinct_visible_words() {
        let mut conn = seeded(10);
        let shared = first_shared_id(&mut conn);
        DictionaryRepository::del_word(&mut conn, ALICE, shared).unwrap();
        let visible = visible_ids(&mut conn, ALICE);

        for _ in 0..20 {
            let words = DictionaryRepository::draw_words(&mut conn, ALICE).unwrap();
            let ids: HashSet<i32> = words.iter().map(|w| w.id).collect();
            assert_eq!(words.len(), QUIZ_SIZE);
            assert_eq!(ids.len(), QUIZ_SIZE);
            assert!(ids.is_subset(&visible));
        }
    }

    #[test]
    fn draw_is_not_padded_for_small_dictionaries() {
        let mut conn = seeded(2);
        assert_eq!(DictionaryRepository::draw_words(&mut conn, ALICE).unwrap().len(), 2);

        let mut empty = seeded(0);
        assert!(DictionaryRepository::draw_words(&mut empty, ALICE).unwrap().is_empty());
        assert_eq!(DictionaryRepository::count_words(&mut empty, ALICE).unwrap(), 0);
    }

    #[test]
    fn overlay_scenario() {
        let mut conn = seeded(10);
        assert_eq!(DictionaryRepository::count_words(&mut conn, 1).unwrap(), 10);

        let shared = first_shared_id(&mut conn);
        DictionaryRepository::del_word(&mut conn, 1, shared).unwrap();
        assert_eq!(DictionaryRepository::count_words(&mut conn, 1).unwrap(), 9);
        assert_eq!(DictionaryRepository::count_words(&mut conn, 2).unwrap(), 10);

        DictionaryRepository::add_word(&mut conn, 1, "dog", "собака").unwrap();
        assert_eq!(DictionaryRepository::count_words(&mut conn, 1).unwrap(), 10);

        DictionaryRepository::reset_db(&mut conn, 1).unwrap();
        assert_eq!(DictionaryRepository::count_words(&mut conn, 1).unwrap(), 10);
        assert!(visible_ids(&mut conn, 1).contains(&shared));
    }

    #[test]
    fn seed_file_is_loaded_once_parsed() {
        let mut conn = establish_connection(":memory:").unwrap();
        create_tables(&mut conn).unwrap();
        let path = std::env::temp_dir().join(format!("seed-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"source_text": "sun", "translated_text": "солнце"},
                {"target_word": "moon", "translate": "луна"}]"#,
        )
        .unwrap();

        let loaded = DictionaryRepository::load_seed_file(&mut conn, &path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, 2);
        let snapshot = DictionaryRepository::snapshot(&mut conn).unwrap();
        assert_eq!(snapshot.dictionary[1].source_text, "moon");
        assert!(snapshot.words_user.iter().all(|row| row.user_id == SENTINEL_USER));
        assert!(snapshot.words_del.is_empty());
    }

    #[test]
    fn bundled_seed_file_loads() {
        let mut conn = establish_connection(":memory:").unwrap();
        create_tables(&mut conn).unwrap();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/seed_words.json");

        let loaded = DictionaryRepository::load_seed_file(&mut conn, &path).unwrap();

        assert!(loaded >= QUIZ_SIZE);
        assert_eq!(DictionaryRepository::count_words(&mut conn, ALICE).unwrap(), loaded as i64);
    }

    #[test]
    fn malformed_seed_file_is_an_error() {
        let mut conn = establish_connection(":memory:").unwrap();
        create_tables(&mut conn).unwrap();
        let path = std::env::temp_dir().join(format!("bad-seed-{}.json", std::process::id()));
        fs::write(&path, r#"[{"source_text": "sun"}]"#).unwrap();

        let result = DictionaryRepository::load_seed_file(&mut conn, &path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(DictionaryError::SeedFormatError(_))));
        assert_eq!(DictionaryRepository::amount_data(&mut conn, Table::Dictionary).unwrap(), 0);
    }
}
