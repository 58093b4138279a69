use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

use crate::data::models::DictionaryError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const CREATE_TABLES: &str =
    include_str!("../../migrations/2024-06-01-000000_create_dictionary/up.sql");

/// Turns on foreign keys for every pooled connection; SQLite leaves them off by default.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        enable_pragmas(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

fn enable_pragmas(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
}

pub fn create_pool(database_url: &str) -> Result<DbPool, DictionaryError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;
    Ok(pool)
}

/// Opens a single connection outside the pool, with the same pragmas.
pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, DictionaryError> {
    let mut conn = SqliteConnection::establish(database_url)?;
    enable_pragmas(&mut conn)?;
    Ok(conn)
}

pub fn create_tables(conn: &mut SqliteConnection) -> Result<(), DictionaryError> {
    conn.batch_execute(CREATE_TABLES)?;
    log::debug!("Dictionary tables are in place");
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    // A single in-memory connection, so every checkout sees the same database
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .expect("in-memory pool");
    create_tables(&mut pool.get().expect("pooled connection")).expect("schema");
    pool
}
