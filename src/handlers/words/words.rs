use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};

use crate::{
    data::models::{DictionaryError, Table, TableCount, TablesSnapshot, WordCount},
    data::repositories::DictionaryRepository,
    data::DbPool,
};

pub async fn count_words(
    State(pool): State<DbPool>,
    Path(user_id): Path<i64>,
) -> Result<Json<WordCount>, DictionaryError> {
    let mut conn = pool.get()?;
    let count = DictionaryRepository::count_words(&mut conn, user_id)?;
    Ok(Json(WordCount { user_id, count }))
}

pub async fn dump_tables(
    State(pool): State<DbPool>,
) -> Result<Json<TablesSnapshot>, DictionaryError> {
    let mut conn = pool.get()?;
    let snapshot = DictionaryRepository::snapshot(&mut conn)?;
    log::debug!(
        "Dumping {} words, {} additions, {} deletions",
        snapshot.dictionary.len(),
        snapshot.words_user.len(),
        snapshot.words_del.len()
    );
    Ok(Json(snapshot))
}

pub async fn count_rows(
    State(pool): State<DbPool>,
    Path(name): Path<String>,
) -> Result<Json<TableCount>, DictionaryError> {
    let table: Table = name.parse()?;
    let mut conn = pool.get()?;
    let count = DictionaryRepository::amount_data(&mut conn, table)?;
    Ok(Json(TableCount {
        table: table.name().to_string(),
        count,
    }))
}

pub fn words_router(pool: DbPool, debug_routes: bool) -> Router {
    let router = Router::new().route("/users/{user_id}/words/count", get(count_words));

    let router = if debug_routes {
        router
            .route("/debug/tables", get(dump_tables))
            .route("/debug/tables/{table}/count", get(count_rows))
    } else {
        router
    };

    router.with_state(pool)
}
