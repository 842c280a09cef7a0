use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::segments::PolishResult;
use crate::types::{Draft, FieldType, PolishRecord};

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all database connections.
/// `busy_timeout` is set through the `Connection` method rather than a PRAGMA
/// string so it takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    // Fold any WAL left behind by a previous run back into the main file.
    conn.call(|db| {
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

const DRAFT_COLUMNS: &str = "id, title, brief, analysis, suggest, created_at, updated_at";

fn draft_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Draft> {
    Ok(Draft {
        id: r.get(0)?,
        title: r.get(1)?,
        brief: r.get(2)?,
        analysis: r.get(3)?,
        suggest: r.get(4)?,
        created_at: r.get(5)?,
        updated_at: r.get(6)?,
    })
}

/// Creates an empty draft titled `title` and returns it.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the insert transaction fails.
pub async fn create_draft(conn: &Connection, title: &str) -> Result<Draft, tokio_rusqlite::Error> {
    let title = title.to_owned();

    conn.call(move |db| {
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO drafts (id, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            rusqlite::params![&id, &title, now],
        )?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(Draft {
            id,
            title,
            brief: String::new(),
            analysis: String::new(),
            suggest: String::new(),
            created_at: now,
            updated_at: now,
        })
    })
    .await
}

/// Loads the draft with `draft_id`, or `None` if it does not exist.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn load_draft(
    conn: &Connection,
    draft_id: &str,
) -> Result<Option<Draft>, tokio_rusqlite::Error> {
    let draft_id = draft_id.to_owned();

    conn.call(move |db| {
        db.query_row(
            &format!("SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = ?1"),
            rusqlite::params![&draft_id],
            draft_from_row,
        )
        .optional()
    })
    .await
}

/// Loads the most recently updated draft, if any.
///
/// Used at startup when no draft id is given, so the last session resumes.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn latest_draft(conn: &Connection) -> Result<Option<Draft>, tokio_rusqlite::Error> {
    conn.call(|db| {
        db.query_row(
            &format!("SELECT {DRAFT_COLUMNS} FROM drafts ORDER BY updated_at DESC LIMIT 1"),
            [],
            draft_from_row,
        )
        .optional()
    })
    .await
}

/// Writes `text` into `field` of draft `draft_id` and bumps `updated_at`.
///
/// Returns `false` when no draft with that id exists.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the update transaction fails.
pub async fn save_field(
    conn: &Connection,
    draft_id: &str,
    field: FieldType,
    text: &str,
) -> Result<bool, tokio_rusqlite::Error> {
    let draft_id = draft_id.to_owned();
    let text = text.to_owned();
    // Column names come from a closed enum, never from user input.
    let sql = format!("UPDATE drafts SET {} = ?1, updated_at = ?2 WHERE id = ?3", field.as_str());

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let changed = tx.execute(&sql, rusqlite::params![&text, now_secs(), &draft_id])?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(changed == 1)
    })
    .await
}

/// Writes all three fields of `draft` in one transaction.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the update transaction fails.
pub async fn save_draft(conn: &Connection, draft: &Draft) -> Result<(), tokio_rusqlite::Error> {
    let draft = draft.clone();

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE drafts SET title = ?1, brief = ?2, analysis = ?3, suggest = ?4, updated_at = ?5
             WHERE id = ?6",
            rusqlite::params![
                &draft.title,
                &draft.brief,
                &draft.analysis,
                &draft.suggest,
                now_secs(),
                &draft.id
            ],
        )?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(())
    })
    .await
}

/// Records the summary of a closed review of one draft field.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the insert fails (for example an unknown
/// `draft_id`, rejected by the foreign key).
pub async fn record_polish(
    conn: &Connection,
    draft_id: &str,
    review: &PolishResult,
) -> Result<PolishRecord, tokio_rusqlite::Error> {
    let record = PolishRecord {
        id: uuid::Uuid::new_v4().to_string(),
        draft_id: draft_id.to_owned(),
        field_type: review.field_type,
        original_text: review.original_full.clone(),
        revised_text: review.revised_full.clone(),
        segment_count: review.store.len() as i64,
        applied_count: review.store.applied_count() as i64,
        created_at: now_secs(),
    };

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO polish_history
                 (id, draft_id, field_type, original_text, revised_text,
                  segment_count, applied_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                &record.id,
                &record.draft_id,
                record.field_type.as_str(),
                &record.original_text,
                &record.revised_text,
                record.segment_count,
                record.applied_count,
                record.created_at
            ],
        )?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(record)
    })
    .await
}

/// Loads all recorded reviews of `draft_id`, oldest first.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails or a stored field type is unknown.
pub async fn load_polish_history(
    conn: &Connection,
    draft_id: &str,
) -> Result<Vec<PolishRecord>, tokio_rusqlite::Error> {
    let draft_id = draft_id.to_owned();

    conn.call(move |db| {
        let mut stmt = db.prepare(
            "SELECT id, draft_id, field_type, original_text, revised_text,
                    segment_count, applied_count, created_at
             FROM polish_history WHERE draft_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![&draft_id], |r| {
                let field: String = r.get(2)?;
                let field_type = FieldType::parse(&field).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        format!("unknown field type {field:?}").into(),
                    )
                })?;
                Ok(PolishRecord {
                    id: r.get(0)?,
                    draft_id: r.get(1)?,
                    field_type,
                    original_text: r.get(3)?,
                    revised_text: r.get(4)?,
                    segment_count: r.get(5)?,
                    applied_count: r.get(6)?,
                    created_at: r.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok::<_, rusqlite::Error>(rows)
    })
    .await
}
