/// DDL to create the schema_version tracking table.
///
/// Applied unconditionally on every DB open (before checking the version),
/// using `IF NOT EXISTS` so it is safe to run multiple times.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the full v1 schema.
///
/// Contains two tables:
/// - `drafts`: one row per proposal draft, keyed by UUID v4 text, holding the
///   three polishable fields.
/// - `polish_history`: one row per closed review of a draft field.
///
/// Review segments themselves are never stored; only the summary of a review
/// is kept once its panel closes.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS drafts (
        id          TEXT    PRIMARY KEY,
        title       TEXT    NOT NULL,
        brief       TEXT    NOT NULL DEFAULT '',
        analysis    TEXT    NOT NULL DEFAULT '',
        suggest     TEXT    NOT NULL DEFAULT '',
        created_at  INTEGER NOT NULL,
        updated_at  INTEGER NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS polish_history (
        id            TEXT    PRIMARY KEY,
        draft_id      TEXT    NOT NULL REFERENCES drafts(id) ON DELETE CASCADE,
        field_type    TEXT    NOT NULL
                              CHECK(field_type IN ('brief', 'analysis', 'suggest')),
        original_text TEXT    NOT NULL,
        revised_text  TEXT    NOT NULL,
        segment_count INTEGER NOT NULL,
        applied_count INTEGER NOT NULL,
        created_at    INTEGER NOT NULL
    ) STRICT;

    CREATE INDEX IF NOT EXISTS polish_history_draft
        ON polish_history (draft_id, created_at);
";

/// Runs forward-only schema migration to migrate the DB to the latest version.
///
/// Idempotent: safe to call on every startup.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails or the version row cannot be read.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if version < 1 {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}
