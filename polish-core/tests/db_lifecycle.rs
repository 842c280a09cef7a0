//! Integration test for the draft store.
//!
//! Exercises: open_db, migrate, create_draft, load_draft, latest_draft,
//! save_field, save_draft, record_polish, load_polish_history.

use polish_core::db;
use polish_core::{DiffOptions, FieldType, PolishResult};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn full_draft_lifecycle() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    // No draft yet
    assert!(db::latest_draft(&conn).await.unwrap().is_none());

    let draft = db::create_draft(&conn, "关于食堂价格的提案").await.unwrap();
    assert!(!draft.id.is_empty(), "draft ID should be non-empty UUID");
    assert_eq!(draft.title, "关于食堂价格的提案");
    assert!(draft.brief.is_empty());

    // Field writes land in the right column
    let saved = db::save_field(&conn, &draft.id, FieldType::Analysis, "学校食堂饭菜太贵。")
        .await
        .unwrap();
    assert!(saved);
    let loaded = db::load_draft(&conn, &draft.id).await.unwrap().unwrap();
    assert_eq!(loaded.analysis, "学校食堂饭菜太贵。");
    assert!(loaded.brief.is_empty());
    assert!(loaded.suggest.is_empty());

    // Unknown draft ids are reported, not created
    let saved = db::save_field(&conn, "missing", FieldType::Brief, "x").await.unwrap();
    assert!(!saved, "unknown draft should not be updated");
    assert!(db::load_draft(&conn, "missing").await.unwrap().is_none());

    // Whole-draft save
    let mut edited = loaded.clone();
    edited.title = "食堂价格".to_owned();
    edited.suggest = "建议降价。".to_owned();
    db::save_draft(&conn, &edited).await.unwrap();
    let loaded = db::load_draft(&conn, &draft.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "食堂价格");
    assert_eq!(loaded.suggest, "建议降价。");
    assert_eq!(loaded.analysis, "学校食堂饭菜太贵。");

    // Latest draft resumes the one we just touched
    let latest = db::latest_draft(&conn).await.unwrap().unwrap();
    assert_eq!(latest.id, draft.id);

    // Polish history
    let mut review = PolishResult::new(
        FieldType::Analysis,
        "学校食堂饭菜太贵。",
        "学校食堂饭菜价格偏高。",
        DiffOptions::default(),
    );
    review.store.apply("学校食堂饭菜太贵。", "seg-0").unwrap();
    let record = db::record_polish(&conn, &draft.id, &review).await.unwrap();
    assert_eq!(record.segment_count, 1);
    assert_eq!(record.applied_count, 1);

    let history = db::load_polish_history(&conn, &draft.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], record);
    assert_eq!(history[0].field_type, FieldType::Analysis);

    // History rows need an existing draft
    assert!(db::record_polish(&conn, "missing", &review).await.is_err());

    // Verify persistence: open a second connection to same DB
    let conn2 = db::open_db(&path).await.unwrap();
    let reopened = db::load_draft(&conn2, &draft.id).await.unwrap().unwrap();
    assert_eq!(reopened.suggest, "建议降价。");
    assert_eq!(db::load_polish_history(&conn2, &draft.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn migration_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("drafts.db").to_string_lossy().to_string();

    let conn = db::open_db(&path).await.unwrap();
    let draft = db::create_draft(&conn, "第一份").await.unwrap();
    drop(conn);

    // Re-opening re-runs migrate() without touching existing data
    let conn = db::open_db(&path).await.unwrap();
    let versions: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(versions, 1, "schema should be applied exactly once");
    assert!(db::load_draft(&conn, &draft.id).await.unwrap().is_some());
}
