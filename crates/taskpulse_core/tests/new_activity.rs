use rusqlite::{params, Connection};
use taskpulse_core::db::open_db_in_memory;
use taskpulse_core::{ActivityService, SqliteNoteRepository};

fn insert_task(conn: &Connection, id: i64) {
    conn.execute(
        "INSERT INTO tasks (id, author_id, created_at) VALUES (?1, 1, 0);",
        params![id],
    )
    .unwrap();
}

fn insert_note(conn: &Connection, id: i64, task_id: i64, created_at: i64) {
    conn.execute(
        "INSERT INTO notes (id, task_id, author_id, created_at) VALUES (?1, ?2, 1, ?3);",
        params![id, task_id, created_at],
    )
    .unwrap();
}

fn acknowledge(conn: &Connection, person_id: i64, task_id: i64, note_id: i64) {
    conn.execute(
        "INSERT INTO user_tasks (person_id, task_id, folder, last_comment_note_id)
         VALUES (?1, ?2, 'inbox', ?3);",
        params![person_id, task_id, note_id],
    )
    .unwrap();
}

#[test]
fn counts_notes_after_watermark_with_latest_timestamp() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);
    insert_note(&conn, 5, 1, 1_000);
    insert_note(&conn, 7, 1, 2_000);
    // Below the watermark, must not count.
    insert_note(&conn, 2, 1, 500);

    let service = ActivityService::new(SqliteNoteRepository::new(&mut conn));
    let summary = service.new_activity(1, 3, None).unwrap().unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.last_at, Some(2_000));
}

#[test]
fn no_qualifying_notes_yields_absent_summary() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);
    insert_note(&conn, 5, 1, 1_000);

    let service = ActivityService::new(SqliteNoteRepository::new(&mut conn));
    assert!(service.new_activity(1, 5, None).unwrap().is_none());
    assert!(!service.has_new_activity(1, 5, None).unwrap());
}

#[test]
fn notes_acknowledged_for_someone_else_are_excluded_for_viewer() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);
    insert_note(&conn, 5, 1, 1_000);
    insert_note(&conn, 7, 1, 2_000);
    // Note 5 is attributed to person 900.
    acknowledge(&conn, 900, 1, 5);

    let service = ActivityService::new(SqliteNoteRepository::new(&mut conn));
    let summary = service.new_activity(1, 0, Some(42)).unwrap().unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(summary.last_at, Some(2_000));
}

#[test]
fn note_acknowledged_for_the_viewer_still_counts() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);
    insert_note(&conn, 5, 1, 1_000);
    acknowledge(&conn, 42, 1, 5);

    let service = ActivityService::new(SqliteNoteRepository::new(&mut conn));
    let summary = service.new_activity(1, 0, Some(42)).unwrap().unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(summary.last_at, Some(1_000));
}
