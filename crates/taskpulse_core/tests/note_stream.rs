use rusqlite::{params, Connection};
use taskpulse_core::db::open_db_in_memory;
use taskpulse_core::{NewNote, NoteRepository, SqliteNoteRepository};

fn insert_task(conn: &Connection, id: i64) {
    conn.execute(
        "INSERT INTO tasks (id, author_id, created_at) VALUES (?1, 1, 0);",
        params![id],
    )
    .unwrap();
}

#[test]
fn created_note_ids_strictly_increase() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);

    let mut repo = SqliteNoteRepository::new(&mut conn);
    let first = repo
        .create_note(&NewNote::new(1, 10, 1_000, "one"), None)
        .unwrap();
    let second = repo
        .create_note(&NewNote::new(1, 10, 2_000, "two"), None)
        .unwrap();

    assert!(second > first);
}

#[test]
fn note_lookup_returns_stored_fields_or_none() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);

    let mut repo = SqliteNoteRepository::new(&mut conn);
    let id = repo
        .create_note(&NewNote::new(1, 10, 1_000, "hello"), None)
        .unwrap();

    let found = repo.note(id).unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.task_id, 1);
    assert_eq!(found.author_id, 10);
    assert_eq!(found.constant_text, "hello");

    assert!(repo.note(id + 1).unwrap().is_none());
}

#[test]
fn notes_after_returns_only_ids_above_watermark_in_order() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);

    let mut repo = SqliteNoteRepository::new(&mut conn);
    let ids: Vec<i64> = (0..4)
        .map(|index| {
            repo.create_note(&NewNote::new(1, 10, 1_000 + index, "n"), None)
                .unwrap()
        })
        .collect();

    let tail = repo.notes_after(ids[1]).unwrap();
    let tail_ids: Vec<i64> = tail.iter().map(|note| note.id).collect();
    assert_eq!(tail_ids, ids[2..].to_vec());
}

#[test]
fn task_history_orders_by_task_then_note() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);
    insert_task(&conn, 2);

    let mut repo = SqliteNoteRepository::new(&mut conn);
    repo.create_note(&NewNote::new(2, 10, 1_000, "b1"), None).unwrap();
    repo.create_note(&NewNote::new(1, 10, 2_000, "a1"), None).unwrap();
    repo.create_note(&NewNote::new(2, 10, 3_000, "b2"), None).unwrap();

    let history = repo.task_history(&[1, 2]).unwrap();
    let keys: Vec<(i64, &str)> = history
        .iter()
        .map(|note| (note.task_id, note.constant_text.as_str()))
        .collect();
    assert_eq!(keys, vec![(1, "a1"), (2, "b1"), (2, "b2")]);

    assert!(repo.task_history(&[]).unwrap().is_empty());
}

#[test]
fn note_count_is_scoped_to_one_task() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);
    insert_task(&conn, 2);

    let mut repo = SqliteNoteRepository::new(&mut conn);
    repo.create_note(&NewNote::new(1, 10, 1_000, "a"), None).unwrap();
    repo.create_note(&NewNote::new(1, 10, 2_000, "b"), None).unwrap();
    repo.create_note(&NewNote::new(2, 10, 3_000, "c"), None).unwrap();

    assert_eq!(repo.note_count(1).unwrap(), 2);
    assert_eq!(repo.note_count(2).unwrap(), 1);
    assert_eq!(repo.note_count(404).unwrap(), 0);
}

#[test]
fn last_note_id_before_recovers_the_watermark() {
    let mut conn = open_db_in_memory().unwrap();
    insert_task(&conn, 1);

    let mut repo = SqliteNoteRepository::new(&mut conn);
    let early = repo
        .create_note(&NewNote::new(1, 10, 1_000, "early"), None)
        .unwrap();
    repo.create_note(&NewNote::new(1, 10, 5_000, "late"), None)
        .unwrap();

    assert_eq!(repo.last_note_id_before(5_000).unwrap(), early);
    assert_eq!(repo.last_note_id_before(500).unwrap(), 0);
}
