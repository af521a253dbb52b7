use taskpulse_core::{
    Attachment, DetailLevel, Folder, ListMode, Loaded, NewNote, PersonalHeader, TaskHeader,
    TaskListEntry,
};

#[test]
fn new_note_defaults_leave_projections_empty() {
    let note = NewNote::new(1, 42, 1_000, "hello");

    assert_eq!(note.task_id, 1);
    assert_eq!(note.author_id, 42);
    assert_eq!(note.constant_text, "hello");
    assert!(note.private_text.is_empty());
    assert!(note.filterable_text.is_empty());
    assert_eq!(note.version, None);
}

#[test]
fn list_mode_and_detail_use_snake_case_wire_values() {
    assert_eq!(
        serde_json::to_value(ListMode::Announcements).unwrap(),
        "announcements"
    );
    assert_eq!(
        serde_json::to_value(DetailLevel::Extended).unwrap(),
        "extended"
    );
    assert_eq!(serde_json::to_value(Folder::Inbox).unwrap(), "inbox");
}

#[test]
fn entry_serialization_tags_fetch_state() {
    let entry = TaskListEntry {
        header: TaskHeader {
            id: 1,
            form_id: None,
            author_id: 42,
            created_at: 1_000,
        },
        personal: PersonalHeader {
            task_id: 1,
            person_id: 500,
            last_read_note_id: 0,
            last_comment_note_id: 0,
            category: None,
            plan_date: None,
            followed: false,
        },
        notes: Loaded::NotLoaded,
        attachments: Loaded::Loaded(vec![Attachment {
            id: 9,
            task_id: 1,
            note_id: None,
            name: "brief.pdf".to_string(),
            size_bytes: 4_096,
        }]),
        draft: Loaded::Loaded(None),
    };

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["notes"]["state"], "not_loaded");
    assert_eq!(json["attachments"]["state"], "loaded");
    assert_eq!(json["attachments"]["value"][0]["name"], "brief.pdf");

    let decoded: TaskListEntry = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, entry);
}
