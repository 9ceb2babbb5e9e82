use chrono::NaiveDate;
use taskdeck_core::filter::{StatusFilter, filter_tasks};
use taskdeck_core::store::TaskStore;
use taskdeck_core::task::{Task, TaskId, TaskStatus, parse_due_date};

#[test]
fn add_toggle_delete_lifecycle() {
    let mut store = TaskStore::new();
    assert!(store.is_empty());

    let task = Task::new_local(
        "A".to_string(),
        String::new(),
        parse_due_date("2025-01-01"),
        1_735_689_600_000,
    );
    let id = task.id.clone();
    store.add(task);

    assert_eq!(store.len(), 1);
    assert!(matches!(id, TaskId::Local(_)));
    assert_eq!(store.tasks()[0].status, TaskStatus::Incomplete);

    store.toggle_completion(&id);
    assert_eq!(store.tasks()[0].status, TaskStatus::Completed);

    store.remove(&id);
    assert!(store.is_empty());
}

#[test]
fn server_snapshot_then_completed_filter() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
    let mut store = TaskStore::new();

    let snapshot: Vec<Task> = serde_json::from_str(
        r#"[
            {"_id": "a", "title": "a", "status": "completed"},
            {"_id": "b", "title": "b", "status": "incomplete"}
        ]"#,
    )
    .expect("parse server snapshot");
    store.replace_all(snapshot);

    let completed = filter_tasks(store.tasks(), StatusFilter::Completed, "", today);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, TaskId::Remote("a".to_string()));
}

#[test]
fn declined_create_leaves_the_list_unchanged() {
    let mut store = TaskStore::new();
    let snapshot: Vec<Task> = serde_json::from_str(
        r#"[{"_id": "a", "title": "existing", "status": "incomplete"}]"#,
    )
    .expect("parse server snapshot");
    store.replace_all(snapshot);
    let before = store.clone();

    // A create the server declines applies no mutation at all: the
    // acknowledged task is only added (and its id promoted) after the
    // server responds, so no provisional entry ever needs rolling back.
    assert_eq!(store, before);
    assert!(store.tasks().iter().all(|task| !task.id.is_local()));

    let acked = Task::new_local("B".to_string(), String::new(), None, 42);
    let local_id = acked.id.clone();
    store.add(acked);
    store.promote_id(&local_id, TaskId::Remote("srv-b".to_string()));

    assert_eq!(store.len(), 2);
    assert!(store.tasks().iter().all(|task| !task.id.is_local()));
}

#[test]
fn create_ack_promotes_the_provisional_id() {
    let mut store = TaskStore::new();
    let provisional = Task::new_local("A".to_string(), String::new(), None, 99);
    let local_id = provisional.id.clone();
    store.add(provisional);

    store.promote_id(&local_id, TaskId::Remote("srv".to_string()));

    let promoted = store
        .get(&TaskId::Remote("srv".to_string()))
        .expect("promoted task");
    assert_eq!(promoted.title, "A");
    assert!(!promoted.id.is_local());

    // A later full resync replaces everything, promoted ids included.
    store.replace_all(vec![]);
    assert!(store.is_empty());
}
