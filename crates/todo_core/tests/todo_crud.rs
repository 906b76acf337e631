use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use todo_core::db::open_db_in_memory;
use todo_core::{
    parse_due_date, NewTodo, RepoError, SqliteTodoRepository, Todo, TodoRepository,
    TodoValidationError,
};

#[test]
fn create_then_list_contains_one_pending_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let due = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let created = repo
        .create(&NewTodo::new("  study circuits  ", Some(due)).unwrap())
        .unwrap();

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].title, "study circuits");
    assert_eq!(listed[0].due_date, Some(due));
    assert!(!listed[0].completed);
}

#[test]
fn offset_due_date_is_stored_as_millisecond_utc() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let due = parse_due_date("2024-01-05T12:00:00.123456-03:00").unwrap();
    let created = repo
        .create(&NewTodo::new("call lab", Some(due)).unwrap())
        .unwrap();

    let expected =
        Utc.with_ymd_and_hms(2024, 1, 5, 15, 0, 0).unwrap() + Duration::milliseconds(123);
    assert_eq!(created.due_date, Some(expected));

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(created.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
}

#[test]
fn blank_titles_are_rejected_before_reaching_storage() {
    assert_eq!(
        NewTodo::new("", None).unwrap_err(),
        TodoValidationError::EmptyTitle
    );
    assert_eq!(
        NewTodo::new("   ", None).unwrap_err(),
        TodoValidationError::EmptyTitle
    );
}

#[test]
fn complete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let todo = repo.create(&NewTodo::new("review", None).unwrap()).unwrap();

    assert!(repo.complete(todo.id).unwrap());
    assert!(repo.get(todo.id).unwrap().unwrap().completed);

    assert!(repo.complete(todo.id).unwrap());
    assert!(repo.get(todo.id).unwrap().unwrap().completed);
}

#[test]
fn complete_missing_id_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let todo = repo.create(&NewTodo::new("keep", None).unwrap()).unwrap();
    let before = repo.list().unwrap();

    assert!(!repo.complete(todo.id + 100).unwrap());
    assert_eq!(repo.list().unwrap(), before);
}

#[test]
fn delete_removes_record_and_repeats_as_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let keep = repo.create(&NewTodo::new("keep", None).unwrap()).unwrap();
    let gone = repo.create(&NewTodo::new("gone", None).unwrap()).unwrap();

    assert!(repo.delete(gone.id).unwrap());
    assert!(!repo.delete(gone.id).unwrap());

    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![keep.id]);
    assert!(repo.get(gone.id).unwrap().is_none());
}

#[test]
fn list_orders_by_due_date_then_newest_undated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let a = create_dated(&repo, "A", Some((2024, 1, 10)));
    let b = create_dated(&repo, "B", Some((2024, 1, 5)));
    let c = create_dated(&repo, "C", None);
    let d = create_dated(&repo, "D", None);

    set_created_at(&conn, c.id, "2024-01-01T08:00:00.000Z");
    set_created_at(&conn, d.id, "2024-01-01T09:00:00.000Z");

    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![b.id, a.id, d.id, c.id]);
}

#[test]
fn list_breaks_due_date_ties_by_newest_creation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let older = create_dated(&repo, "older", Some((2024, 2, 1)));
    let newer = create_dated(&repo, "newer", Some((2024, 2, 1)));
    set_created_at(&conn, older.id, "2024-01-01T08:00:00.000Z");
    set_created_at(&conn, newer.id, "2024-01-02T08:00:00.000Z");

    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[test]
fn list_keeps_insertion_recency_when_created_at_collides() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let first = create_dated(&repo, "first", None);
    let second = create_dated(&repo, "second", None);
    conn.execute(
        "UPDATE todos SET created_at = '2024-01-01T00:00:00.000Z';",
        [],
    )
    .unwrap();

    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn read_rejects_corrupted_completed_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let todo = create_dated(&repo, "bad", None);
    conn.execute("UPDATE todos SET completed = 7 WHERE id = ?1;", [todo.id])
        .unwrap();

    let err = repo.list().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("completed")));
}

#[test]
fn read_rejects_unparseable_timestamps_and_blank_titles() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let dated = create_dated(&repo, "dated", Some((2024, 1, 1)));
    let titled = create_dated(&repo, "titled", None);

    conn.execute("UPDATE todos SET due_date = 'soon' WHERE id = ?1;", [dated.id])
        .unwrap();
    assert!(matches!(
        repo.get(dated.id).unwrap_err(),
        RepoError::InvalidData(message) if message.contains("due_date")
    ));

    conn.execute("UPDATE todos SET title = '  ' WHERE id = ?1;", [titled.id])
        .unwrap();
    assert!(matches!(
        repo.get(titled.id).unwrap_err(),
        RepoError::InvalidData(message) if message.contains("title")
    ));
}

#[test]
fn persisted_columns_use_iso_text_and_integer_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let todo = create_dated(&repo, "columns", Some((2024, 1, 5)));
    repo.complete(todo.id).unwrap();

    let (completed, due_date, created_at): (i64, Option<String>, String) = conn
        .query_row(
            "SELECT completed, due_date, created_at FROM todos WHERE id = ?1",
            [todo.id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(completed, 1);
    assert_eq!(due_date.as_deref(), Some("2024-01-05T00:00:00.000Z"));
    assert_eq!(created_at.len(), "2024-01-05T00:00:00.000Z".len());
    assert!(created_at.ends_with('Z'));
}

fn create_dated(
    repo: &SqliteTodoRepository<'_>,
    title: &str,
    due: Option<(i32, u32, u32)>,
) -> Todo {
    let due_date = due.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
    repo.create(&NewTodo::new(title, due_date).unwrap()).unwrap()
}

fn set_created_at(conn: &Connection, id: i64, created_at: &str) {
    conn.execute(
        "UPDATE todos SET created_at = ?1 WHERE id = ?2;",
        rusqlite::params![created_at, id],
    )
    .unwrap();
}
