use molecule_core::db::open_db_in_memory;
use molecule_core::{
    IssueListQuery, IssueRepository, IssueType, IssueValidationError, NewIssue, Priority,
    RepoError, SqliteIssueRepository,
};
use rusqlite::params;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIssueRepository::new(&conn);

    let request = NewIssue::new(
        "Quick Fix",
        IssueType::Molecule,
        Priority::MEDIUM,
        "Fast path for small changes.",
    );
    let id = repo.create_issue(&request).unwrap();

    let loaded = repo.get_issue(id).unwrap().unwrap();
    assert_eq!(loaded, request.into_issue(id));
}

#[test]
fn store_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIssueRepository::new(&conn);
    let request = NewIssue::new("Same", IssueType::Task, Priority::LOW, "");

    let first = repo.create_issue(&request).unwrap();
    let second = repo.create_issue(&request).unwrap();
    assert_ne!(first, second);
    assert!(!first.is_nil());
}

#[test]
fn list_filters_by_kind_and_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIssueRepository::new(&conn);

    for (title, kind) in [
        ("Research", IssueType::Molecule),
        ("crash on start", IssueType::Bug),
        ("Quick Fix", IssueType::Molecule),
    ] {
        repo.create_issue(&NewIssue::new(title, kind, Priority::MEDIUM, ""))
            .unwrap();
    }

    let molecules = repo
        .list_issues(&IssueListQuery::of_kind(IssueType::Molecule))
        .unwrap();
    let titles: Vec<_> = molecules.iter().map(|issue| issue.title.as_str()).collect();
    assert_eq!(titles, vec!["Research", "Quick Fix"]);

    let everything = repo.list_issues(&IssueListQuery::default()).unwrap();
    assert_eq!(everything.len(), 3);
}

#[test]
fn priority_filter_is_optional() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIssueRepository::new(&conn);
    repo.create_issue(&NewIssue::new("urgent", IssueType::Molecule, Priority::CRITICAL, ""))
        .unwrap();
    repo.create_issue(&NewIssue::new("someday", IssueType::Molecule, Priority::BACKLOG, ""))
        .unwrap();

    let any_priority = repo
        .list_issues(&IssueListQuery::of_kind(IssueType::Molecule))
        .unwrap();
    assert_eq!(any_priority.len(), 2);

    let critical_only = repo
        .list_issues(&IssueListQuery {
            kind: Some(IssueType::Molecule),
            priority: Some(Priority::CRITICAL),
        })
        .unwrap();
    assert_eq!(critical_only.len(), 1);
    assert_eq!(critical_only[0].title, "urgent");
}

#[test]
fn blank_title_is_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIssueRepository::new(&conn);

    let err = repo
        .create_issue(&NewIssue::new(" ", IssueType::Molecule, Priority::MEDIUM, "x"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(IssueValidationError::EmptyTitle)
    ));
    assert!(repo.list_issues(&IssueListQuery::default()).unwrap().is_empty());
}

#[test]
fn corrupt_rows_are_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO issues (uuid, title, type, priority, description)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params!["not-a-uuid", "Broken", "molecule", 2, ""],
    )
    .unwrap();
    let repo = SqliteIssueRepository::new(&conn);

    let err = repo.list_issues(&IssueListQuery::default()).unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert!(message.contains("not-a-uuid")),
        other => panic!("unexpected error: {other}"),
    }
}
