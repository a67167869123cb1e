mod common;

use common::FakeRepository;
use molecule_core::{
    IssueType, Molecule, MoleculeCatalog, Priority, RepoError, SeedError, SeedService, SkipReason,
    Step, SEED_PRIORITY,
};

const BUILTIN_TITLES: [&str; 5] = [
    "Engineer in a Box",
    "Quick Fix",
    "Research",
    "Install Go Binary",
    "Bootstrap Gas Town",
];

fn single_step(id: &str, title: &str) -> Molecule {
    Molecule::new(id, title, "Summary.", vec![Step::new("only", "Do it.")]).unwrap()
}

#[test]
fn empty_store_receives_every_builtin_molecule() {
    let repo = FakeRepository::new();
    let service = SeedService::new(&repo);

    let report = service.seed_builtin_molecules().unwrap();

    assert_eq!(report.created_count(), 5);
    assert!(report.skipped.is_empty());
    assert_eq!(report.created_titles().collect::<Vec<_>>(), BUILTIN_TITLES);
    assert_eq!(repo.list_calls(), 1);
    assert_eq!(repo.create_calls(), 5);

    let catalog = MoleculeCatalog::builtin().unwrap();
    for (issue, molecule) in repo.issues().iter().zip(catalog.iter()) {
        assert_eq!(issue.title, molecule.title());
        assert_eq!(issue.kind, IssueType::Molecule);
        assert_eq!(issue.priority, Priority::MEDIUM);
        assert_eq!(issue.description, molecule.description());
    }
    for (entry, issue) in report.created.iter().zip(repo.issues()) {
        assert_eq!(entry.issue_id, issue.id);
    }
}

#[test]
fn second_run_creates_nothing_and_leaves_store_unchanged() {
    let repo = FakeRepository::new();
    let service = SeedService::new(&repo);

    service.seed_builtin_molecules().unwrap();
    let after_first = repo.issues();

    let report = service.seed_builtin_molecules().unwrap();
    assert_eq!(report.created_count(), 0);
    assert_eq!(report.skipped.len(), 5);
    assert!(report
        .skipped
        .iter()
        .all(|entry| entry.reason == SkipReason::AlreadyInStore));
    assert_eq!(repo.issues(), after_first);
    assert_eq!(repo.create_calls(), 5);
}

#[test]
fn existing_title_is_skipped_regardless_of_content() {
    let repo = FakeRepository::new().with_issue(
        "Research",
        IssueType::Molecule,
        "hand-edited research workflow",
    );
    let service = SeedService::new(&repo);

    let report = service.seed_builtin_molecules().unwrap();

    assert_eq!(report.created_count(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].molecule_id, "mol-research");
    assert_eq!(report.skipped[0].reason, SkipReason::AlreadyInStore);

    let titles = repo.titles_of_kind(IssueType::Molecule);
    assert_eq!(titles.iter().filter(|title| *title == "Research").count(), 1);
    assert_eq!(repo.issues()[0].description, "hand-edited research workflow");
}

#[test]
fn matching_title_on_another_issue_type_does_not_block_seeding() {
    let repo = FakeRepository::new().with_issue("Quick Fix", IssueType::Bug, "typo in docs");
    let service = SeedService::new(&repo);

    let report = service.seed_builtin_molecules().unwrap();

    assert_eq!(report.created_count(), 5);
    assert_eq!(repo.titles_of_kind(IssueType::Molecule).len(), 5);
}

#[test]
fn create_failure_reports_partial_progress() {
    let repo = FakeRepository::new();
    repo.fail_create_at(3);
    let service = SeedService::new(&repo);

    let err = service.seed_builtin_molecules().unwrap_err();

    assert_eq!(err.created_count(), 2);
    match &err {
        SeedError::Create {
            molecule_id,
            title,
            partial,
            source,
        } => {
            assert_eq!(molecule_id, "mol-research");
            assert_eq!(title, "Research");
            assert_eq!(
                partial.created_titles().collect::<Vec<_>>(),
                vec!["Engineer in a Box", "Quick Fix"]
            );
            assert!(matches!(source, RepoError::Backend(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("after 2 created"));
    assert_eq!(repo.create_calls(), 3);
    assert_eq!(
        repo.titles_of_kind(IssueType::Molecule),
        vec!["Engineer in a Box", "Quick Fix"]
    );
}

#[test]
fn retry_after_partial_failure_finishes_the_catalog() {
    let repo = FakeRepository::new();
    repo.fail_create_at(4);
    let service = SeedService::new(&repo);

    let err = service.seed_builtin_molecules().unwrap_err();
    assert_eq!(err.created_count(), 3);

    repo.clear_failures();
    let report = service.seed_builtin_molecules().unwrap();
    assert_eq!(
        report.created_titles().collect::<Vec<_>>(),
        vec!["Install Go Binary", "Bootstrap Gas Town"]
    );
    assert_eq!(report.skipped.len(), 3);
    assert_eq!(repo.titles_of_kind(IssueType::Molecule), BUILTIN_TITLES);
}

#[test]
fn list_failure_issues_no_creates() {
    let repo = FakeRepository::new();
    repo.fail_list();
    let service = SeedService::new(&repo);

    let err = service.seed_builtin_molecules().unwrap_err();

    assert!(matches!(err, SeedError::List(RepoError::Backend(_))));
    assert_eq!(err.created_count(), 0);
    assert!(err.partial_report().is_none());
    assert_eq!(repo.create_calls(), 0);
    assert!(repo.issues().is_empty());
}

#[test]
fn first_catalog_entry_wins_a_title_collision() {
    let catalog = MoleculeCatalog::new(vec![
        single_step("mol-first", "Shared"),
        single_step("mol-other", "Other"),
        single_step("mol-second", "Shared"),
    ])
    .unwrap();
    let repo = FakeRepository::new();
    let service = SeedService::new(&repo);

    let report = service.seed_catalog(&catalog).unwrap();

    assert_eq!(report.created_titles().collect::<Vec<_>>(), vec!["Shared", "Other"]);
    assert_eq!(report.created[0].molecule_id, "mol-first");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].molecule_id, "mol-second");
    assert_eq!(report.skipped[0].reason, SkipReason::DuplicateTitleInCatalog);
    assert_eq!(repo.create_calls(), 2);
}

#[test]
fn duplicate_existing_titles_collapse_to_one_skip() {
    let repo = FakeRepository::new()
        .with_issue("Quick Fix", IssueType::Molecule, "a")
        .with_issue("Quick Fix", IssueType::Molecule, "b");
    let service = SeedService::new(&repo);

    let report = service.seed_builtin_molecules().unwrap();

    assert_eq!(report.created_count(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].title, "Quick Fix");
}

#[test]
fn seeded_requests_use_medium_priority() {
    assert_eq!(SEED_PRIORITY, Priority::MEDIUM);
    assert_eq!(SEED_PRIORITY.value(), 2);
}

#[test]
fn report_serializes_for_json_output() {
    let repo = FakeRepository::new().with_issue("Research", IssueType::Molecule, "");
    let report = SeedService::new(&repo).seed_builtin_molecules().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["created"].as_array().unwrap().len(), 4);
    assert_eq!(json["skipped"][0]["molecule_id"], "mol-research");
    assert_eq!(json["skipped"][0]["reason"], "already_in_store");
}
