use molecule_core::{
    Issue, IssueId, IssueListQuery, IssueRepository, IssueType, NewIssue, Priority, RepoError,
    RepoResult,
};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// In-memory issue store that records calls and can fail on demand.
#[derive(Default)]
pub struct FakeRepository {
    issues: RefCell<Vec<Issue>>,
    list_calls: Cell<usize>,
    create_calls: Cell<usize>,
    fail_list: Cell<bool>,
    /// 1-based create call that should fail.
    fail_create_at: Cell<Option<usize>>,
}

#[allow(dead_code)]
impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(self, title: &str, kind: IssueType, description: &str) -> Self {
        self.issues.borrow_mut().push(Issue {
            id: Uuid::new_v4(),
            title: title.to_string(),
            kind,
            priority: Priority::LOW,
            description: description.to_string(),
        });
        self
    }

    pub fn fail_list(&self) {
        self.fail_list.set(true);
    }

    pub fn fail_create_at(&self, call: usize) {
        self.fail_create_at.set(Some(call));
    }

    pub fn clear_failures(&self) {
        self.fail_list.set(false);
        self.fail_create_at.set(None);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.get()
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.issues.borrow().clone()
    }

    pub fn titles_of_kind(&self, kind: IssueType) -> Vec<String> {
        self.issues
            .borrow()
            .iter()
            .filter(|issue| issue.kind == kind)
            .map(|issue| issue.title.clone())
            .collect()
    }
}

impl IssueRepository for FakeRepository {
    fn list_issues(&self, query: &IssueListQuery) -> RepoResult<Vec<Issue>> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_list.get() {
            return Err(RepoError::Backend("store unreachable".to_string()));
        }
        Ok(self
            .issues
            .borrow()
            .iter()
            .filter(|issue| query.kind.map_or(true, |kind| issue.kind == kind))
            .filter(|issue| query.priority.map_or(true, |priority| issue.priority == priority))
            .cloned()
            .collect())
    }

    fn create_issue(&self, issue: &NewIssue) -> RepoResult<IssueId> {
        let call = self.create_calls.get() + 1;
        self.create_calls.set(call);
        if self.fail_create_at.get() == Some(call) {
            return Err(RepoError::Backend("storage full".to_string()));
        }
        issue.validate()?;

        let id = Uuid::new_v4();
        self.issues.borrow_mut().push(issue.clone().into_issue(id));
        Ok(id)
    }
}
