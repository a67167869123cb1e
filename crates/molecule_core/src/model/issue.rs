//! Issue records owned by the external issue store.
//!
//! # Responsibility
//! - Describe what the store returns from a list query (`Issue`).
//! - Describe what a create request carries (`NewIssue`).
//!
//! # Invariants
//! - Identity (`IssueId`) is assigned by the store, never by callers.
//! - `Priority` stays within `0..=4`; lower is more urgent.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned issue identifier.
pub type IssueId = Uuid;

/// Issue category as understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Task,
    Bug,
    Feature,
    Epic,
    Chore,
    /// Workflow template seeded from the molecule catalog.
    Molecule,
}

impl IssueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Epic => "epic",
            Self::Chore => "chore",
            Self::Molecule => "molecule",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "task" => Some(Self::Task),
            "bug" => Some(Self::Bug),
            "feature" => Some(Self::Feature),
            "epic" => Some(Self::Epic),
            "chore" => Some(Self::Chore),
            "molecule" => Some(Self::Molecule),
            _ => None,
        }
    }
}

impl Display for IssueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue priority, `0` (critical) through `4` (backlog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const CRITICAL: Self = Self(0);
    pub const HIGH: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const LOW: Self = Self(3);
    pub const BACKLOG: Self = Self(4);

    pub fn new(value: u8) -> Result<Self, IssueValidationError> {
        if value > Self::BACKLOG.0 {
            return Err(IssueValidationError::PriorityOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = IssueValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueValidationError {
    EmptyTitle,
    PriorityOutOfRange(u8),
}

impl Display for IssueValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "issue title cannot be empty"),
            Self::PriorityOutOfRange(value) => {
                write!(f, "priority {value} is outside the supported range 0..=4")
            }
        }
    }
}

impl Error for IssueValidationError {}

/// Persisted issue as returned by a store list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    /// Serialized as `type` to match the store's field naming.
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub priority: Priority,
    pub description: String,
}

/// Fields carried by a create request; the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub priority: Priority,
    pub description: String,
}

impl NewIssue {
    pub fn new(
        title: impl Into<String>,
        kind: IssueType,
        priority: Priority,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind,
            priority,
            description: description.into(),
        }
    }

    /// Validates fields a store must refuse to persist.
    pub fn validate(&self) -> Result<(), IssueValidationError> {
        if self.title.trim().is_empty() {
            return Err(IssueValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Attaches a store-assigned id, producing the persisted shape.
    pub fn into_issue(self, id: IssueId) -> Issue {
        Issue {
            id,
            title: self.title,
            kind: self.kind,
            priority: self.priority,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IssueType, IssueValidationError, NewIssue, Priority};

    #[test]
    fn priority_rejects_values_above_backlog() {
        assert_eq!(Priority::new(2).unwrap(), Priority::MEDIUM);
        assert_eq!(
            Priority::new(5).unwrap_err(),
            IssueValidationError::PriorityOutOfRange(5)
        );
    }

    #[test]
    fn issue_type_labels_parse_back() {
        for kind in [
            IssueType::Task,
            IssueType::Bug,
            IssueType::Feature,
            IssueType::Epic,
            IssueType::Chore,
            IssueType::Molecule,
        ] {
            assert_eq!(IssueType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(IssueType::parse("Molecule"), None);
    }

    #[test]
    fn blank_title_fails_validation() {
        let issue = NewIssue::new("  ", IssueType::Task, Priority::LOW, "");
        assert_eq!(issue.validate(), Err(IssueValidationError::EmptyTitle));
    }
}
