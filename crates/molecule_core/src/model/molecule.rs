//! Molecule domain model.
//!
//! # Responsibility
//! - Define the immutable workflow template value seeded into the issue store.
//! - Render the canonical description text stored with a seeded issue.
//!
//! # Invariants
//! - `id` matches `mol-<kebab-case>` and is never reused for another molecule.
//! - `title` is non-blank; it is the reconciliation key used by seeding.
//! - `steps` always form a valid `StepGraph`; a molecule cannot be built
//!   otherwise.

use crate::model::graph::{StepGraph, StepGraphError};
use crate::model::step::Step;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static MOLECULE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^mol-[a-z0-9]+(-[a-z0-9]+)*$").expect("valid molecule id regex"));

/// Stable symbolic molecule identifier, e.g. `mol-quick-fix`.
pub type MoleculeId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoleculeValidationError {
    EmptyId,
    InvalidId(String),
    EmptyTitle,
    Steps(StepGraphError),
}

impl Display for MoleculeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "molecule id cannot be empty"),
            Self::InvalidId(id) => write!(f, "molecule id `{id}` must look like `mol-<name>`"),
            Self::EmptyTitle => write!(f, "molecule title cannot be empty"),
            Self::Steps(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MoleculeValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Steps(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StepGraphError> for MoleculeValidationError {
    fn from(value: StepGraphError) -> Self {
        Self::Steps(value)
    }
}

/// Named multi-step workflow template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Molecule {
    id: MoleculeId,
    title: String,
    summary: String,
    steps: Vec<Step>,
    #[serde(skip)]
    graph: StepGraph,
}

impl Molecule {
    /// Builds a molecule, validating identity and the step graph.
    ///
    /// # Errors
    /// - `EmptyId` / `InvalidId` for a malformed id.
    /// - `EmptyTitle` for a blank title.
    /// - `Steps` when the steps do not form an acyclic, fully resolved graph.
    pub fn new(
        id: impl Into<MoleculeId>,
        title: impl Into<String>,
        summary: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self, MoleculeValidationError> {
        let id = id.into();
        let title = title.into();

        if id.trim().is_empty() {
            return Err(MoleculeValidationError::EmptyId);
        }
        if !MOLECULE_ID_RE.is_match(&id) {
            return Err(MoleculeValidationError::InvalidId(id));
        }
        if title.trim().is_empty() {
            return Err(MoleculeValidationError::EmptyTitle);
        }
        let graph = StepGraph::build(&steps)?;

        Ok(Self {
            id,
            title,
            summary: summary.into(),
            steps,
            graph,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Freeform text preceding the first step block.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.name == name)
    }

    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    /// Renders the full description blob stored with a seeded issue.
    ///
    /// Layout: the summary, then one `## Step: <name>` block per step with
    /// optional `Needs:` and `Tier:` trailer lines.
    pub fn description(&self) -> String {
        let mut out = self.summary.clone();
        for step in &self.steps {
            step.render_into(&mut out);
        }
        out
    }

    /// Union of `{{variable}}` names referenced by any step.
    pub fn placeholders(&self) -> BTreeSet<String> {
        self.steps.iter().flat_map(Step::placeholders).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Molecule, MoleculeValidationError};
    use crate::model::graph::StepGraphError;
    use crate::model::step::{Step, Tier};

    #[test]
    fn description_renders_summary_and_step_blocks() {
        let molecule = Molecule::new(
            "mol-demo",
            "Demo",
            "Two steps.",
            vec![
                Step::new("plan", "Plan it."),
                Step::new("do-it", "Do it.\n")
                    .with_needs(["plan"])
                    .with_tier(Tier::Haiku),
            ],
        )
        .unwrap();

        assert_eq!(
            molecule.description(),
            "Two steps.\n\n## Step: plan\nPlan it.\n\n## Step: do-it\nDo it.\n\nNeeds: plan\nTier: haiku"
        );
    }

    #[test]
    fn invalid_identity_is_rejected_before_steps() {
        let steps = || vec![Step::new("only", "x")];

        assert_eq!(
            Molecule::new(" ", "T", "", steps()).unwrap_err(),
            MoleculeValidationError::EmptyId
        );
        assert_eq!(
            Molecule::new("quick-fix", "T", "", steps()).unwrap_err(),
            MoleculeValidationError::InvalidId("quick-fix".into())
        );
        assert_eq!(
            Molecule::new("mol-x", "  ", "", steps()).unwrap_err(),
            MoleculeValidationError::EmptyTitle
        );
    }

    #[test]
    fn graph_errors_surface_as_step_errors() {
        let err = Molecule::new(
            "mol-broken",
            "Broken",
            "",
            vec![Step::new("submit", "s").with_needs(["review"])],
        )
        .unwrap_err();

        assert_eq!(
            err,
            MoleculeValidationError::Steps(StepGraphError::UnknownDependency {
                step: "submit".into(),
                needs: "review".into(),
            })
        );
    }
}
