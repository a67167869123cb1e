//! Step domain model.
//!
//! # Responsibility
//! - Define one unit of work inside a molecule.
//! - Render the canonical `## Step:` block used in stored descriptions.
//!
//! # Invariants
//! - `name` is kebab-case and unique within its parent molecule
//!   (enforced by `StepGraph::build`, not by this type).
//! - `tier` is advisory only; nothing in core schedules by it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

static STEP_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid step name regex"));
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([a-z][a-z0-9_]*)\}\}").expect("valid placeholder regex"));

/// Execution class hint attached to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Lightweight, mechanical work.
    Haiku,
    /// Default class for ordinary engineering steps.
    Sonnet,
    /// Heavyweight reasoning.
    Opus,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Haiku => "haiku",
            Self::Sonnet => "sonnet",
            Self::Opus => "opus",
        }
    }

    /// Parses the lowercase tier label used in step blocks.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "haiku" => Some(Self::Haiku),
            "sonnet" => Some(Self::Sonnet),
            "opus" => Some(Self::Opus),
            _ => None,
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named step of a molecule workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Kebab-case name, unique within the molecule.
    pub name: String,
    /// Instructional text, stored verbatim.
    pub body: String,
    /// Names of prerequisite steps, in declared order.
    pub needs: Vec<String>,
    /// Optional execution class hint.
    pub tier: Option<Tier>,
}

impl Step {
    /// Creates a root step with no prerequisites and no tier.
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            needs: Vec::new(),
            tier: None,
        }
    }

    /// Replaces the prerequisite list.
    pub fn with_needs<I, S>(mut self, needs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.needs = needs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Returns whether this step can start without waiting on another step.
    pub fn is_root(&self) -> bool {
        self.needs.is_empty()
    }

    /// Returns `{{variable}}` names referenced by the body.
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER_RE
            .captures_iter(&self.body)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Appends this step's `## Step:` block to `out`.
    pub(crate) fn render_into(&self, out: &mut String) {
        out.push_str("\n\n## Step: ");
        out.push_str(&self.name);
        out.push('\n');
        out.push_str(&self.body);
        if !self.needs.is_empty() {
            out.push_str("\nNeeds: ");
            out.push_str(&self.needs.join(", "));
        }
        if let Some(tier) = self.tier {
            out.push_str("\nTier: ");
            out.push_str(tier.as_str());
        }
    }
}

pub(crate) fn is_valid_step_name(name: &str) -> bool {
    STEP_NAME_RE.is_match(name)
}
