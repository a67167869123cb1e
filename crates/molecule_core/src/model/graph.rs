//! Step dependency graph.
//!
//! # Responsibility
//! - Turn a molecule's step list into a validated dependency graph.
//! - Provide a deterministic execution order over step names.
//!
//! # Invariants
//! - Every `needs` entry resolves to a step declared in the same list.
//! - The dependency relation is acyclic.
//! - Topological order breaks ties by declaration order.

use crate::model::step::{is_valid_step_name, Step};
use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural errors found while building a `StepGraph`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepGraphError {
    NoSteps,
    InvalidStepName(String),
    DuplicateStep(String),
    SelfDependency(String),
    DuplicateDependency { step: String, needs: String },
    UnknownDependency { step: String, needs: String },
    /// Steps that could not be ordered, in declaration order.
    Cycle(Vec<String>),
}

impl Display for StepGraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSteps => write!(f, "molecule must declare at least one step"),
            Self::InvalidStepName(name) => {
                write!(f, "step name `{name}` must be lowercase kebab-case")
            }
            Self::DuplicateStep(name) => write!(f, "step `{name}` is declared more than once"),
            Self::SelfDependency(name) => write!(f, "step `{name}` cannot need itself"),
            Self::DuplicateDependency { step, needs } => {
                write!(f, "step `{step}` lists `{needs}` more than once")
            }
            Self::UnknownDependency { step, needs } => {
                write!(f, "step `{step}` needs unknown step `{needs}`")
            }
            Self::Cycle(steps) => write!(f, "dependency cycle among steps: {}", steps.join(", ")),
        }
    }
}

impl Error for StepGraphError {}

/// Validated dependency graph over one molecule's steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGraph {
    names: Vec<String>,
    prerequisites: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
    order: Vec<usize>,
}

impl StepGraph {
    /// Builds and validates the graph for `steps`.
    ///
    /// # Errors
    /// - Returns the first structural problem found, checking names before
    ///   edges and edges before cycles.
    pub fn build(steps: &[Step]) -> Result<Self, StepGraphError> {
        if steps.is_empty() {
            return Err(StepGraphError::NoSteps);
        }

        let mut index = HashMap::with_capacity(steps.len());
        for (position, step) in steps.iter().enumerate() {
            if !is_valid_step_name(&step.name) {
                return Err(StepGraphError::InvalidStepName(step.name.clone()));
            }
            if index.insert(step.name.as_str(), position).is_some() {
                return Err(StepGraphError::DuplicateStep(step.name.clone()));
            }
        }

        let mut prerequisites = vec![Vec::new(); steps.len()];
        let mut dependents = vec![Vec::new(); steps.len()];
        for (position, step) in steps.iter().enumerate() {
            let mut seen = HashSet::new();
            for needed in &step.needs {
                if needed == &step.name {
                    return Err(StepGraphError::SelfDependency(step.name.clone()));
                }
                if !seen.insert(needed.as_str()) {
                    return Err(StepGraphError::DuplicateDependency {
                        step: step.name.clone(),
                        needs: needed.clone(),
                    });
                }
                let Some(&target) = index.get(needed.as_str()) else {
                    return Err(StepGraphError::UnknownDependency {
                        step: step.name.clone(),
                        needs: needed.clone(),
                    });
                };
                prerequisites[position].push(target);
                dependents[target].push(position);
            }
        }
        for list in &mut dependents {
            list.sort_unstable();
        }

        let order = kahn_order(&prerequisites, &dependents);
        if order.len() < steps.len() {
            let placed: HashSet<usize> = order.iter().copied().collect();
            let stuck = steps
                .iter()
                .enumerate()
                .filter(|(position, _)| !placed.contains(position))
                .map(|(_, step)| step.name.clone())
                .collect();
            return Err(StepGraphError::Cycle(stuck));
        }

        Ok(Self {
            names: steps.iter().map(|step| step.name.clone()).collect(),
            prerequisites,
            dependents,
            order,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Step names in a valid execution order.
    pub fn topological_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(|&position| self.names[position].as_str())
    }

    /// Steps with no prerequisites, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &str> + '_ {
        self.names
            .iter()
            .zip(&self.prerequisites)
            .filter(|(_, needs)| needs.is_empty())
            .map(|(name, _)| name.as_str())
    }

    /// Direct prerequisites of `name`; `None` when the step is unknown.
    pub fn prerequisites_of(&self, name: &str) -> Option<Vec<&str>> {
        let position = self.position(name)?;
        Some(self.names_at(&self.prerequisites[position]))
    }

    /// Steps that directly need `name`; `None` when the step is unknown.
    pub fn dependents_of(&self, name: &str) -> Option<Vec<&str>> {
        let position = self.position(name)?;
        Some(self.names_at(&self.dependents[position]))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    fn names_at(&self, positions: &[usize]) -> Vec<&str> {
        positions
            .iter()
            .map(|&position| self.names[position].as_str())
            .collect()
    }
}

fn kahn_order(prerequisites: &[Vec<usize>], dependents: &[Vec<usize>]) -> Vec<usize> {
    let mut remaining: Vec<usize> = prerequisites.iter().map(Vec::len).collect();
    let mut ready: VecDeque<usize> = remaining
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count == 0)
        .map(|(position, _)| position)
        .collect();
    let mut order = Vec::with_capacity(prerequisites.len());

    while let Some(position) = ready.pop_front() {
        order.push(position);
        for &dependent in &dependents[position] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }

    order
}
