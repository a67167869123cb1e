//! Domain model for workflow templates and the issues they seed.
//!
//! # Responsibility
//! - Define typed molecules, steps and their dependency graph.
//! - Define the issue shapes exchanged with the external store.
//!
//! # Invariants
//! - A `Molecule` value always carries a validated, acyclic `StepGraph`.
//! - Molecules are immutable once built.

pub mod graph;
pub mod issue;
pub mod molecule;
pub mod step;
