//! Built-in workflow templates ("molecules") and their idempotent seeding
//! into an issue store.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::{CatalogError, CatalogResult, MoleculeCatalog};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::graph::{StepGraph, StepGraphError};
pub use model::issue::{Issue, IssueId, IssueType, IssueValidationError, NewIssue, Priority};
pub use model::molecule::{Molecule, MoleculeId, MoleculeValidationError};
pub use model::step::{Step, Tier};
pub use repo::issue_repo::{
    IssueListQuery, IssueRepository, RepoError, RepoResult, SqliteIssueRepository,
};
pub use service::seed_service::{
    SeedError, SeedReport, SeedResult, SeedService, SeededMolecule, SkipReason, SkippedMolecule,
    SEED_PRIORITY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
