//! Molecule seeding use-case service.
//!
//! # Responsibility
//! - Materialize catalog molecules into the issue store exactly once per title.
//! - Report which molecules were created and which were skipped.
//!
//! # Invariants
//! - At most one list call and at most `catalog.len()` create calls per run.
//! - A list failure aborts before any create call.
//! - A create failure stops the run; earlier creates stay in the store and
//!   are listed in the error's partial report.
//! - Never updates or deletes store records.

use crate::catalog::{CatalogError, MoleculeCatalog};
use crate::model::issue::{IssueId, IssueType, NewIssue, Priority};
use crate::model::molecule::Molecule;
use crate::repo::issue_repo::{IssueListQuery, IssueRepository, RepoError};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Priority every seeded molecule is created with.
pub const SEED_PRIORITY: Priority = Priority::MEDIUM;

pub type SeedResult<T> = Result<T, SeedError>;

/// Why a catalog molecule was not created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The store already held a molecule issue with this title.
    AlreadyInStore,
    /// An earlier catalog entry with the same title was created in this run.
    DuplicateTitleInCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeededMolecule {
    pub molecule_id: String,
    pub title: String,
    pub issue_id: IssueId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMolecule {
    pub molecule_id: String,
    pub title: String,
    pub reason: SkipReason,
}

/// Outcome of one seeding run, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: Vec<SeededMolecule>,
    pub skipped: Vec<SkippedMolecule>,
}

impl SeedReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn created_titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.created.iter().map(|entry| entry.title.as_str())
    }
}

#[derive(Debug)]
pub enum SeedError {
    /// The built-in catalog failed validation; nothing was read or written.
    Catalog(CatalogError),
    /// Listing existing molecules failed; nothing was written.
    List(RepoError),
    /// Creating `title` failed; `partial` holds everything done before it.
    Create {
        molecule_id: String,
        title: String,
        partial: SeedReport,
        source: RepoError,
    },
}

impl SeedError {
    /// Molecules created before the failure.
    pub fn created_count(&self) -> usize {
        self.partial_report().map_or(0, SeedReport::created_count)
    }

    pub fn partial_report(&self) -> Option<&SeedReport> {
        match self {
            Self::Create { partial, .. } => Some(partial),
            Self::Catalog(_) | Self::List(_) => None,
        }
    }
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::List(err) => write!(f, "failed to list existing molecules: {err}"),
            Self::Create {
                title,
                partial,
                source,
                ..
            } => write!(
                f,
                "failed to create molecule `{title}` after {} created: {source}",
                partial.created_count()
            ),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::List(err) => Some(err),
            Self::Create { source, .. } => Some(source),
        }
    }
}

impl From<CatalogError> for SeedError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

/// Use-case service that seeds molecules through an issue repository.
pub struct SeedService<R: IssueRepository> {
    repo: R,
}

impl<R: IssueRepository> SeedService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Seeds the built-in catalog.
    pub fn seed_builtin_molecules(&self) -> SeedResult<SeedReport> {
        let catalog = MoleculeCatalog::builtin()?;
        self.seed_catalog(&catalog)
    }

    /// Creates every catalog molecule whose title is not yet in the store.
    ///
    /// # Contract
    /// - Titles are the reconciliation key; ids are never consulted.
    /// - The first catalog entry with a given title wins.
    /// - Safe to retry after a failure: the retry re-reads existing titles.
    pub fn seed_catalog(&self, catalog: &MoleculeCatalog) -> SeedResult<SeedReport> {
        let started_at = Instant::now();
        info!(
            "event=seed_molecules module=seed status=start catalog_size={}",
            catalog.len()
        );

        let existing = match self
            .repo
            .list_issues(&IssueListQuery::of_kind(IssueType::Molecule))
        {
            Ok(existing) => existing,
            Err(err) => {
                error!(
                    "event=seed_molecules module=seed status=error stage=list duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(SeedError::List(err));
            }
        };
        let existing_titles: HashSet<&str> =
            existing.iter().map(|issue| issue.title.as_str()).collect();

        let mut report = SeedReport::default();
        let mut seeded_titles: HashSet<&str> = HashSet::new();
        for molecule in catalog {
            if let Some(reason) = skip_reason(molecule, &existing_titles, &seeded_titles) {
                if reason == SkipReason::DuplicateTitleInCatalog {
                    warn!(
                        "event=seed_skip module=seed status=collision molecule_id={} reason=duplicate_title",
                        molecule.id()
                    );
                } else {
                    debug!(
                        "event=seed_skip module=seed status=ok molecule_id={} reason=already_in_store",
                        molecule.id()
                    );
                }
                report.skipped.push(SkippedMolecule {
                    molecule_id: molecule.id().to_string(),
                    title: molecule.title().to_string(),
                    reason,
                });
                continue;
            }

            let request = NewIssue::new(
                molecule.title(),
                IssueType::Molecule,
                SEED_PRIORITY,
                molecule.description(),
            );
            match self.repo.create_issue(&request) {
                Ok(issue_id) => {
                    debug!(
                        "event=seed_create module=seed status=ok molecule_id={} issue_id={}",
                        molecule.id(),
                        issue_id
                    );
                    seeded_titles.insert(molecule.title());
                    report.created.push(SeededMolecule {
                        molecule_id: molecule.id().to_string(),
                        title: molecule.title().to_string(),
                        issue_id,
                    });
                }
                Err(err) => {
                    error!(
                        "event=seed_molecules module=seed status=error stage=create molecule_id={} created={} duration_ms={} error={}",
                        molecule.id(),
                        report.created_count(),
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(SeedError::Create {
                        molecule_id: molecule.id().to_string(),
                        title: molecule.title().to_string(),
                        partial: report,
                        source: err,
                    });
                }
            }
        }

        info!(
            "event=seed_molecules module=seed status=ok created={} skipped={} duration_ms={}",
            report.created_count(),
            report.skipped.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }
}

fn skip_reason(
    molecule: &Molecule,
    existing_titles: &HashSet<&str>,
    seeded_titles: &HashSet<&str>,
) -> Option<SkipReason> {
    if existing_titles.contains(molecule.title()) {
        Some(SkipReason::AlreadyInStore)
    } else if seeded_titles.contains(molecule.title()) {
        Some(SkipReason::DuplicateTitleInCatalog)
    } else {
        None
    }
}
