//! Built-in molecule catalog.
//!
//! # Responsibility
//! - Expose the fixed, ordered set of built-in molecules.
//! - Reject a catalog whose definitions break molecule invariants.
//!
//! # Invariants
//! - Catalog order is deterministic for a given build.
//! - Molecule ids are unique within a catalog.
//! - Titles may repeat; seeding treats the first occurrence as canonical.

pub mod builtin;

use crate::model::molecule::{Molecule, MoleculeValidationError};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use builtin::{
    bootstrap_gas_town, engineer_in_box, install_go_binary, quick_fix, research,
    BOOTSTRAP_GAS_TOWN_ID, ENGINEER_IN_BOX_ID, INSTALL_GO_BINARY_ID, QUICK_FIX_ID, RESEARCH_ID,
};

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A definition failed molecule validation.
    Molecule {
        id: String,
        source: MoleculeValidationError,
    },
    DuplicateId(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Molecule { id, source } => write!(f, "invalid built-in molecule `{id}`: {source}"),
            Self::DuplicateId(id) => write!(f, "molecule id `{id}` appears more than once"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Molecule { source, .. } => Some(source),
            Self::DuplicateId(_) => None,
        }
    }
}

/// Ordered, validated collection of molecules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeCatalog {
    molecules: Vec<Molecule>,
}

impl MoleculeCatalog {
    /// Wraps `molecules`, keeping their order.
    ///
    /// # Errors
    /// - `DuplicateId` when two molecules share an id.
    pub fn new(molecules: Vec<Molecule>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for molecule in &molecules {
            if !seen.insert(molecule.id()) {
                return Err(CatalogError::DuplicateId(molecule.id().to_string()));
            }
        }
        Ok(Self { molecules })
    }

    /// Builds the built-in catalog in its fixed order.
    pub fn builtin() -> CatalogResult<Self> {
        let definitions: [(&str, fn() -> Result<Molecule, MoleculeValidationError>); 5] = [
            (ENGINEER_IN_BOX_ID, engineer_in_box),
            (QUICK_FIX_ID, quick_fix),
            (RESEARCH_ID, research),
            (INSTALL_GO_BINARY_ID, install_go_binary),
            (BOOTSTRAP_GAS_TOWN_ID, bootstrap_gas_town),
        ];

        let mut molecules = Vec::with_capacity(definitions.len());
        for (id, define) in definitions {
            let molecule = define().map_err(|source| CatalogError::Molecule {
                id: id.to_string(),
                source,
            })?;
            molecules.push(molecule);
        }
        Self::new(molecules)
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Molecule> {
        self.molecules.iter()
    }

    pub fn as_slice(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn get(&self, id: &str) -> Option<&Molecule> {
        self.molecules.iter().find(|molecule| molecule.id() == id)
    }

    /// First molecule carrying `title`, matching how seeding resolves titles.
    pub fn find_by_title(&self, title: &str) -> Option<&Molecule> {
        self.molecules
            .iter()
            .find(|molecule| molecule.title() == title)
    }

    /// Titles carried by more than one molecule, in first-seen order.
    pub fn duplicate_titles(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for molecule in &self.molecules {
            *counts.entry(molecule.title()).or_default() += 1;
        }

        let mut reported = HashSet::new();
        self.molecules
            .iter()
            .map(Molecule::title)
            .filter(|title| counts[title] > 1 && reported.insert(*title))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MoleculeCatalog {
    type Item = &'a Molecule;
    type IntoIter = std::slice::Iter<'a, Molecule>;

    fn into_iter(self) -> Self::IntoIter {
        self.molecules.iter()
    }
}
