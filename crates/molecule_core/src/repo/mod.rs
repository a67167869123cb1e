//! Issue store boundary.
//!
//! # Responsibility
//! - Define the store contract the seeding service is written against.
//! - Provide a SQLite implementation of that contract.
//!
//! # Invariants
//! - Repositories validate create requests before persistence.
//! - Errors are returned to the caller verbatim; repositories never retry.

pub mod issue_repo;
