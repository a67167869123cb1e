//! CLI smoke entry point.
//!
//! # Responsibility
//! - Print the built-in catalog with each molecule's step order.
//! - Seed the catalog into `MOLECULE_DB_PATH` when it is set.
//! - Exit non-zero on configuration, catalog or seeding failure.

use log::info;
use molecule_core::db::open_db;
use molecule_core::{
    core_version, init_logging, CoreConfig, MoleculeCatalog, SeedError, SeedReport, SeedService,
    SqliteIssueRepository,
};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("molecule_core version={}", core_version());

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let catalog = match MoleculeCatalog::builtin() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("catalog error: {err}");
            return ExitCode::FAILURE;
        }
    };
    print_catalog(&catalog);

    let Some(db_path) = &config.db_path else {
        println!("seed skipped: MOLECULE_DB_PATH not set");
        return ExitCode::SUCCESS;
    };
    match seed_into(db_path, &catalog) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn print_catalog(catalog: &MoleculeCatalog) {
    for molecule in catalog {
        let order: Vec<_> = molecule.graph().topological_order().collect();
        println!(
            "{} \"{}\" steps={}",
            molecule.id(),
            molecule.title(),
            order.join(" -> ")
        );
    }
}

fn seed_into(db_path: &Path, catalog: &MoleculeCatalog) -> Result<SeedReport, String> {
    let conn = open_db(db_path).map_err(|err| format!("store error: {err}"))?;
    let repo = SqliteIssueRepository::new(&conn);
    info!(
        "event=cli_seed module=cli status=start db_path={}",
        db_path.display()
    );

    SeedService::new(repo)
        .seed_catalog(catalog)
        .map_err(|err| match &err {
            SeedError::Create { .. } => format!(
                "seed failed after creating {} molecule(s): {err}",
                err.created_count()
            ),
            SeedError::Catalog(_) | SeedError::List(_) => format!("seed failed: {err}"),
        })
}

fn print_report(report: &SeedReport) {
    println!("seeded created={}", report.created_count());
    for entry in &report.created {
        println!("  created {} issue={}", entry.title, entry.issue_id);
    }
    for entry in &report.skipped {
        println!("  skipped {} ({:?})", entry.title, entry.reason);
    }
}
