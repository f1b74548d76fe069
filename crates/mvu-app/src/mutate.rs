//! Shared mutation plumbing: dry-run gate, protection check, read-modify-write of one descriptor.

use anyhow::Context;
use camino::Utf8Path;
use mvu_domain::identity::descriptor_table;
use mvu_domain::model::Dependency;
use mvu_domain::rewrite::rewrite_dependency;
use mvu_pom::PomDocument;
use mvu_types::{Artifact, DisplayOptions};
use tracing::{error, info};

/// Options threaded through every mutating use case.
#[derive(Clone, Copy, Debug, Default)]
pub struct MutationOptions {
    /// Log intended changes without writing any file.
    pub dry_run: bool,
    pub display: DisplayOptions,
}

/// What happened to one requested change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Written,
    /// The descriptor already held the requested values.
    Unchanged,
    DryRun,
    /// The dependency carries change-protection reasons.
    Protected(String),
    /// The request could not be carried out (unknown project, existing file, ...).
    Skipped(String),
    /// Reading, parsing or writing the file failed.
    Failed(String),
}

/// Outcome counts of a use case touching several files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub written: usize,
    pub unchanged: usize,
    pub dry_run: usize,
    pub protected: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl MutationSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Written => self.written += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::DryRun => self.dry_run += 1,
            Outcome::Protected(_) => self.protected += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &MutationSummary) {
        self.written += other.written;
        self.unchanged += other.unchanged;
        self.dry_run += other.dry_run;
        self.protected += other.protected;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.written + self.unchanged + self.dry_run + self.protected + self.skipped + self.failed
    }
}

/// Rewrite the coordinates of `dep` in its owner's descriptor to `replacement`.
pub(crate) fn modify_dependency(
    dep: &Dependency,
    replacement: &Artifact,
    opts: MutationOptions,
) -> Outcome {
    if let Some(reason) = dep.change_protection() {
        info!(
            "Modifying project {} is not allowed because: \"{}\" in {}",
            dep.project,
            reason,
            dep.display(opts.display)
        );
        return Outcome::Protected(reason);
    }

    if opts.dry_run {
        info!(
            "(dryrun) I would change dependency: {}\n  - to: {}",
            dep.display(opts.display),
            replacement
        );
        return Outcome::DryRun;
    }

    info!(
        "About to change dependency: {} to: {}",
        dep.display(opts.display),
        replacement
    );
    let result = rewrite_descriptor(&dep.project.location, |doc| {
        let table = descriptor_table(&doc.project)?;
        Ok(rewrite_dependency(
            doc,
            &table,
            dep.profile.as_deref(),
            &dep.artifact,
            replacement,
        ))
    });
    finish(&dep.project.location, result)
}

/// Read, re-parse and rewrite one descriptor. `plan` returns `None` when nothing changes; the file
/// is only written otherwise. Returns whether the file was written.
pub(crate) fn rewrite_descriptor(
    path: &Utf8Path,
    plan: impl FnOnce(&PomDocument) -> anyhow::Result<Option<String>>,
) -> anyhow::Result<bool> {
    let doc = mvu_repo::read_descriptor(path)?;
    let Some(text) = plan(&doc)? else {
        return Ok(false);
    };
    info!("Modifying file: {path}");
    std::fs::write(path, text).with_context(|| format!("write {path}"))?;
    Ok(true)
}

/// Turn a rewrite result into an outcome, logging failures.
pub(crate) fn finish(path: &Utf8Path, result: anyhow::Result<bool>) -> Outcome {
    match result {
        Ok(true) => Outcome::Written,
        Ok(false) => Outcome::Unchanged,
        Err(e) => {
            error!("Could not process file: {path}: {e:#}");
            Outcome::Failed(format!("{e:#}"))
        }
    }
}
