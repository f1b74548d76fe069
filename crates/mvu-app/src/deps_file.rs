//! Export a project's dependencies to a list file, and replace them from one.

use anyhow::Context;
use camino::Utf8Path;
use mvu_domain::codec::{export_dependencies, import_dependencies};
use mvu_domain::extract::extract_dependencies;
use mvu_domain::model::{LocalArtifact, ProfileSelection};
use mvu_domain::protect::ProtectRules;
use mvu_domain::rewrite::replace_dependency_section;
use mvu_repo::Reactor;
use tracing::{error, info, warn};

use crate::mutate::{MutationOptions, Outcome, finish, rewrite_descriptor};

/// Write the unconditional dependencies of `project` (`group:artifact[:version]`) to `file`.
///
/// The descriptor is re-read so the export reflects the file as it is now. An existing `file` is
/// never overwritten.
pub fn extract_project_dependencies(
    reactor: &Reactor,
    project: &str,
    file: &Utf8Path,
    opts: MutationOptions,
) -> Outcome {
    if file.exists() {
        error!("File already exists: {file}");
        return Outcome::Skipped(format!("{file} already exists"));
    }
    let Some(candidate) = reactor.find(project) else {
        error!("Could not find project: {project}");
        return Outcome::Skipped(format!("project {project} not found"));
    };
    let local = &candidate.local;

    if opts.dry_run {
        info!("(dryrun) I would save dependencies of project '{local}' to file: {file}");
        return Outcome::DryRun;
    }
    info!("Saving dependencies of project '{local}' to file: {file}");

    let result = write_export(local, file);
    finish(file, result)
}

fn write_export(local: &LocalArtifact, file: &Utf8Path) -> anyhow::Result<bool> {
    let doc = mvu_repo::read_descriptor(&local.location)?;
    let extracted = extract_dependencies(
        local,
        &doc.project,
        &ProfileSelection::default(),
        &ProtectRules::default(),
    );
    for skipped in &extracted.skipped {
        warn!("Dependency not exported: {skipped}");
    }
    let text = export_dependencies(local, &extracted.dependencies);
    std::fs::write(file, text).with_context(|| format!("write {file}"))?;
    Ok(true)
}

/// Replace the unconditional dependency section of `project` with the dependencies in `file`.
pub fn apply_project_dependencies(
    reactor: &Reactor,
    project: &str,
    file: &Utf8Path,
    opts: MutationOptions,
) -> Outcome {
    let Some(candidate) = reactor.find(project) else {
        error!("Could not find project: {project}");
        return Outcome::Skipped(format!("project {project} not found"));
    };
    let local = &candidate.local;

    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            error!("Cannot read file: {file}: {e}");
            return Outcome::Failed(format!("read {file}: {e}"));
        }
    };
    let imported = import_dependencies(&text, local);
    for warning in &imported.warnings {
        warn!("{file}: {warning}");
    }
    let deps = imported.dependencies;

    if opts.dry_run {
        info!(
            "(dryrun) I would replace the dependencies of project '{local}' with {} dependencies from: {file}",
            deps.len()
        );
        return Outcome::DryRun;
    }

    info!(
        "Updating dependencies of project '{local}' with {} dependencies from: {file}",
        deps.len()
    );
    let result = rewrite_descriptor(&local.location, |doc| {
        Ok(replace_dependency_section(doc, &deps))
    });
    finish(&local.location, result)
}
