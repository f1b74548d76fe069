//! Version alignment use cases: detect mismatches, align, set versions, replace coordinates.

use anyhow::Context;
use mvu_domain::mismatch::MismatchReport;
use mvu_domain::rewrite::rewrite_project_version;
use mvu_repo::Reactor;
use mvu_types::{Artifact, ArtifactKey};
use tracing::{debug, error, info, warn};

use crate::mutate::{
    MutationOptions, MutationSummary, Outcome, finish, modify_dependency, rewrite_descriptor,
};

/// Mismatches between declared dependency versions and the locally built versions.
///
/// With a non-empty `select`, only those keys are inspected; selected keys that no dependency
/// refers to are logged as warnings.
pub fn detect_mismatches(reactor: &Reactor, select: &[ArtifactKey]) -> MismatchReport {
    let report =
        mvu_domain::mismatch::detect_mismatches(&reactor.index, &reactor.dependencies, select);
    for key in &report.unmatched_selected {
        warn!("Could not find selected dependency: {key}");
    }
    debug!(mismatches = report.mismatches.len(), "mismatch detection done");
    report
}

/// Rewrite every dependency on one of the `select`ed local artifacts to the local version.
///
/// Selection entries are `group:artifact` keys; malformed entries are warned about and ignored.
pub fn align_local_versions(
    reactor: &Reactor,
    select: &[String],
    opts: MutationOptions,
) -> MutationSummary {
    let mut keys = Vec::new();
    for raw in select {
        match ArtifactKey::parse(raw) {
            Ok(key) => keys.push(key),
            Err(e) => warn!("Could not find selected dependency: {raw} ({e})"),
        }
    }
    let mut summary = MutationSummary::default();
    if keys.is_empty() {
        return summary;
    }

    let report = detect_mismatches(reactor, &keys);
    for mismatch in &report.mismatches {
        let outcome = match mismatch
            .dependency
            .artifact
            .with_version(mismatch.local.artifact.version())
        {
            Ok(target) => modify_dependency(&mismatch.dependency, &target, opts),
            Err(e) => Outcome::Skipped(e.to_string()),
        };
        summary.record(&outcome);
    }
    summary
}

/// Set every dependency on `group:artifact` to the version of the given `group:artifact:version`.
///
/// A malformed triple is an error.
pub fn set_dependency_version(
    reactor: &Reactor,
    triple: &str,
    opts: MutationOptions,
) -> anyhow::Result<MutationSummary> {
    let target = Artifact::parse_triple(triple)
        .with_context(|| format!("illegal dependency key given: {triple}"))?;

    let mut summary = MutationSummary::default();
    let Some(deps) = reactor.dependencies.get(&target.key()) else {
        info!("No dependency on {} found", target.key());
        return Ok(summary);
    };
    for dep in deps {
        let replacement = dep.artifact.with_version(target.version())?;
        summary.record(&modify_dependency(dep, &replacement, opts));
    }
    Ok(summary)
}

/// Replace every dependency declared exactly as `old` (`group:artifact:version`) by `new`.
///
/// A malformed `new` is warned about and nothing is changed.
pub fn replace_dependency(
    reactor: &Reactor,
    old: &str,
    new: &str,
    opts: MutationOptions,
) -> MutationSummary {
    let old = old.trim();
    let mut summary = MutationSummary::default();
    let matching: Vec<_> = reactor
        .dependencies
        .values()
        .flatten()
        .filter(|d| d.artifact.to_string() == old)
        .collect();
    if matching.is_empty() {
        info!("No dependency matches {old}");
        return summary;
    }

    let replacement = match Artifact::parse_triple(new) {
        Ok(a) => a,
        Err(e) => {
            warn!("Incorrect dependency key given: {new} ({e})");
            summary.record(&Outcome::Skipped(e.to_string()));
            return summary;
        }
    };
    for dep in matching {
        summary.record(&modify_dependency(dep, &replacement, opts));
    }
    summary
}

/// Set the own version of the project `group:artifact` to the version in `triple`.
///
/// Unparseable triples and unknown projects are logged as errors and skipped.
pub fn update_own_version(reactor: &Reactor, triple: &str, opts: MutationOptions) -> Outcome {
    let target = match Artifact::parse_triple(triple) {
        Ok(a) => a,
        Err(e) => {
            error!("Could not parse artifact key: {triple} ({e})");
            return Outcome::Skipped(e.to_string());
        }
    };
    let Some(project) = reactor.find_by_key(&target.key()) else {
        error!("Could not find project: {}", target.key());
        return Outcome::Skipped(format!("project {} not found", target.key()));
    };

    if opts.dry_run {
        info!("(dryrun) I would change project version: {target}");
        return Outcome::DryRun;
    }

    let local = &project.local;
    info!(
        "Updating version for project: {} to {}",
        local,
        target.version()
    );
    let current = local.artifact.version();
    let result = rewrite_descriptor(&local.location, |doc| {
        rewrite_project_version(doc, current, target.version())
    });
    finish(&local.location, result)
}

/// [`set_dependency_version`] followed by [`update_own_version`] for the same triple.
pub fn update_artifact_and_dependency_version(
    reactor: &Reactor,
    triple: &str,
    opts: MutationOptions,
) -> anyhow::Result<MutationSummary> {
    let mut summary = set_dependency_version(reactor, triple, opts)?;
    summary.record(&update_own_version(reactor, triple, opts));
    Ok(summary)
}
