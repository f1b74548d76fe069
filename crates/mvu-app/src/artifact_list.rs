//! Persist the reactor's artifact list and check the reactor against a persisted one.

use anyhow::Context;
use camino::Utf8Path;
use mvu_domain::analysis::{ArtifactListComparison, compare_artifact_list};
use mvu_repo::Reactor;
use mvu_types::{format_artifact_list, parse_artifact_list};
use tracing::{error, info, warn};

use crate::mutate::{MutationOptions, Outcome, finish};

/// Write every local artifact, sorted, to `file`. An existing file is never overwritten.
pub fn persist_artifact_list(reactor: &Reactor, file: &Utf8Path, opts: MutationOptions) -> Outcome {
    if opts.dry_run {
        info!("(dryrun) I would write artifacts to {file}");
        return Outcome::DryRun;
    }
    if file.exists() {
        error!("File '{file}' already exists. Skipping.");
        return Outcome::Skipped(format!("{file} already exists"));
    }

    info!("Writing artifacts to {file}");
    let text = format_artifact_list(reactor.projects.iter().map(|p| &p.local.artifact));
    let result = std::fs::write(file, text)
        .with_context(|| format!("write {file}"))
        .map(|()| true);
    finish(file, result)
}

/// Compare the artifact list in `file` with the scanned reactor.
pub fn check_artifact_list(
    reactor: &Reactor,
    file: &Utf8Path,
) -> anyhow::Result<ArtifactListComparison> {
    let text = std::fs::read_to_string(file).with_context(|| format!("read {file}"))?;
    let list = parse_artifact_list(&text);
    for rejected in &list.rejected {
        warn!(
            "Incorrect line {} in {file}: {} ({})",
            rejected.line, rejected.content, rejected.reason
        );
    }

    let cmp = compare_artifact_list(&list.artifacts, &reactor.locals());
    if cmp.is_match() {
        info!("The list of artifacts matches the existing artifacts.");
    } else {
        warn!(
            version_mismatches = cmp.version_mismatches.len(),
            locally_missing = cmp.locally_missing.len(),
            only_local = cmp.only_local.len(),
            "The list of artifacts does not match the existing artifacts."
        );
    }
    Ok(cmp)
}

/// Human-readable comparison report.
pub fn render_comparison(cmp: &ArtifactListComparison) -> String {
    if cmp.is_match() {
        return "The list of artifacts matches the existing artifacts.\n".to_string();
    }
    let mut out = String::new();
    if !cmp.version_mismatches.is_empty() {
        out.push_str(&format!(
            "The following {} artifact versions do not match (file=local):\n",
            cmp.version_mismatches.len()
        ));
        for (listed, local) in &cmp.version_mismatches {
            out.push_str(&format!("  - {listed}={}\n", local.version()));
        }
    }
    if !cmp.locally_missing.is_empty() {
        out.push_str(&format!(
            "The following {} artifacts are locally missing:\n",
            cmp.locally_missing.len()
        ));
        for a in &cmp.locally_missing {
            out.push_str(&format!("  - {a}\n"));
        }
    }
    if !cmp.only_local.is_empty() {
        out.push_str(&format!(
            "The following {} artifacts are only locally available:\n",
            cmp.only_local.len()
        ));
        for a in &cmp.only_local {
            out.push_str(&format!("  - {a}\n"));
        }
    }
    out
}
