use crate::index::ArtifactIndex;
use crate::model::{DependencyMap, VersionMismatch};
use mvu_types::ArtifactKey;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    pub mismatches: Vec<VersionMismatch>,
    /// Selected keys that no dependency refers to.
    pub unmatched_selected: Vec<ArtifactKey>,
}

/// Compare every dependency on a local artifact against the local version.
///
/// With a non-empty `select`, only those keys are inspected. Packaging is ignored.
pub fn detect_mismatches(
    index: &ArtifactIndex,
    deps: &DependencyMap,
    select: &[ArtifactKey],
) -> MismatchReport {
    let selected: BTreeSet<&ArtifactKey> = select.iter().collect();
    let mut seen: BTreeSet<&ArtifactKey> = BTreeSet::new();
    let mut report = MismatchReport::default();

    for (key, list) in deps {
        if !selected.is_empty() {
            if !selected.contains(key) {
                continue;
            }
            seen.insert(key);
        }

        let Some(local) = index.local(key) else {
            continue;
        };
        for dep in list {
            if !dep.artifact.same_coordinates(&local.artifact) {
                report.mismatches.push(VersionMismatch {
                    artifact_key: key.clone(),
                    local: local.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    let mut reported = BTreeSet::new();
    for key in select {
        if !seen.contains(key) && reported.insert(key) {
            report.unmatched_selected.push(key.clone());
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::group_by_key;
    use crate::index::index_artifacts;
    use crate::test_support::{dep, local};

    fn reactor() -> (ArtifactIndex, DependencyMap) {
        let core = local("com.acme:core:2.0", "core/pom.xml");
        let app = local("com.acme:app:1.0", "app/pom.xml");
        let index = index_artifacts(&[core, app.clone()]).expect("index");
        let deps = group_by_key([
            dep("com.acme:core:1.0", &app),
            dep("org.external:lib:3", &app),
        ]);
        (index, deps)
    }

    #[test]
    fn reports_version_mismatch_against_local() {
        let (index, deps) = reactor();
        let report = detect_mismatches(&index, &deps, &[]);
        assert_eq!(report.mismatches.len(), 1);
        let m = &report.mismatches[0];
        assert_eq!(m.artifact_key, ArtifactKey::new("com.acme", "core"));
        assert_eq!(m.local.artifact.version(), "2.0");
        assert_eq!(m.dependency.artifact.version(), "1.0");
        assert!(report.unmatched_selected.is_empty());
    }

    #[test]
    fn equal_versions_are_not_reported() {
        let core = local("com.acme:core:2.0", "core/pom.xml");
        let app = local("com.acme:app:1.0", "app/pom.xml");
        let index = index_artifacts(&[core, app.clone()]).expect("index");
        let deps = group_by_key([dep("com.acme:core:2.0", &app)]);
        assert!(detect_mismatches(&index, &deps, &[]).mismatches.is_empty());
    }

    #[test]
    fn selection_restricts_and_reports_unknown_keys() {
        let (index, deps) = reactor();
        let select = vec![
            ArtifactKey::new("org.external", "lib"),
            ArtifactKey::new("com.acme", "missing"),
        ];
        let report = detect_mismatches(&index, &deps, &select);
        assert!(report.mismatches.is_empty());
        assert_eq!(
            report.unmatched_selected,
            vec![ArtifactKey::new("com.acme", "missing")]
        );
    }

    #[test]
    fn selected_local_key_is_reported() {
        let (index, deps) = reactor();
        let report = detect_mismatches(&index, &deps, &[ArtifactKey::new("com.acme", "core")]);
        assert_eq!(report.mismatches.len(), 1);
        assert!(report.unmatched_selected.is_empty());
    }
}
