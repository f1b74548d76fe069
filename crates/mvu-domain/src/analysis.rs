//! Read-only views over the reactor: filtered listings, dependants, multi-version search, and the
//! artifact list comparison.

use crate::index::{ArtifactIndex, DependentIndex};
use crate::model::{Dependency, DependencyMap, LocalArtifact};
use mvu_types::{Artifact, ArtifactKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Filters for dependency listings. `None` disables a filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyFilter {
    pub pattern: Option<String>,
    pub exact: bool,
    /// Keep only keys that are (or are not) built locally.
    pub local: Option<bool>,
    /// Keep only dependencies that are (or are not) system-scoped.
    pub system: Option<bool>,
}

impl DependencyFilter {
    fn matches_key(&self, key: &ArtifactKey) -> bool {
        match self.pattern.as_deref() {
            None => true,
            Some(p) if self.exact => key.as_str() == p,
            Some(p) => key.as_str().contains(p),
        }
    }
}

/// Keys (with their surviving dependencies) that pass `filter`. Keys left empty are dropped.
pub fn filter_dependencies<'a>(
    deps: &'a DependencyMap,
    index: &ArtifactIndex,
    filter: &DependencyFilter,
) -> Vec<(&'a ArtifactKey, Vec<&'a Dependency>)> {
    let mut out = Vec::new();
    for (key, list) in deps {
        if !filter.matches_key(key) {
            continue;
        }
        if let Some(local) = filter.local
            && index.contains(key) != local
        {
            continue;
        }
        let kept: Vec<&Dependency> = list
            .iter()
            .filter(|d| filter.system.is_none_or(|s| d.is_system() == s))
            .collect();
        if !kept.is_empty() {
            out.push((key, kept));
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DependantsEntry {
    pub key: ArtifactKey,
    pub local: bool,
    pub dependants: Vec<LocalArtifact>,
}

/// Every dependency key with its dependants; non-local keys first, then local ones.
pub fn dependants_listing(
    dependents: &DependentIndex,
    index: &ArtifactIndex,
) -> Vec<DependantsEntry> {
    let mut out = Vec::with_capacity(dependents.len());
    for show_local in [false, true] {
        for (key, owners) in dependents {
            let local = index.contains(key);
            if local == show_local {
                out.push(DependantsEntry {
                    key: key.clone(),
                    local,
                    dependants: owners.clone(),
                });
            }
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MultiVersionDependency {
    pub key: ArtifactKey,
    /// Declared version to the projects declaring it.
    pub versions: BTreeMap<String, Vec<LocalArtifact>>,
}

/// Keys required with more than one distinct version across the reactor.
pub fn multi_version_dependencies(deps: &DependencyMap) -> Vec<MultiVersionDependency> {
    let mut out = Vec::new();
    for (key, list) in deps {
        let mut versions: BTreeMap<String, Vec<LocalArtifact>> = BTreeMap::new();
        for dep in list {
            let owners = versions
                .entry(dep.artifact.version().to_string())
                .or_default();
            if !owners.contains(&dep.project) {
                owners.push(dep.project.clone());
            }
        }
        if versions.len() > 1 {
            out.push(MultiVersionDependency {
                key: key.clone(),
                versions,
            });
        }
    }
    out
}

/// Result of comparing a persisted artifact list with the scanned reactor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactListComparison {
    pub matching: Vec<Artifact>,
    /// `(listed, local)` pairs with equal key and different version.
    pub version_mismatches: Vec<(Artifact, Artifact)>,
    pub locally_missing: Vec<Artifact>,
    pub only_local: Vec<Artifact>,
}

impl ArtifactListComparison {
    pub fn is_match(&self) -> bool {
        self.version_mismatches.is_empty()
            && self.locally_missing.is_empty()
            && self.only_local.is_empty()
    }
}

/// Four-way comparison; packaging is ignored.
pub fn compare_artifact_list(
    listed: &[Artifact],
    local: &[LocalArtifact],
) -> ArtifactListComparison {
    let mut remaining_listed: Vec<&Artifact> = Vec::new();
    let mut remaining_local: Vec<&Artifact> = local.iter().map(|l| &l.artifact).collect();
    let mut out = ArtifactListComparison::default();

    for item in listed {
        match remaining_local.iter().position(|l| l.same_coordinates(item)) {
            Some(pos) => {
                remaining_local.remove(pos);
                out.matching.push(item.clone());
            }
            None => remaining_listed.push(item),
        }
    }

    for item in remaining_listed {
        match remaining_local.iter().position(|l| l.key() == item.key()) {
            Some(pos) => {
                let l = remaining_local.remove(pos);
                out.version_mismatches.push((item.clone(), l.clone()));
            }
            None => out.locally_missing.push(item.clone()),
        }
    }

    out.only_local = remaining_local.into_iter().cloned().collect();
    out
}
