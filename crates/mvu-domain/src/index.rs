use crate::error::ReactorError;
use crate::model::{DependencyMap, LocalArtifact};
use mvu_types::ArtifactKey;
use std::collections::BTreeMap;

/// Local artifacts by key. Every list holds exactly one artifact once built by
/// [`index_artifacts`].
#[derive(Clone, Debug, Default)]
pub struct ArtifactIndex {
    by_key: BTreeMap<ArtifactKey, Vec<LocalArtifact>>,
}

impl ArtifactIndex {
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&[LocalArtifact]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    /// The authoritative local artifact for `key`.
    pub fn local(&self, key: &ArtifactKey) -> Option<&LocalArtifact> {
        self.by_key.get(key).and_then(|v| v.first())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &[LocalArtifact])> {
        self.by_key.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Artifacts whose key equals `pattern` (`exact`) or contains it.
    pub fn search(&self, pattern: &str, exact: bool) -> Vec<&LocalArtifact> {
        self.by_key
            .iter()
            .filter(|(k, _)| {
                if exact {
                    k.as_str() == pattern
                } else {
                    k.as_str().contains(pattern)
                }
            })
            .flat_map(|(_, v)| v.iter())
            .collect()
    }
}

/// Index local artifacts by key, failing on the first key declared twice.
pub fn index_artifacts(artifacts: &[LocalArtifact]) -> Result<ArtifactIndex, ReactorError> {
    let mut index = ArtifactIndex::default();
    for artifact in artifacts {
        let key = artifact.key();
        if let Some(existing) = index.local(&key) {
            return Err(ReactorError::DuplicateArtifactKey {
                key,
                first: existing.location.clone(),
                second: artifact.location.clone(),
            });
        }
        index.by_key.entry(key).or_default().push(artifact.clone());
    }
    Ok(index)
}

/// Owning projects of every dependency, by dependency key.
pub type DependentIndex = BTreeMap<ArtifactKey, Vec<LocalArtifact>>;

pub fn index_dependents(deps: &DependencyMap) -> DependentIndex {
    deps.iter()
        .map(|(key, list)| (key.clone(), list.iter().map(|d| d.project.clone()).collect()))
        .collect()
}
