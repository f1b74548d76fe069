use serde::Serialize;
use std::fmt;

/// Packaging assumed when a descriptor does not declare one.
pub const DEFAULT_PACKAGING: &str = "jar";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("malformed coordinates '{input}' (expected {expected})")]
    Malformed {
        input: String,
        expected: &'static str,
    },
}

/// Canonical `group:artifact` key used by every index in the workspace.
///
/// Versions are never part of the key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn new(group: &str, artifact: &str) -> Self {
        Self(format!("{group}:{artifact}"))
    }

    /// Parse `group:artifact`. Exactly two non-empty fields are accepted.
    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let input = input.trim();
        let mut parts = input.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(g), Some(a), None) if !g.is_empty() && !a.is_empty() => Ok(Self::new(g, a)),
            _ => Err(CoordinateError::Malformed {
                input: input.to_string(),
                expected: "group:artifact",
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn group(&self) -> &str {
        self.0.split_once(':').map(|(g, _)| g).unwrap_or(&self.0)
    }

    pub fn artifact(&self) -> &str {
        self.0.split_once(':').map(|(_, a)| a).unwrap_or("")
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable artifact coordinates.
///
/// Equality includes the packaging; use [`Artifact::same_coordinates`] to compare
/// group, artifact and version only.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Artifact {
    group: String,
    artifact: String,
    version: String,
    packaging: String,
}

impl Artifact {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
        packaging: Option<&str>,
    ) -> Result<Self, CoordinateError> {
        let group = non_empty(group.into(), "group")?;
        let artifact = non_empty(artifact.into(), "artifact")?;
        let version = non_empty(version.into(), "version")?;
        let packaging = packaging
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PACKAGING)
            .to_string();
        Ok(Self {
            group,
            artifact,
            version,
            packaging,
        })
    }

    /// Shorthand for artifacts with the default packaging.
    pub fn jar(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, CoordinateError> {
        Self::new(group, artifact, version, None)
    }

    /// Parse `group:artifact:version`. Exactly three non-empty fields are accepted.
    pub fn parse_triple(input: &str) -> Result<Self, CoordinateError> {
        let input = input.trim();
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() != 3 {
            return Err(CoordinateError::Malformed {
                input: input.to_string(),
                expected: "group:artifact:version",
            });
        }
        Self::jar(parts[0], parts[1], parts[2])
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.group, &self.artifact)
    }

    /// Same group and artifact, different version.
    pub fn with_version(&self, version: impl Into<String>) -> Result<Self, CoordinateError> {
        Self::new(
            self.group.clone(),
            self.artifact.clone(),
            version,
            Some(&self.packaging),
        )
    }

    /// Compare group, artifact and version; packaging is ignored.
    pub fn same_coordinates(&self, other: &Artifact) -> bool {
        self.group == other.group
            && self.artifact == other.artifact
            && self.version == other.version
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, CoordinateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Empty { field });
    }
    Ok(trimmed.to_string())
}
