use camino::Utf8PathBuf;
use mvu_types::{Artifact, ArtifactKey, DisplayOptions};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Dependencies keyed by the `group:artifact` of the required artifact, in encounter order.
pub type DependencyMap = BTreeMap<ArtifactKey, Vec<Dependency>>;

/// Scope assumed when a dependency does not declare one.
pub const DEFAULT_SCOPE: &str = "compile";

/// A project physically present in the scanned reactor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocalArtifact {
    pub artifact: Artifact,
    /// Descriptor file.
    pub location: Utf8PathBuf,
}

impl LocalArtifact {
    pub fn new(artifact: Artifact, location: impl Into<Utf8PathBuf>) -> Self {
        Self {
            artifact,
            location: location.into(),
        }
    }

    pub fn key(&self) -> ArtifactKey {
        self.artifact.key()
    }

    /// Matches `group:artifact` or `group:artifact:version`.
    pub fn matches_selector(&self, selector: &str) -> bool {
        let selector = selector.trim();
        self.key().as_str() == selector || self.artifact.to_string() == selector
    }
}

impl fmt::Display for LocalArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.artifact, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordField {
    GroupId,
    ArtifactId,
    Version,
}

impl fmt::Display for CoordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoordField::GroupId => "groupId",
            CoordField::ArtifactId => "artifactId",
            CoordField::Version => "version",
        })
    }
}

/// Why a dependency must not be rewritten automatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtectionReason {
    /// A coordinate still contains `${` after expansion.
    UnresolvedVariable { field: CoordField, raw: String },
    /// The dependency key matched a configured protection pattern.
    Configured { pattern: String },
    /// Declared in a profile without an `<id>`, which rewrites cannot address.
    UnnamedProfile,
}

impl fmt::Display for ProtectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtectionReason::UnresolvedVariable { field, raw } => {
                write!(f, "Variable used in {field} ({raw})")
            }
            ProtectionReason::Configured { pattern } => {
                write!(f, "Protected by configured pattern ({pattern})")
            }
            ProtectionReason::UnnamedProfile => f.write_str("Declared in a profile without an id"),
        }
    }
}

/// A declared dependency of a local project, coordinates already expanded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub artifact: Artifact,
    /// The project declaring the dependency.
    pub project: LocalArtifact,
    /// Id of the profile the dependency was declared in, if any.
    pub profile: Option<String>,
    pub scope: String,
    pub classifier: Option<String>,
    pub system_path: Option<String>,
    pub exclusions: Vec<ArtifactKey>,
    pub protection: Vec<ProtectionReason>,
}

impl Dependency {
    pub fn new(artifact: Artifact, project: LocalArtifact) -> Self {
        Self {
            artifact,
            project,
            profile: None,
            scope: DEFAULT_SCOPE.to_string(),
            classifier: None,
            system_path: None,
            exclusions: Vec::new(),
            protection: Vec::new(),
        }
    }

    pub fn key(&self) -> ArtifactKey {
        self.artifact.key()
    }

    pub fn is_system(&self) -> bool {
        self.scope == "system"
    }

    pub fn is_protected(&self) -> bool {
        !self.protection.is_empty()
    }

    /// Protection reasons joined with `", "`, or `None` when the dependency may be changed.
    pub fn change_protection(&self) -> Option<String> {
        if self.protection.is_empty() {
            return None;
        }
        let reasons: Vec<String> = self.protection.iter().map(|r| r.to_string()).collect();
        Some(reasons.join(", "))
    }

    pub fn display(&self, opts: DisplayOptions) -> DependencyDisplay<'_> {
        DependencyDisplay { dep: self, opts }
    }
}

/// Human-readable form of a [`Dependency`]:
/// `g:a:v(scope=..,classifier=..,system=..) (required by g:a:v[ @ location[ (profile)]])`.
pub struct DependencyDisplay<'a> {
    dep: &'a Dependency,
    opts: DisplayOptions,
}

impl fmt::Display for DependencyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dep = self.dep;
        let mut extra: Vec<String> = Vec::new();
        if dep.scope != DEFAULT_SCOPE {
            extra.push(format!("scope={}", dep.scope));
        }
        if let Some(classifier) = &dep.classifier {
            extra.push(format!("classifier={classifier}"));
        }
        if dep.is_system() {
            extra.push(format!(
                "system={}",
                dep.system_path.as_deref().unwrap_or_default()
            ));
        }

        write!(f, "{}", dep.artifact)?;
        if !extra.is_empty() {
            write!(f, "({})", extra.join(","))?;
        }
        write!(f, " (required by {}", dep.project)?;
        if self.opts.verbose {
            write!(f, " @ {}", dep.project.location)?;
            if let Some(profile) = &dep.profile {
                write!(f, " ({profile})")?;
            }
        }
        f.write_str(")")
    }
}

/// A dependency whose declared version differs from the locally built one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VersionMismatch {
    pub artifact_key: ArtifactKey,
    pub local: LocalArtifact,
    pub dependency: Dependency,
}

/// Which profiles are active. `*` selects every profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileSelection {
    all: bool,
    names: BTreeSet<String>,
}

impl ProfileSelection {
    /// Build from profile names; entries may themselves be comma separated.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sel = Self::default();
        for raw in names {
            for name in raw.as_ref().split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if name == "*" {
                    sel.all = true;
                } else {
                    sel.names.insert(name.to_string());
                }
            }
        }
        sel
    }

    pub fn all() -> Self {
        Self {
            all: true,
            names: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.all && self.names.is_empty()
    }

    /// Profiles without an id are only active when every profile is selected.
    pub fn is_active(&self, id: Option<&str>) -> bool {
        if self.all {
            return true;
        }
        id.is_some_and(|id| self.names.contains(id))
    }
}
