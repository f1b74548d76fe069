use std::ops::Range;

/// A parsed descriptor together with the text it was parsed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PomDocument {
    pub source: String,
    pub project: ProjectModel,
}

/// A leaf value and the byte range of its (whitespace-trimmed) content in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextField {
    /// Unescaped, trimmed text.
    pub value: String,
    pub span: Range<usize>,
}

impl TextField {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: Option<TextField>,
    pub artifact_id: Option<TextField>,
    pub version: Option<TextField>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionEntry {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
}

/// One `<dependency>` element as written in the descriptor (no variable expansion).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyEntry {
    pub group_id: Option<TextField>,
    pub artifact_id: Option<TextField>,
    pub version: Option<TextField>,
    pub classifier: Option<TextField>,
    pub scope: Option<TextField>,
    pub system_path: Option<TextField>,
    pub exclusions: Vec<ExclusionEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileModel {
    pub id: Option<String>,
    pub modules: Vec<String>,
    pub dependencies: Vec<DependencyEntry>,
}

/// Offsets the editor needs for insertions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// Offset of the `</project>` closing tag.
    pub project_close: usize,
    /// Full element range of the unconditional `<dependencies>` section, if any.
    pub dependencies_section: Option<Range<usize>>,
    /// Offset just past the project's own `</artifactId>`.
    pub artifact_id_end: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectModel {
    pub group_id: Option<TextField>,
    pub artifact_id: Option<TextField>,
    pub version: Option<TextField>,
    pub packaging: Option<TextField>,
    pub parent: Option<ParentRef>,
    pub modules: Vec<String>,
    pub profiles: Vec<ProfileModel>,
    pub dependencies: Vec<DependencyEntry>,
    pub layout: Layout,
}

/// Borrow the value of an optional field.
pub(crate) fn value_of(field: &Option<TextField>) -> Option<&str> {
    field.as_ref().map(|f| f.value.as_str())
}

impl ProjectModel {
    pub fn group_id(&self) -> Option<&str> {
        value_of(&self.group_id)
    }

    pub fn artifact_id(&self) -> Option<&str> {
        value_of(&self.artifact_id)
    }

    pub fn version(&self) -> Option<&str> {
        value_of(&self.version)
    }

    pub fn packaging(&self) -> Option<&str> {
        value_of(&self.packaging)
    }
}

impl ParentRef {
    pub fn group_id(&self) -> Option<&str> {
        value_of(&self.group_id)
    }

    pub fn artifact_id(&self) -> Option<&str> {
        value_of(&self.artifact_id)
    }

    pub fn version(&self) -> Option<&str> {
        value_of(&self.version)
    }
}

impl DependencyEntry {
    pub fn group_id(&self) -> Option<&str> {
        value_of(&self.group_id)
    }

    pub fn artifact_id(&self) -> Option<&str> {
        value_of(&self.artifact_id)
    }

    pub fn version(&self) -> Option<&str> {
        value_of(&self.version)
    }

    pub fn classifier(&self) -> Option<&str> {
        value_of(&self.classifier)
    }

    pub fn scope(&self) -> Option<&str> {
        value_of(&self.scope)
    }

    pub fn system_path(&self) -> Option<&str> {
        value_of(&self.system_path)
    }
}
