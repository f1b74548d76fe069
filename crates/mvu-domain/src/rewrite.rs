//! Descriptor rewrite planning. Every function returns the new descriptor text, or `None` when the
//! descriptor already holds the requested values.

use crate::expand::{VariableTable, expand_opt};
use crate::model::Dependency;
use mvu_pom::{DependencyEntry, NewDependency, PomDocument, PomEditor};
use mvu_types::Artifact;

/// Rewrite every entry of one dependency section whose expanded coordinates equal `original`.
///
/// `profile` selects the section: `None` for the unconditional dependencies, `Some(id)` for the
/// dependencies of the profile(s) with that id. Only fields whose expanded value differs from
/// `replacement` are written.
pub fn rewrite_dependency(
    doc: &PomDocument,
    table: &VariableTable,
    profile: Option<&str>,
    original: &Artifact,
    replacement: &Artifact,
) -> Option<String> {
    let project = &doc.project;
    let section: Vec<&DependencyEntry> = match profile {
        None => project.dependencies.iter().collect(),
        Some(id) => project
            .profiles
            .iter()
            .filter(|p| p.id.as_deref() == Some(id))
            .flat_map(|p| p.dependencies.iter())
            .collect(),
    };

    let mut editor = PomEditor::new(doc);
    for entry in section {
        let group = expand_opt(entry.group_id(), table);
        let artifact = expand_opt(entry.artifact_id(), table);
        let version = expand_opt(entry.version(), table);
        if group != original.group()
            || artifact != original.artifact()
            || version != original.version()
        {
            continue;
        }

        for (field, current, wanted) in [
            (&entry.group_id, group, replacement.group()),
            (&entry.artifact_id, artifact, replacement.artifact()),
            (&entry.version, version, replacement.version()),
        ] {
            if current != wanted
                && let Some(field) = field
            {
                editor.set_text(field, wanted);
            }
        }
    }
    editor.finish()
}

/// Set the project's own version. A project inheriting `current_version` from its parent only
/// gets a `<version>` element when the version actually changes.
pub fn rewrite_project_version(
    doc: &PomDocument,
    current_version: &str,
    version: &str,
) -> anyhow::Result<Option<String>> {
    if doc.project.version.is_none() && current_version == version {
        return Ok(None);
    }
    let mut editor = PomEditor::new(doc);
    editor.set_project_version(version)?;
    Ok(editor.finish())
}

/// Replace the unconditional dependency section with `deps`.
pub fn replace_dependency_section(doc: &PomDocument, deps: &[Dependency]) -> Option<String> {
    let entries: Vec<NewDependency> = deps
        .iter()
        .map(|d| NewDependency {
            group_id: d.artifact.group().to_string(),
            artifact_id: d.artifact.artifact().to_string(),
            version: d.artifact.version().to_string(),
            classifier: d.classifier.clone(),
            scope: Some(d.scope.clone()),
            system_path: d.system_path.clone(),
            exclusions: d
                .exclusions
                .iter()
                .map(|k| (k.group().to_string(), k.artifact().to_string()))
                .collect(),
        })
        .collect();

    let mut editor = PomEditor::new(doc);
    editor.replace_dependencies(&entries);
    let out = editor.finish()?;
    (out != doc.source).then_some(out)
}
