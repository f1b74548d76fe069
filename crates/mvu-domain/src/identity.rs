//! Resolve a descriptor's own coordinates.

use crate::expand::{VariableTable, expand};
use mvu_pom::ProjectModel;
use mvu_types::{Artifact, CoordinateError};

/// The parent reference as an artifact, when all three coordinates are declared.
pub fn parent_artifact(model: &ProjectModel) -> Option<Artifact> {
    let parent = model.parent.as_ref()?;
    Artifact::new(
        parent.group_id()?,
        parent.artifact_id()?,
        parent.version()?,
        Some("pom"),
    )
    .ok()
}

/// Resolve the project's identity.
///
/// Group and version fall back to the parent reference; parent variables are expanded;
/// packaging defaults to `jar`.
pub fn resolve_identity(model: &ProjectModel) -> Result<Artifact, CoordinateError> {
    let mut table = VariableTable::new();
    let parent = model.parent.as_ref();
    if let Some(p) = parent {
        table.insert_parent(
            p.group_id().unwrap_or_default(),
            p.artifact_id().unwrap_or_default(),
            p.version().unwrap_or_default(),
        );
    }

    let group = model
        .group_id()
        .or_else(|| parent.and_then(|p| p.group_id()))
        .unwrap_or_default();
    let artifact = model.artifact_id().unwrap_or_default();
    let version = model
        .version()
        .or_else(|| parent.and_then(|p| p.version()))
        .unwrap_or_default();

    Artifact::new(
        expand(group, &table),
        expand(artifact, &table),
        expand(version, &table),
        model.packaging(),
    )
}

/// The variable table used to expand this descriptor's dependency coordinates.
pub fn descriptor_table(model: &ProjectModel) -> Result<VariableTable, CoordinateError> {
    let own = resolve_identity(model)?;
    Ok(VariableTable::for_project(
        &own,
        parent_artifact(model).as_ref(),
    ))
}
