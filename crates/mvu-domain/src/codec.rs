//! Dependency list files.
//!
//! One dependency per line:
//! `group:artifact:version(classifier=..,scope=..,systemPath=..,exclusions=g:a;g:a)`.
//! Lines starting with `#` and blank lines are ignored.

use crate::model::{Dependency, LocalArtifact};
use mvu_types::{Artifact, ArtifactKey};

/// Render the dependencies of `project`.
pub fn export_dependencies(project: &LocalArtifact, deps: &[Dependency]) -> String {
    let mut out = format!("# Dependencies of: {project}\n");
    for dep in deps {
        let mut attrs: Vec<String> = Vec::new();
        if let Some(classifier) = &dep.classifier {
            attrs.push(format!("classifier={classifier}"));
        }
        attrs.push(format!("scope={}", dep.scope));
        if dep.is_system()
            && let Some(path) = &dep.system_path
        {
            attrs.push(format!("systemPath={path}"));
        }
        if !dep.exclusions.is_empty() {
            let excl: Vec<&str> = dep.exclusions.iter().map(|k| k.as_str()).collect();
            attrs.push(format!("exclusions={}", excl.join(";")));
        }
        out.push_str(&format!("{}({})\n", dep.artifact, attrs.join(",")));
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct ImportedDependencies {
    pub dependencies: Vec<Dependency>,
    /// Problems found while reading, one message per problem.
    pub warnings: Vec<String>,
}

/// Read a dependency list; every dependency is owned by `project`.
pub fn import_dependencies(input: &str, project: &LocalArtifact) -> ImportedDependencies {
    let mut out = ImportedDependencies::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = idx + 1;

        let (coords, attrs) = match line.split_once('(') {
            Some((coords, rest)) => match rest.strip_suffix(')') {
                Some(attrs) => (coords, Some(attrs)),
                None => {
                    out.warnings
                        .push(format!("line {lineno}: missing closing ')': {line}"));
                    continue;
                }
            },
            None => (line, None),
        };

        let artifact = match Artifact::parse_triple(coords) {
            Ok(a) => a,
            Err(e) => {
                out.warnings.push(format!("line {lineno}: {e}"));
                continue;
            }
        };

        let mut dep = Dependency::new(artifact, project.clone());

        for attr in attrs
            .into_iter()
            .flat_map(|a| a.split(','))
            .map(str::trim)
            .filter(|a| !a.is_empty())
        {
            let (name, value) = attr.split_once('=').unwrap_or((attr, ""));
            match name {
                "scope" => dep.scope = value.to_string(),
                "classifier" => dep.classifier = Some(value.to_string()),
                "systemPath" => dep.system_path = Some(value.to_string()),
                "exclusions" => {
                    for excl in value.split(';').map(str::trim).filter(|e| !e.is_empty()) {
                        match ArtifactKey::parse(excl) {
                            Ok(key) => dep.exclusions.push(key),
                            Err(e) => out.warnings.push(format!("line {lineno}: {e}")),
                        }
                    }
                }
                other => out
                    .warnings
                    .push(format!("line {lineno}: unknown attribute '{other}' ignored")),
            }
        }

        out.dependencies.push(dep);
    }

    out
}
