//! `${key}` substitution for coordinate values.

use mvu_types::Artifact;

/// Ordered variable table. Later inserts of an existing key replace its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableTable {
    entries: Vec<(String, String)>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables available to a project's dependencies: `project.*`, plus `project.parent.*`
    /// and the `parent.*` aliases when the project has a parent.
    pub fn for_project(project: &Artifact, parent: Option<&Artifact>) -> Self {
        let mut table = Self::new();
        table.insert("project.groupId", project.group());
        table.insert("project.artifactId", project.artifact());
        table.insert("project.version", project.version());
        if let Some(parent) = parent {
            table.insert_parent(parent.group(), parent.artifact(), parent.version());
        }
        table
    }

    /// Register `project.parent.*` and `parent.*` for the given parent coordinates.
    pub fn insert_parent(&mut self, group: &str, artifact: &str, version: &str) {
        for prefix in ["project.parent", "parent"] {
            self.insert(&format!("{prefix}.groupId"), group);
            self.insert(&format!("{prefix}.artifactId"), artifact);
            self.insert(&format!("{prefix}.version"), version);
        }
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace every registered `${key}` in `raw`, wherever it occurs.
///
/// Unregistered placeholders stay as written, and substituted values are never expanded again.
pub fn expand(raw: &str, table: &VariableTable) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let value = after.find('}').and_then(|close| {
            table
                .get(&after[..close])
                .map(|value| (value, &after[close + 1..]))
        });
        match value {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                // Keep the `$` and rescan: a registered key may start inside this token.
                out.push('$');
                rest = &rest[open + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Like [`expand`], with an absent value expanding to the empty string.
pub fn expand_opt(raw: Option<&str>, table: &VariableTable) -> String {
    raw.map(|r| expand(r, table)).unwrap_or_default()
}

/// Whether an (already expanded) value still carries a placeholder.
pub fn has_placeholder(value: &str) -> bool {
    value.contains("${")
}
