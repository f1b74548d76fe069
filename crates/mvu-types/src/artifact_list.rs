//! The persisted artifact list: one `group:artifact:version` per line.

use crate::coords::Artifact;

/// A line that could not be read as an artifact, kept for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactList {
    pub artifacts: Vec<Artifact>,
    pub rejected: Vec<RejectedLine>,
}

/// Render artifacts sorted by group, artifact, then version. Ends with a newline when non-empty.
pub fn format_artifact_list<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> String {
    let mut sorted: Vec<&Artifact> = artifacts.into_iter().collect();
    sorted.sort_by(|a, b| {
        a.group()
            .cmp(b.group())
            .then_with(|| a.artifact().cmp(b.artifact()))
            .then_with(|| a.version().cmp(b.version()))
    });

    let mut out = String::new();
    for a in sorted {
        out.push_str(&a.to_string());
        out.push('\n');
    }
    out
}

/// Read an artifact list. Comment (`#`) and blank lines are ignored; extra fields after the
/// version are ignored; lines with fewer than three fields are rejected.
pub fn parse_artifact_list(input: &str) -> ArtifactList {
    let mut list = ArtifactList::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 3 {
            list.rejected.push(RejectedLine {
                line: idx + 1,
                content: line.to_string(),
                reason: "expected group:artifact:version".to_string(),
            });
            continue;
        }

        match Artifact::jar(fields[0], fields[1], fields[2]) {
            Ok(a) => list.artifacts.push(a),
            Err(e) => list.rejected.push(RejectedLine {
                line: idx + 1,
                content: line.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    list
}
