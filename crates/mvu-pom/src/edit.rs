use crate::model::{PomDocument, TextField};
use quick_xml::escape::escape;
use std::ops::Range;

/// A dependency to be written into a regenerated `<dependencies>` section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub scope: Option<String>,
    pub system_path: Option<String>,
    /// `(group, artifact)` pairs.
    pub exclusions: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Collects text edits against one parsed descriptor and applies them in a single pass.
///
/// Edits must not overlap. Everything outside the edited ranges is preserved byte for byte.
pub struct PomEditor<'a> {
    doc: &'a PomDocument,
    edits: Vec<Edit>,
}

impl<'a> PomEditor<'a> {
    pub fn new(doc: &'a PomDocument) -> Self {
        Self {
            doc,
            edits: Vec::new(),
        }
    }

    /// Replace the content of a located leaf. Returns `false` when the value is already equal.
    pub fn set_text(&mut self, field: &TextField, value: &str) -> bool {
        if field.value == value {
            return false;
        }
        self.edits.push(Edit {
            range: field.span.clone(),
            text: escape(value).into_owned(),
        });
        true
    }

    /// Set the project's own version, inserting a `<version>` element after `<artifactId>` when
    /// the project inherits its version from the parent.
    pub fn set_project_version(&mut self, version: &str) -> anyhow::Result<bool> {
        let doc = self.doc;
        let project = &doc.project;
        if let Some(field) = project.version.as_ref() {
            return Ok(self.set_text(field, version));
        }

        let Some(insert_at) = project.layout.artifact_id_end else {
            anyhow::bail!("descriptor has no <artifactId> to place a <version> after");
        };
        let indent = project
            .artifact_id
            .as_ref()
            .map(|f| line_indent(&doc.source, f.span.start))
            .unwrap_or_default();
        self.edits.push(Edit {
            range: insert_at..insert_at,
            text: format!("\n{indent}<version>{}</version>", escape(version)),
        });
        Ok(true)
    }

    /// Replace the unconditional `<dependencies>` section, or insert one before `</project>`.
    pub fn replace_dependencies(&mut self, deps: &[NewDependency]) {
        let doc = self.doc;
        let source = &doc.source;
        let layout = &doc.project.layout;

        match layout.dependencies_section.clone() {
            Some(range) => {
                let base = line_indent(source, range.start);
                let unit = indent_unit(&base);
                let text = render_section(deps, &base, &unit);
                self.edits.push(Edit { range, text });
            }
            None => {
                let base = doc
                    .project
                    .artifact_id
                    .as_ref()
                    .map(|f| line_indent(source, f.span.start))
                    .unwrap_or_else(|| "  ".to_string());
                let unit = indent_unit(&base);
                let at = layout.project_close;
                let mut text = String::new();
                if !source[..at].ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&base);
                text.push_str(&render_section(deps, &base, &unit));
                text.push('\n');
                self.edits.push(Edit {
                    range: at..at,
                    text,
                });
            }
        }
    }

    /// Apply the collected edits. Returns `None` when nothing was changed.
    pub fn finish(mut self) -> Option<String> {
        if self.edits.is_empty() {
            return None;
        }
        self.edits.sort_by_key(|e| (e.range.start, e.range.end));
        let mut out = self.doc.source.clone();
        for edit in self.edits.iter().rev() {
            out.replace_range(edit.range.clone(), &edit.text);
        }
        Some(out)
    }
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(source: &str, offset: usize) -> String {
    let head = &source[..offset];
    let line_start = head.rfind('\n').map(|i| i + 1).unwrap_or(0);
    head[line_start..]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect()
}

fn indent_unit(base: &str) -> String {
    if base.is_empty() {
        "  ".to_string()
    } else if base.starts_with('\t') {
        "\t".to_string()
    } else {
        base.to_string()
    }
}

fn render_section(deps: &[NewDependency], base: &str, unit: &str) -> String {
    let dep_indent = format!("{base}{unit}");
    let field_indent = format!("{dep_indent}{unit}");
    let excl_indent = format!("{field_indent}{unit}");
    let excl_field_indent = format!("{excl_indent}{unit}");

    let mut out = String::from("<dependencies>\n");
    for dep in deps {
        out.push_str(&format!("{dep_indent}<dependency>\n"));
        push_leaf(&mut out, &field_indent, "groupId", &dep.group_id);
        push_leaf(&mut out, &field_indent, "artifactId", &dep.artifact_id);
        push_leaf(&mut out, &field_indent, "version", &dep.version);
        if let Some(classifier) = dep.classifier.as_deref() {
            push_leaf(&mut out, &field_indent, "classifier", classifier);
        }
        if let Some(scope) = dep.scope.as_deref() {
            push_leaf(&mut out, &field_indent, "scope", scope);
        }
        if let Some(path) = dep.system_path.as_deref() {
            push_leaf(&mut out, &field_indent, "systemPath", path);
        }
        if !dep.exclusions.is_empty() {
            out.push_str(&format!("{field_indent}<exclusions>\n"));
            for (group, artifact) in &dep.exclusions {
                out.push_str(&format!("{excl_indent}<exclusion>\n"));
                push_leaf(&mut out, &excl_field_indent, "groupId", group);
                push_leaf(&mut out, &excl_field_indent, "artifactId", artifact);
                out.push_str(&format!("{excl_indent}</exclusion>\n"));
            }
            out.push_str(&format!("{field_indent}</exclusions>\n"));
        }
        out.push_str(&format!("{dep_indent}</dependency>\n"));
    }
    out.push_str(base);
    out.push_str("</dependencies>");
    out
}

fn push_leaf(out: &mut String, indent: &str, tag: &str, value: &str) {
    out.push_str(&format!("{indent}<{tag}>{}</{tag}>\n", escape(value)));
}
