use crate::model::{
    DependencyEntry, ExclusionEntry, ParentRef, ProfileModel, ProjectModel, TextField,
};
use anyhow::bail;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    GroupId,
    ArtifactId,
    Version,
    Packaging,
    Classifier,
    Scope,
    SystemPath,
}

/// Where a leaf value lands in the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Project(Field),
    Parent(Field),
    Module,
    ProfileId,
    ProfileModule,
    Dependency(Field),
    Exclusion(Field),
}

struct Leaf {
    slot: Slot,
    depth: usize,
    /// Bytes covered by the non-blank text and CDATA events of the leaf.
    content: Option<Range<usize>>,
    text: String,
}

impl Leaf {
    fn extend(&mut self, src: &str, span: Range<usize>) {
        if src.get(span.clone()).is_none_or(|raw| raw.trim().is_empty()) {
            return;
        }
        self.content = Some(match self.content.take() {
            Some(c) => c.start..span.end,
            None => span,
        });
    }
}

#[derive(Default)]
struct Builder {
    project: ProjectModel,
    parent: Option<ParentRef>,
    profile: Option<ProfileModel>,
    dependency: Option<DependencyEntry>,
    exclusion: Option<ExclusionEntry>,
    section_start: Option<usize>,
}

pub(crate) fn parse_project(src: &str) -> anyhow::Result<ProjectModel> {
    let mut reader = Reader::from_str(src);
    let mut path: Vec<String> = Vec::new();
    let mut b = Builder::default();
    let mut leaf: Option<Leaf> = None;
    let mut seen_root = false;
    let mut closed = false;

    loop {
        let before = reader.buffer_position();
        let event = reader.read_event().map_err(|e| {
            anyhow::anyhow!("malformed XML near byte {}: {e}", reader.buffer_position())
        })?;
        let pos = reader.buffer_position();

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if path.is_empty() {
                    if closed {
                        bail!("unexpected element <{name}> after </project>");
                    }
                    if name != "project" {
                        bail!("root element is <{name}>, expected <project>");
                    }
                    seen_root = true;
                }
                path.push(name);
                b.open(&as_strs(&path), src, pos);
                if leaf.is_none()
                    && let Some(slot) = classify(&as_strs(&path))
                {
                    leaf = Some(Leaf {
                        slot,
                        depth: path.len(),
                        content: None,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if path.is_empty() {
                    bail!("root element <{name}/> has no content, expected <project>");
                }
                // Empty leaves such as `<version/>` are treated as absent.
                if path.len() == 1 && name == "dependencies" {
                    let start = element_start(src, pos);
                    b.project
                        .layout
                        .dependencies_section
                        .get_or_insert(start..pos);
                }
            }
            Event::Text(t) => {
                if let Some(l) = leaf.as_mut() {
                    let span = before..before + t.len();
                    let text = t
                        .unescape()
                        .map_err(|e| anyhow::anyhow!("invalid text near byte {pos}: {e}"))?;
                    l.text.push_str(&text);
                    l.extend(src, span);
                }
            }
            Event::CData(c) => {
                if let Some(l) = leaf.as_mut() {
                    l.text.push_str(&String::from_utf8_lossy(&c));
                    // `<![CDATA[` and `]]>` around the content.
                    l.extend(src, pos.saturating_sub(c.len() + 12)..pos);
                }
            }
            Event::End(_) => {
                if leaf.as_ref().is_some_and(|l| l.depth == path.len())
                    && let Some(l) = leaf.take()
                {
                    if let Some(field) = text_field(src, l.content, &l.text) {
                        b.assign(l.slot, field, pos);
                    }
                }
                b.close(&as_strs(&path), src, pos);
                if path.len() == 1 {
                    closed = true;
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        bail!("no <project> element found");
    }
    if !closed {
        bail!("unterminated <project> element");
    }
    Ok(b.project)
}

impl Builder {
    fn open(&mut self, path: &[&str], src: &str, pos: usize) {
        match path {
            ["project", "parent"] => self.parent = Some(ParentRef::default()),
            ["project", "profiles", "profile"] => self.profile = Some(ProfileModel::default()),
            ["project", "dependencies"] => self.section_start = Some(element_start(src, pos)),
            p if is_dependency(p) => self.dependency = Some(DependencyEntry::default()),
            p if is_exclusion(p) => self.exclusion = Some(ExclusionEntry::default()),
            _ => {}
        }
    }

    fn close(&mut self, path: &[&str], src: &str, pos: usize) {
        match path {
            ["project"] => {
                self.project.layout.project_close = src[..pos].rfind("</").unwrap_or(pos);
            }
            ["project", "parent"] => {
                if let Some(parent) = self.parent.take() {
                    self.project.parent = Some(parent);
                }
            }
            ["project", "profiles", "profile"] => {
                if let Some(profile) = self.profile.take() {
                    self.project.profiles.push(profile);
                }
            }
            ["project", "dependencies"] => {
                if let Some(start) = self.section_start.take() {
                    self.project
                        .layout
                        .dependencies_section
                        .get_or_insert(start..pos);
                }
            }
            p if is_dependency(p) => {
                if let Some(dep) = self.dependency.take() {
                    match (p.len(), self.profile.as_mut()) {
                        (3, _) => self.project.dependencies.push(dep),
                        (_, Some(profile)) => profile.dependencies.push(dep),
                        (_, None) => {}
                    }
                }
            }
            p if is_exclusion(p) => {
                if let (Some(excl), Some(dep)) = (self.exclusion.take(), self.dependency.as_mut())
                {
                    dep.exclusions.push(excl);
                }
            }
            _ => {}
        }
    }

    fn assign(&mut self, slot: Slot, field: TextField, pos: usize) {
        match slot {
            Slot::Project(f) => {
                let p = &mut self.project;
                match f {
                    Field::GroupId => p.group_id = Some(field),
                    Field::ArtifactId => {
                        p.artifact_id = Some(field);
                        p.layout.artifact_id_end = Some(pos);
                    }
                    Field::Version => p.version = Some(field),
                    Field::Packaging => p.packaging = Some(field),
                    _ => {}
                }
            }
            Slot::Parent(f) => {
                if let Some(parent) = self.parent.as_mut() {
                    match f {
                        Field::GroupId => parent.group_id = Some(field),
                        Field::ArtifactId => parent.artifact_id = Some(field),
                        Field::Version => parent.version = Some(field),
                        _ => {}
                    }
                }
            }
            Slot::Module => self.project.modules.push(field.value),
            Slot::ProfileId => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.id = Some(field.value);
                }
            }
            Slot::ProfileModule => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.modules.push(field.value);
                }
            }
            Slot::Dependency(f) => {
                if let Some(dep) = self.dependency.as_mut() {
                    let target = match f {
                        Field::GroupId => &mut dep.group_id,
                        Field::ArtifactId => &mut dep.artifact_id,
                        Field::Version => &mut dep.version,
                        Field::Classifier => &mut dep.classifier,
                        Field::Scope => &mut dep.scope,
                        Field::SystemPath => &mut dep.system_path,
                        Field::Packaging => return,
                    };
                    *target = Some(field);
                }
            }
            Slot::Exclusion(f) => {
                if let Some(excl) = self.exclusion.as_mut() {
                    match f {
                        Field::GroupId => excl.group_id = Some(field.value),
                        Field::ArtifactId => excl.artifact_id = Some(field.value),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn as_strs(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

fn is_dependency(path: &[&str]) -> bool {
    matches!(
        path,
        ["project", "dependencies", "dependency"]
            | ["project", "profiles", "profile", "dependencies", "dependency"]
    )
}

fn is_exclusion(path: &[&str]) -> bool {
    match path {
        [head @ .., "exclusions", "exclusion"] => is_dependency(head),
        _ => false,
    }
}

fn field_of(name: &str) -> Option<Field> {
    match name {
        "groupId" => Some(Field::GroupId),
        "artifactId" => Some(Field::ArtifactId),
        "version" => Some(Field::Version),
        "packaging" => Some(Field::Packaging),
        "classifier" => Some(Field::Classifier),
        "scope" => Some(Field::Scope),
        "systemPath" => Some(Field::SystemPath),
        _ => None,
    }
}

fn classify(path: &[&str]) -> Option<Slot> {
    match path {
        ["project", "modules", "module"] => Some(Slot::Module),
        ["project", "profiles", "profile", "id"] => Some(Slot::ProfileId),
        ["project", "profiles", "profile", "modules", "module"] => Some(Slot::ProfileModule),
        ["project", leaf] => match field_of(leaf)? {
            f @ (Field::GroupId | Field::ArtifactId | Field::Version | Field::Packaging) => {
                Some(Slot::Project(f))
            }
            _ => None,
        },
        ["project", "parent", leaf] => match field_of(leaf)? {
            f @ (Field::GroupId | Field::ArtifactId | Field::Version) => Some(Slot::Parent(f)),
            _ => None,
        },
        [head @ .., leaf] if is_dependency(head) => match field_of(leaf)? {
            Field::Packaging => None,
            f => Some(Slot::Dependency(f)),
        },
        [head @ .., leaf] if is_exclusion(head) => match field_of(leaf)? {
            f @ (Field::GroupId | Field::ArtifactId) => Some(Slot::Exclusion(f)),
            _ => None,
        },
        _ => None,
    }
}

/// Offset of the `<` that opened the element whose start tag ends at `pos`.
fn element_start(src: &str, pos: usize) -> usize {
    src[..pos].rfind('<').unwrap_or(pos)
}

/// Build a field for leaf content spanning `content`. Blank content yields `None`.
fn text_field(src: &str, content: Option<Range<usize>>, text: &str) -> Option<TextField> {
    let value = text.trim();
    let content = content?;
    if value.is_empty() {
        return None;
    }
    let raw = &src[content.clone()];
    let lead = raw.len() - raw.trim_start().len();
    let trail = raw.len() - raw.trim_end().len();
    let span = content.start + lead..content.end - trail;
    Some(TextField {
        value: value.to_string(),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.acme</groupId>
    <artifactId>parent</artifactId>
    <version>3.0</version>
  </parent>
  <artifactId>app</artifactId>
  <packaging>war</packaging>
  <modules>
    <module>web</module>
  </modules>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>managed</groupId>
        <artifactId>ignored</artifactId>
        <version>1</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>com.acme</groupId>
      <artifactId>core</artifactId>
      <version> 1.0 </version>
      <scope>test</scope>
      <exclusions>
        <exclusion>
          <groupId>log</groupId>
          <artifactId>noisy</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
  </dependencies>
  <profiles>
    <profile>
      <id>extra</id>
      <modules><module>tools</module></modules>
      <dependencies>
        <dependency>
          <groupId>com.acme</groupId>
          <artifactId>tool</artifactId>
          <version>${project.version}</version>
        </dependency>
      </dependencies>
    </profile>
  </profiles>
  <build>
    <plugins>
      <plugin>
        <artifactId>p</artifactId>
        <dependencies>
          <dependency><groupId>plugin</groupId><artifactId>dep</artifactId><version>1</version></dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>
</project>
"#;

    #[test]
    fn reads_identity_parent_and_modules() {
        let p = parse_project(POM).expect("parse");
        assert_eq!(p.group_id(), None);
        assert_eq!(p.artifact_id(), Some("app"));
        assert_eq!(p.version(), None);
        assert_eq!(p.packaging(), Some("war"));
        let parent = p.parent.as_ref().expect("parent");
        assert_eq!(parent.group_id(), Some("com.acme"));
        assert_eq!(parent.version(), Some("3.0"));
        assert_eq!(p.modules, vec!["web".to_string()]);
    }

    #[test]
    fn reads_only_project_and_profile_dependencies() {
        let p = parse_project(POM).expect("parse");
        assert_eq!(p.dependencies.len(), 1);
        let dep = &p.dependencies[0];
        assert_eq!(dep.artifact_id(), Some("core"));
        assert_eq!(dep.version(), Some("1.0"));
        assert_eq!(dep.scope(), Some("test"));
        assert_eq!(
            dep.exclusions,
            vec![ExclusionEntry {
                group_id: Some("log".into()),
                artifact_id: Some("noisy".into()),
            }]
        );

        assert_eq!(p.profiles.len(), 1);
        let profile = &p.profiles[0];
        assert_eq!(profile.id.as_deref(), Some("extra"));
        assert_eq!(profile.modules, vec!["tools".to_string()]);
        assert_eq!(profile.dependencies.len(), 1);
        assert_eq!(
            profile.dependencies[0].version(),
            Some("${project.version}")
        );
    }

    #[test]
    fn spans_cover_trimmed_content() {
        let p = parse_project(POM).expect("parse");
        let version = p.dependencies[0].version.as_ref().expect("version");
        assert_eq!(&POM[version.span.clone()], "1.0");
        let artifact = p.artifact_id.as_ref().expect("artifact");
        assert_eq!(&POM[artifact.span.clone()], "app");
    }

    #[test]
    fn layout_offsets() {
        let p = parse_project(POM).expect("parse");
        assert!(POM[p.layout.project_close..].starts_with("</project>"));
        let section = p.layout.dependencies_section.clone().expect("section");
        assert!(POM[section.clone()].starts_with("<dependencies>"));
        assert!(POM[section].ends_with("</dependencies>"));
        let end = p.layout.artifact_id_end.expect("artifact end");
        assert!(POM[..end].ends_with("<artifactId>app</artifactId>"));
    }

    #[test]
    fn entities_are_unescaped() {
        let src = "<project><artifactId>a&amp;b</artifactId></project>";
        let p = parse_project(src).expect("parse");
        assert_eq!(p.artifact_id(), Some("a&b"));
        let span = p.artifact_id.as_ref().expect("artifact").span.clone();
        assert_eq!(&src[span], "a&amp;b");
    }

    #[test]
    fn spans_exclude_comments() {
        let src = "<project><artifactId>a</artifactId>\
                   <version><!-- lead -->0.9<!-- pinned --></version></project>";
        let p = parse_project(src).expect("parse");
        let version = p.version.as_ref().expect("version");
        assert_eq!(version.value, "0.9");
        assert_eq!(&src[version.span.clone()], "0.9");
    }

    #[test]
    fn cdata_span_covers_the_section() {
        let src = "<project><artifactId><![CDATA[a]]></artifactId></project>";
        let p = parse_project(src).expect("parse");
        let artifact = p.artifact_id.as_ref().expect("artifact");
        assert_eq!(artifact.value, "a");
        assert_eq!(&src[artifact.span.clone()], "<![CDATA[a]]>");
    }

    #[test]
    fn empty_leaves_are_absent() {
        let src = "<project><artifactId>a</artifactId><version/><dependencies/></project>";
        let p = parse_project(src).expect("parse");
        assert_eq!(p.version(), None);
        let section = p.layout.dependencies_section.expect("section");
        assert_eq!(&src[section], "<dependencies/>");
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = parse_project("<settings/>").expect_err("must fail");
        assert!(err.to_string().contains("project"));
        let err = parse_project("<settings></settings>").expect_err("must fail");
        assert!(err.to_string().contains("expected <project>"));
    }

    #[test]
    fn mismatched_tags_are_rejected() {
        assert!(parse_project("<project><artifactId>a</groupId></project>").is_err());
        assert!(parse_project("").is_err());
        assert!(parse_project("<project><artifactId>a</artifactId>").is_err());
    }
}
