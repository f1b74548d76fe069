//! Shared test utilities for the mvu workspace.
//!
//! The repo, app and cli crates all need small multi-module reactors on disk; this crate builds
//! descriptor text and writes it into a temporary directory.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A dependency entry for [`PomFixture`].
#[derive(Clone, Debug, Default)]
pub struct DepFixture {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    pub system_path: Option<String>,
    pub exclusions: Vec<(String, String)>,
}

impl DepFixture {
    pub fn new(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    /// A dependency whose version is managed elsewhere.
    pub fn unversioned(group: &str, artifact: &str) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            ..Self::default()
        }
    }

    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    pub fn system_path(mut self, path: &str) -> Self {
        self.system_path = Some(path.to_string());
        self
    }

    pub fn exclude(mut self, group: &str, artifact: &str) -> Self {
        self.exclusions
            .push((group.to_string(), artifact.to_string()));
        self
    }

    fn write(&self, out: &mut String, indent: &str) {
        let inner = format!("{indent}  ");
        out.push_str(&format!("{indent}<dependency>\n"));
        out.push_str(&format!("{inner}<groupId>{}</groupId>\n", self.group));
        out.push_str(&format!("{inner}<artifactId>{}</artifactId>\n", self.artifact));
        if let Some(v) = &self.version {
            out.push_str(&format!("{inner}<version>{v}</version>\n"));
        }
        if let Some(c) = &self.classifier {
            out.push_str(&format!("{inner}<classifier>{c}</classifier>\n"));
        }
        if let Some(s) = &self.scope {
            out.push_str(&format!("{inner}<scope>{s}</scope>\n"));
        }
        if let Some(p) = &self.system_path {
            out.push_str(&format!("{inner}<systemPath>{p}</systemPath>\n"));
        }
        if !self.exclusions.is_empty() {
            out.push_str(&format!("{inner}<exclusions>\n"));
            for (g, a) in &self.exclusions {
                out.push_str(&format!(
                    "{inner}  <exclusion>\n{inner}    <groupId>{g}</groupId>\n{inner}    <artifactId>{a}</artifactId>\n{inner}  </exclusion>\n"
                ));
            }
            out.push_str(&format!("{inner}</exclusions>\n"));
        }
        out.push_str(&format!("{indent}</dependency>\n"));
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileFixture {
    pub id: String,
    pub modules: Vec<String>,
    pub dependencies: Vec<DepFixture>,
}

impl ProfileFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    /// A profile written without an `<id>`.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: &str) -> Self {
        self.modules.push(module.to_string());
        self
    }

    pub fn dependency(mut self, dep: DepFixture) -> Self {
        self.dependencies.push(dep);
        self
    }
}

/// Builder for `pom.xml` text.
#[derive(Clone, Debug, Default)]
pub struct PomFixture {
    group: Option<String>,
    artifact: String,
    version: Option<String>,
    packaging: Option<String>,
    parent: Option<(String, String, String)>,
    modules: Vec<String>,
    dependencies: Vec<DepFixture>,
    profiles: Vec<ProfileFixture>,
}

impl PomFixture {
    /// A project with its own group, artifact and version.
    pub fn new(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            group: Some(group.to_string()),
            artifact: artifact.to_string(),
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    /// A project inheriting group and version from `parent`.
    pub fn child(artifact: &str, parent: (&str, &str, &str)) -> Self {
        Self {
            artifact: artifact.to_string(),
            parent: Some((
                parent.0.to_string(),
                parent.1.to_string(),
                parent.2.to_string(),
            )),
            ..Self::default()
        }
    }

    pub fn packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    pub fn parent(mut self, group: &str, artifact: &str, version: &str) -> Self {
        self.parent = Some((group.to_string(), artifact.to_string(), version.to_string()));
        self
    }

    pub fn module(mut self, module: &str) -> Self {
        self.modules.push(module.to_string());
        self
    }

    pub fn dependency(mut self, dep: DepFixture) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn dep(self, group: &str, artifact: &str, version: &str) -> Self {
        self.dependency(DepFixture::new(group, artifact, version))
    }

    pub fn profile(mut self, profile: ProfileFixture) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <modelVersion>4.0.0</modelVersion>\n",
        );
        if let Some((g, a, v)) = &self.parent {
            out.push_str(&format!(
                "  <parent>\n    <groupId>{g}</groupId>\n    <artifactId>{a}</artifactId>\n    <version>{v}</version>\n  </parent>\n"
            ));
        }
        if let Some(g) = &self.group {
            out.push_str(&format!("  <groupId>{g}</groupId>\n"));
        }
        out.push_str(&format!("  <artifactId>{}</artifactId>\n", self.artifact));
        if let Some(v) = &self.version {
            out.push_str(&format!("  <version>{v}</version>\n"));
        }
        if let Some(p) = &self.packaging {
            out.push_str(&format!("  <packaging>{p}</packaging>\n"));
        }
        if !self.modules.is_empty() {
            out.push_str("  <modules>\n");
            for m in &self.modules {
                out.push_str(&format!("    <module>{m}</module>\n"));
            }
            out.push_str("  </modules>\n");
        }
        if !self.dependencies.is_empty() {
            out.push_str("  <dependencies>\n");
            for d in &self.dependencies {
                d.write(&mut out, "    ");
            }
            out.push_str("  </dependencies>\n");
        }
        if !self.profiles.is_empty() {
            out.push_str("  <profiles>\n");
            for p in &self.profiles {
                out.push_str("    <profile>\n");
                if !p.id.is_empty() {
                    out.push_str(&format!("      <id>{}</id>\n", p.id));
                }
                if !p.modules.is_empty() {
                    out.push_str("      <modules>\n");
                    for m in &p.modules {
                        out.push_str(&format!("        <module>{m}</module>\n"));
                    }
                    out.push_str("      </modules>\n");
                }
                if !p.dependencies.is_empty() {
                    out.push_str("      <dependencies>\n");
                    for d in &p.dependencies {
                        d.write(&mut out, "        ");
                    }
                    out.push_str("      </dependencies>\n");
                }
                out.push_str("    </profile>\n");
            }
            out.push_str("  </profiles>\n");
        }
        out.push_str("</project>\n");
        out
    }
}

/// A scratch directory holding a reactor. Removed on drop.
pub struct ReactorFixture {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl ReactorFixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        Self { _tmp: tmp, root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> Utf8PathBuf {
        self.root.join(rel)
    }

    /// Write `pom` as `<dir>/pom.xml` (`dir` relative to the root, `""` for the root itself).
    pub fn write_pom(&self, dir: &str, pom: &PomFixture) -> Utf8PathBuf {
        let path = if dir.is_empty() {
            self.root.join("pom.xml")
        } else {
            self.root.join(dir).join("pom.xml")
        };
        write_file(&path, &pom.to_xml());
        path
    }

    pub fn write(&self, rel: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(rel);
        write_file(&path, contents);
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel)).expect("read file")
    }
}

impl Default for ReactorFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write file");
}

/// The `com.acme` reactor used across test suites:
/// a root aggregator with `core` (1.0) and `app` (1.0, depending on `core` 0.9).
pub fn acme_reactor() -> ReactorFixture {
    let reactor = ReactorFixture::new();
    reactor.write_pom(
        "",
        &PomFixture::new("com.acme", "root", "1.0")
            .packaging("pom")
            .module("core")
            .module("app"),
    );
    reactor.write_pom("core", &PomFixture::new("com.acme", "core", "1.0"));
    reactor.write_pom(
        "app",
        &PomFixture::new("com.acme", "app", "1.0").dep("com.acme", "core", "0.9"),
    );
    reactor
}
