//! Turn descriptor dependency entries into expanded [`Dependency`] records.

use crate::expand::{VariableTable, expand, has_placeholder};
use crate::identity::parent_artifact;
use crate::model::{
    CoordField, DEFAULT_SCOPE, Dependency, DependencyMap, LocalArtifact, ProfileSelection,
    ProtectionReason,
};
use crate::protect::ProtectRules;
use mvu_pom::{DependencyEntry, ProjectModel};
use mvu_types::{Artifact, ArtifactKey};

/// Direct dependencies of one project, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Extracted {
    pub dependencies: Vec<Dependency>,
    /// Entries that could not be modelled (e.g. a version managed elsewhere), described for logs.
    pub skipped: Vec<String>,
}

/// Extract the unconditional dependencies followed by those of every active profile.
pub fn extract_dependencies(
    project: &LocalArtifact,
    descriptor: &ProjectModel,
    profiles: &ProfileSelection,
    protect: &ProtectRules,
) -> Extracted {
    let table = VariableTable::for_project(&project.artifact, parent_artifact(descriptor).as_ref());
    let mut out = Extracted::default();

    for entry in &descriptor.dependencies {
        push_entry(&mut out, entry, None, project, &table, protect);
    }
    for profile in &descriptor.profiles {
        if !profiles.is_active(profile.id.as_deref()) {
            continue;
        }
        let first = out.dependencies.len();
        for entry in &profile.dependencies {
            push_entry(&mut out, entry, profile.id.as_deref(), project, &table, protect);
        }
        if profile.id.is_none() {
            for dep in &mut out.dependencies[first..] {
                dep.protection.push(ProtectionReason::UnnamedProfile);
            }
        }
    }
    out
}

/// [`extract_dependencies`] keyed by the required artifact's `group:artifact`.
pub fn extract_direct(
    project: &LocalArtifact,
    descriptor: &ProjectModel,
    profiles: &ProfileSelection,
    protect: &ProtectRules,
) -> DependencyMap {
    group_by_key(extract_dependencies(project, descriptor, profiles, protect).dependencies)
}

/// Group dependencies by key, keeping encounter order within a key.
pub fn group_by_key(deps: impl IntoIterator<Item = Dependency>) -> DependencyMap {
    let mut map = DependencyMap::new();
    for dep in deps {
        map.entry(dep.key()).or_default().push(dep);
    }
    map
}

/// Merge per-project maps by appending.
pub fn merge_into(target: &mut DependencyMap, other: DependencyMap) {
    for (key, deps) in other {
        target.entry(key).or_default().extend(deps);
    }
}

fn push_entry(
    out: &mut Extracted,
    entry: &DependencyEntry,
    profile: Option<&str>,
    project: &LocalArtifact,
    table: &VariableTable,
    protect: &ProtectRules,
) {
    let (Some(group), Some(artifact), Some(version)) =
        (entry.group_id(), entry.artifact_id(), entry.version())
    else {
        out.skipped.push(format!(
            "{}:{}:{} in {} (incomplete coordinates)",
            entry.group_id().unwrap_or("?"),
            entry.artifact_id().unwrap_or("?"),
            entry.version().unwrap_or("?"),
            project.location
        ));
        return;
    };

    let mut protection = Vec::new();
    let mut expanded = Vec::with_capacity(3);
    for (field, raw) in [
        (CoordField::GroupId, group),
        (CoordField::ArtifactId, artifact),
        (CoordField::Version, version),
    ] {
        let value = expand(raw.trim(), table);
        if has_placeholder(&value) {
            protection.push(ProtectionReason::UnresolvedVariable {
                field,
                raw: raw.to_string(),
            });
        }
        expanded.push(value);
    }

    let required = match Artifact::jar(&expanded[0], &expanded[1], &expanded[2]) {
        Ok(a) => a,
        Err(e) => {
            out.skipped
                .push(format!("{} in {}: {e}", expanded.join(":"), project.location));
            return;
        }
    };

    if let Some(pattern) = protect.matching(&required.key()) {
        protection.push(ProtectionReason::Configured {
            pattern: pattern.to_string(),
        });
    }

    let exclusions = entry
        .exclusions
        .iter()
        .filter_map(|e| match (e.group_id.as_deref(), e.artifact_id.as_deref()) {
            (Some(g), Some(a)) => Some(ArtifactKey::new(g.trim(), a.trim())),
            _ => None,
        })
        .collect();

    out.dependencies.push(Dependency {
        artifact: required,
        project: project.clone(),
        profile: profile.map(str::to_string),
        scope: entry.scope().unwrap_or(DEFAULT_SCOPE).to_string(),
        classifier: entry.classifier().map(str::to_string),
        system_path: entry.system_path().map(str::to_string),
        exclusions,
        protection,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::local;
    use mvu_pom::parse_pom;

    const POM: &str = r#"<project>
  <groupId>com.acme</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <dependencies>
    <dependency>
      <groupId>com.acme</groupId>
      <artifactId>core</artifactId>
      <version>${project.version}</version>
      <exclusions>
        <exclusion><groupId>log</groupId><artifactId>noisy</artifactId></exclusion>
      </exclusions>
    </dependency>
    <dependency>
      <groupId>org.lib</groupId>
      <artifactId>lib</artifactId>
      <version>${lib.version}</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.managed</groupId>
      <artifactId>nover</artifactId>
    </dependency>
  </dependencies>
  <profiles>
    <profile>
      <id>extra</id>
      <dependencies>
        <dependency>
          <groupId>com.acme</groupId>
          <artifactId>core</artifactId>
          <version>0.9</version>
        </dependency>
      </dependencies>
    </profile>
    <profile>
      <id>other</id>
      <dependencies>
        <dependency>
          <groupId>com.acme</groupId>
          <artifactId>other</artifactId>
          <version>1</version>
        </dependency>
      </dependencies>
    </profile>
  </profiles>
</project>
"#;

    fn owner() -> LocalArtifact {
        local("com.acme:app:1.0", "app/pom.xml")
    }

    fn extract(profiles: &ProfileSelection, protect: &ProtectRules) -> Extracted {
        let doc = parse_pom(POM).expect("parse");
        extract_dependencies(&owner(), &doc.project, profiles, protect)
    }

    #[test]
    fn expands_and_defaults() {
        let out = extract(&ProfileSelection::default(), &ProtectRules::default());
        assert_eq!(out.dependencies.len(), 2);
        let core = &out.dependencies[0];
        assert_eq!(core.artifact.to_string(), "com.acme:core:1.0");
        assert_eq!(core.scope, "compile");
        assert_eq!(core.profile, None);
        assert!(!core.is_protected());
        assert_eq!(core.exclusions, vec![ArtifactKey::new("log", "noisy")]);
        assert_eq!(out.dependencies[1].scope, "test");
    }

    #[test]
    fn unresolved_variable_protects() {
        let out = extract(&ProfileSelection::default(), &ProtectRules::default());
        let lib = &out.dependencies[1];
        assert_eq!(lib.artifact.version(), "${lib.version}");
        assert_eq!(
            lib.change_protection().as_deref(),
            Some("Variable used in version (${lib.version})")
        );
    }

    #[test]
    fn entries_without_version_are_skipped() {
        let out = extract(&ProfileSelection::default(), &ProtectRules::default());
        assert_eq!(out.skipped.len(), 1);
        assert!(out.skipped[0].contains("org.managed:nover"));
    }

    #[test]
    fn active_profile_dependencies_are_appended() {
        let out = extract(
            &ProfileSelection::from_names(["extra"]),
            &ProtectRules::default(),
        );
        assert_eq!(out.dependencies.len(), 3);
        let last = &out.dependencies[2];
        assert_eq!(last.artifact.to_string(), "com.acme:core:0.9");
        assert_eq!(last.profile.as_deref(), Some("extra"));

        let map = group_by_key(out.dependencies);
        let core = &map[&ArtifactKey::new("com.acme", "core")];
        assert_eq!(core.len(), 2);
        assert_eq!(core[0].artifact.version(), "1.0");
        assert_eq!(core[1].artifact.version(), "0.9");
    }

    #[test]
    fn all_profiles_selection() {
        let map = extract_direct(
            &owner(),
            &parse_pom(POM).expect("parse").project,
            &ProfileSelection::all(),
            &ProtectRules::default(),
        );
        assert!(map.contains_key(&ArtifactKey::new("com.acme", "other")));
    }

    #[test]
    fn configured_patterns_protect() {
        let rules = ProtectRules::new(&["com.acme:*".into()]).expect("globs");
        let out = extract(&ProfileSelection::default(), &rules);
        assert_eq!(
            out.dependencies[0].change_protection().as_deref(),
            Some("Protected by configured pattern (com.acme:*)")
        );
        assert!(!out.dependencies[1].change_protection().unwrap_or_default().contains("pattern"));
    }

    #[test]
    fn unnamed_profile_dependencies_are_protected() {
        let src = r#"<project>
  <groupId>com.acme</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <profiles>
    <profile>
      <dependencies>
        <dependency>
          <groupId>com.acme</groupId>
          <artifactId>core</artifactId>
          <version>0.9</version>
        </dependency>
      </dependencies>
    </profile>
  </profiles>
</project>
"#;
        let doc = parse_pom(src).expect("parse");
        let out = extract_dependencies(
            &owner(),
            &doc.project,
            &ProfileSelection::all(),
            &ProtectRules::default(),
        );
        assert_eq!(out.dependencies.len(), 1);
        assert_eq!(out.dependencies[0].profile, None);
        assert_eq!(
            out.dependencies[0].change_protection().as_deref(),
            Some("Declared in a profile without an id")
        );
    }

    #[test]
    fn merge_appends_per_key() {
        let a = owner();
        let b = local("com.acme:web:1.0", "web/pom.xml");
        let mut map = group_by_key([crate::test_support::dep("x:y:1", &a)]);
        merge_into(&mut map, group_by_key([crate::test_support::dep("x:y:2", &b)]));
        let deps = &map[&ArtifactKey::new("x", "y")];
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].project, b);
    }
}
