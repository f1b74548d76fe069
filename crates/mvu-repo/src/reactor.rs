use camino::{Utf8Path, Utf8PathBuf};
use mvu_domain::extract::{extract_dependencies, group_by_key, merge_into};
use mvu_domain::index::{ArtifactIndex, index_artifacts};
use mvu_domain::model::{DependencyMap, LocalArtifact, ProfileSelection};
use mvu_domain::protect::ProtectRules;
use mvu_types::ArtifactKey;
use tracing::{debug, info};

use crate::scan::{DEFAULT_DESCRIPTOR, ScannedProject, scan};

/// How a reactor is discovered and modelled.
#[derive(Clone, Debug)]
pub struct ReactorOptions {
    pub profiles: ProfileSelection,
    pub protect: ProtectRules,
    pub descriptor_name: String,
}

impl Default for ReactorOptions {
    fn default() -> Self {
        Self {
            profiles: ProfileSelection::default(),
            protect: ProtectRules::default(),
            descriptor_name: DEFAULT_DESCRIPTOR.to_string(),
        }
    }
}

/// The scanned reactor: projects, their index, and every direct dependency.
#[derive(Clone, Debug)]
pub struct Reactor {
    pub projects: Vec<ScannedProject>,
    pub index: ArtifactIndex,
    pub dependencies: DependencyMap,
}

impl Reactor {
    pub fn locals(&self) -> Vec<LocalArtifact> {
        self.projects.iter().map(|p| p.local.clone()).collect()
    }

    /// The project matching `group:artifact` or `group:artifact:version`.
    pub fn find(&self, selector: &str) -> Option<&ScannedProject> {
        self.projects
            .iter()
            .find(|p| p.local.matches_selector(selector))
    }

    pub fn find_by_key(&self, key: &ArtifactKey) -> Option<&ScannedProject> {
        self.projects.iter().find(|p| &p.local.key() == key)
    }

    pub fn find_by_location(&self, location: &Utf8Path) -> Option<&ScannedProject> {
        self.projects.iter().find(|p| p.local.location == location)
    }
}

/// Scan `roots`, index the local artifacts and extract every direct dependency.
///
/// Fails on the first reactor consistency violation, before any dependency is extracted.
pub fn load_reactor(roots: &[Utf8PathBuf], opts: &ReactorOptions) -> anyhow::Result<Reactor> {
    let shown: Vec<&str> = roots.iter().map(|r| r.as_str()).collect();
    info!("Scanning for projects based on: {}", shown.join(", "));
    let projects = scan(roots, &opts.profiles, &opts.descriptor_name)?;

    info!("Found {} projects. Checking for duplicates...", projects.len());
    let locals: Vec<LocalArtifact> = projects.iter().map(|p| p.local.clone()).collect();
    let index = index_artifacts(&locals)?;

    let dependencies = extract_reactor(&projects, &opts.profiles, &opts.protect);
    debug!(keys = dependencies.len(), "dependency model built");

    Ok(Reactor {
        projects,
        index,
        dependencies,
    })
}

/// Direct dependencies of every project, merged by key in project order.
pub fn extract_reactor(
    projects: &[ScannedProject],
    profiles: &ProfileSelection,
    protect: &ProtectRules,
) -> DependencyMap {
    let mut map = DependencyMap::new();
    for project in projects {
        let extracted =
            extract_dependencies(&project.local, &project.document.project, profiles, protect);
        for skipped in &extracted.skipped {
            debug!("Dependency not modelled: {skipped}");
        }
        merge_into(&mut map, group_by_key(extracted.dependencies));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvu_test_util::{PomFixture, ReactorFixture, acme_reactor};

    #[test]
    fn acme_reactor_model() {
        let reactor = acme_reactor();
        let model = load_reactor(&[reactor.root().to_path_buf()], &ReactorOptions::default())
            .expect("load");
        assert_eq!(model.index.len(), 3);
        let core = ArtifactKey::new("com.acme", "core");
        let deps = &model.dependencies[&core];
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].artifact.version(), "0.9");
        assert_eq!(deps[0].project.to_string(), "com.acme:app:1.0");
        assert_eq!(
            model.find("com.acme:core").map(|p| p.local.to_string()),
            Some("com.acme:core:1.0".to_string())
        );
        assert!(model.find("com.acme:core:2.0").is_none());
    }

    #[test]
    fn configured_protection_reaches_dependencies() {
        let reactor = acme_reactor();
        let opts = ReactorOptions {
            protect: ProtectRules::new(&["com.acme:*".to_string()]).expect("globs"),
            ..ReactorOptions::default()
        };
        let model = load_reactor(&[reactor.root().to_path_buf()], &opts).expect("load");
        assert!(model.dependencies[&ArtifactKey::new("com.acme", "core")][0].is_protected());
    }

    #[test]
    fn duplicate_key_aborts_loading() {
        let reactor = ReactorFixture::new();
        reactor.write_pom("", &PomFixture::new("g", "root", "1").module("a").module("b"));
        reactor.write_pom("a", &PomFixture::new("g", "same", "1"));
        reactor.write_pom("b", &PomFixture::new("g", "same", "2"));
        let err = load_reactor(&[reactor.root().to_path_buf()], &ReactorOptions::default())
            .expect_err("duplicate");
        assert!(matches!(
            err.downcast_ref::<mvu_domain::ReactorError>(),
            Some(mvu_domain::ReactorError::DuplicateArtifactKey { .. })
        ));
    }
}
