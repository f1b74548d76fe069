use camino::Utf8PathBuf;
use mvu_domain::model::ProfileSelection;
use mvu_repo::{ReactorOptions, load_reactor};
use mvu_test_util::{DepFixture, PomFixture, ProfileFixture, ReactorFixture};
use mvu_types::ArtifactKey;

fn roots(reactor: &ReactorFixture) -> Vec<Utf8PathBuf> {
    vec![reactor.root().to_path_buf()]
}

fn inherited_reactor() -> ReactorFixture {
    let reactor = ReactorFixture::new();
    reactor.write_pom(
        "",
        &PomFixture::new("org.demo", "parent", "3.1")
            .packaging("pom")
            .module("lib")
            .module("svc"),
    );
    reactor.write_pom("lib", &PomFixture::child("lib", ("org.demo", "parent", "3.1")));
    reactor.write_pom(
        "svc",
        &PomFixture::child("svc", ("org.demo", "parent", "3.1"))
            .dependency(DepFixture::new("${project.groupId}", "lib", "${project.version}"))
            .dependency(DepFixture::new("org.external", "util", "${util.version}").scope("test"))
            .dependency(DepFixture::unversioned("org.managed", "bom-driven"))
            .profile(
                ProfileFixture::new("legacy")
                    .dependency(DepFixture::new("org.demo", "lib", "2.0")),
            ),
    );
    reactor
}

#[test]
fn inherited_coordinates_and_expanded_dependencies() {
    let reactor = inherited_reactor();
    let model = load_reactor(&roots(&reactor), &ReactorOptions::default()).expect("load");

    let names: Vec<String> = model.locals().iter().map(|l| l.to_string()).collect();
    assert_eq!(names, vec!["org.demo:parent:3.1", "org.demo:lib:3.1", "org.demo:svc:3.1"]);

    let lib = &model.dependencies[&ArtifactKey::new("org.demo", "lib")];
    assert_eq!(lib.len(), 1);
    assert_eq!(lib[0].artifact.version(), "3.1");
    assert!(!lib[0].is_protected());

    let util = &model.dependencies[&ArtifactKey::new("org.external", "util")];
    assert_eq!(util[0].scope, "test");
    assert!(util[0].is_protected());

    assert!(!model
        .dependencies
        .contains_key(&ArtifactKey::new("org.managed", "bom-driven")));
}

#[test]
fn active_profile_dependencies_are_appended() {
    let reactor = inherited_reactor();
    let opts = ReactorOptions {
        profiles: ProfileSelection::from_names(["legacy"]),
        ..ReactorOptions::default()
    };
    let model = load_reactor(&roots(&reactor), &opts).expect("load");
    let lib = &model.dependencies[&ArtifactKey::new("org.demo", "lib")];
    assert_eq!(lib.len(), 2);
    assert_eq!(lib[0].profile, None);
    assert_eq!(lib[1].profile.as_deref(), Some("legacy"));
    assert_eq!(lib[1].artifact.version(), "2.0");
}

#[test]
fn several_roots_are_combined() {
    let first = ReactorFixture::new();
    first.write_pom("", &PomFixture::new("g", "one", "1"));
    let second = ReactorFixture::new();
    second.write_pom("", &PomFixture::new("g", "two", "1").dep("g", "one", "0"));

    let model = load_reactor(
        &[first.root().to_path_buf(), second.root().to_path_buf()],
        &ReactorOptions::default(),
    )
    .expect("load");
    assert_eq!(model.index.len(), 2);
    assert!(model.find_by_key(&ArtifactKey::new("g", "two")).is_some());
    let location = second.path("pom.xml");
    assert_eq!(
        model.find_by_location(&location).map(|p| p.local.to_string()),
        Some("g:two:1".to_string())
    );
}
