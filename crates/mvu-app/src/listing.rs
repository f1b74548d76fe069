//! Text renderings of reactor queries. Every function returns the text; nothing is printed here.

use mvu_domain::analysis::{
    DependencyFilter, dependants_listing, filter_dependencies, multi_version_dependencies,
};
use mvu_domain::index::index_dependents;
use mvu_domain::mismatch::MismatchReport;
use mvu_repo::Reactor;
use mvu_types::DisplayOptions;
use tracing::{error, info};

pub fn render_artifacts(reactor: &Reactor, display: DisplayOptions) -> String {
    let mut out = String::from("Local artifacts:\n");
    for project in &reactor.projects {
        let local = &project.local;
        if display.verbose {
            out.push_str(&format!("  - {local} @ {}\n", local.location));
        } else {
            out.push_str(&format!("  - {local}\n"));
        }
    }
    out
}

/// Dependencies grouped by key, after `filter`.
pub fn render_dependencies(
    reactor: &Reactor,
    filter: &DependencyFilter,
    display: DisplayOptions,
) -> String {
    let found = filter_dependencies(&reactor.dependencies, &reactor.index, filter);
    let count: usize = found.iter().map(|(_, deps)| deps.len()).sum();
    let mut out = format!("Found {count} dependencies:\n");
    for (key, deps) in found {
        out.push_str(&format!("  {key}\n"));
        for dep in deps {
            out.push_str(&format!("   - {}\n", dep.display(display)));
        }
    }
    out
}

/// Every dependency key with the projects depending on it; local keys last and marked `LOCAL`.
pub fn render_dependants(reactor: &Reactor, display: DisplayOptions) -> String {
    let listing = dependants_listing(&index_dependents(&reactor.dependencies), &reactor.index);
    let mut out = format!("Found {} dependencies:\n", listing.len());
    for entry in listing {
        let marker = if entry.local { "LOCAL " } else { "" };
        out.push_str(&format!("  {marker}{}\n", entry.key));
        for dependant in &entry.dependants {
            if display.verbose {
                out.push_str(&format!("   - {dependant} @ {}\n", dependant.location));
            } else {
                out.push_str(&format!("   - {dependant}\n"));
            }
        }
    }
    out
}

/// Local artifacts whose key contains (or, with `exact`, equals) each pattern.
pub fn search_artifacts(reactor: &Reactor, patterns: &[String], exact: bool) -> String {
    let mut out = String::new();
    for pattern in patterns {
        info!("Searching artifact: {pattern}");
        let found = reactor.index.search(pattern, exact);
        if found.is_empty() {
            error!("Could not find artifact: {pattern}");
            continue;
        }
        for local in found {
            info!("Found: {local} at {}", local.location);
            out.push_str(&format!("{local} @ {}\n", local.location));
        }
    }
    out
}

pub fn render_multi_version(reactor: &Reactor, display: DisplayOptions) -> String {
    let found = multi_version_dependencies(&reactor.dependencies);
    let mut out = format!(
        "Found {} dependencies with more than one version:\n",
        found.len()
    );
    for entry in found {
        out.push_str(&format!("  {}\n", entry.key));
        for (version, owners) in &entry.versions {
            let names: Vec<String> = owners
                .iter()
                .map(|o| {
                    if display.verbose {
                        format!("{o} @ {}", o.location)
                    } else {
                        o.to_string()
                    }
                })
                .collect();
            out.push_str(&format!("   - {version}: {}\n", names.join(", ")));
        }
    }
    out
}

/// Mismatches grouped by key and required version.
pub fn render_mismatches(report: &MismatchReport, display: DisplayOptions) -> String {
    if report.mismatches.is_empty() {
        return "No local version mismatches found.\n".to_string();
    }
    let mut out = String::new();
    let mut current: Option<(&mvu_types::ArtifactKey, &str)> = None;
    for m in &report.mismatches {
        let group = (&m.artifact_key, m.dependency.artifact.version());
        if current != Some(group) {
            out.push_str(&format!(
                "Mismatch detected for: {}\n  Required is: {}\n  Local available is: {}\n  Dependencies:\n",
                m.artifact_key, m.dependency.artifact, m.local
            ));
            current = Some(group);
        }
        out.push_str(&format!("   - {}\n", m.dependency.display(display)));
    }
    out
}

pub fn serialize_mismatches(report: &MismatchReport) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvu_repo::{ReactorOptions, load_reactor};
    use mvu_test_util::{DepFixture, PomFixture, ReactorFixture, acme_reactor};

    fn load(fixture: &ReactorFixture) -> Reactor {
        load_reactor(&[fixture.root().to_path_buf()], &ReactorOptions::default()).expect("load")
    }

    fn wide_reactor() -> ReactorFixture {
        let fixture = ReactorFixture::new();
        fixture.write_pom(
            "",
            &PomFixture::new("com.acme", "root", "1.0")
                .packaging("pom")
                .module("core")
                .module("app")
                .module("web"),
        );
        fixture.write_pom("core", &PomFixture::new("com.acme", "core", "1.0"));
        fixture.write_pom(
            "app",
            &PomFixture::new("com.acme", "app", "1.0")
                .dep("com.acme", "core", "1.0")
                .dependency(
                    DepFixture::new("com.sun", "tools", "1.8")
                        .scope("system")
                        .system_path("/opt/tools.jar"),
                ),
        );
        fixture.write_pom(
            "web",
            &PomFixture::new("com.acme", "web", "1.0")
                .dep("com.acme", "core", "0.9")
                .dep("org.lib", "lib", "2"),
        );
        fixture
    }

    #[test]
    fn artifacts_listing() {
        let fixture = acme_reactor();
        let reactor = load(&fixture);
        assert_eq!(
            render_artifacts(&reactor, DisplayOptions::default()),
            "Local artifacts:\n  - com.acme:root:1.0\n  - com.acme:core:1.0\n  - com.acme:app:1.0\n"
        );
        let verbose = render_artifacts(&reactor, DisplayOptions::verbose());
        assert!(verbose.contains(&format!("com.acme:core:1.0 @ {}", fixture.path("core/pom.xml"))));
    }

    #[test]
    fn dependency_listing_with_filters() {
        let fixture = wide_reactor();
        let reactor = load(&fixture);

        let system = DependencyFilter {
            system: Some(true),
            ..Default::default()
        };
        assert_eq!(
            render_dependencies(&reactor, &system, DisplayOptions::default()),
            "Found 1 dependencies:\n  com.sun:tools\n   - com.sun:tools:1.8(scope=system,system=/opt/tools.jar) (required by com.acme:app:1.0)\n"
        );

        let local = DependencyFilter {
            pattern: Some("core".into()),
            local: Some(true),
            ..Default::default()
        };
        let text = render_dependencies(&reactor, &local, DisplayOptions::default());
        assert!(text.starts_with("Found 2 dependencies:\n  com.acme:core\n"));
    }

    #[test]
    fn dependants_listing_marks_local_keys() {
        let fixture = wide_reactor();
        let reactor = load(&fixture);
        let text = render_dependants(&reactor, DisplayOptions::default());
        assert_eq!(
            text,
            "Found 3 dependencies:\n  com.sun:tools\n   - com.acme:app:1.0\n  org.lib:lib\n   - com.acme:web:1.0\n  LOCAL com.acme:core\n   - com.acme:app:1.0\n   - com.acme:web:1.0\n"
        );
    }

    #[test]
    fn artifact_search() {
        let fixture = wide_reactor();
        let reactor = load(&fixture);
        let text = search_artifacts(&reactor, &["app".into(), "nothing".into()], false);
        assert_eq!(text, format!("com.acme:app:1.0 @ {}\n", fixture.path("app/pom.xml")));
        assert!(search_artifacts(&reactor, &["app".into()], true).is_empty());
    }

    #[test]
    fn multi_version_listing() {
        let fixture = wide_reactor();
        let reactor = load(&fixture);
        assert_eq!(
            render_multi_version(&reactor, DisplayOptions::default()),
            "Found 1 dependencies with more than one version:\n  com.acme:core\n   - 0.9: com.acme:web:1.0\n   - 1.0: com.acme:app:1.0\n"
        );
    }

    #[test]
    fn mismatch_report_text_and_json() {
        let fixture = wide_reactor();
        let reactor = load(&fixture);
        let report = crate::detect_mismatches(&reactor, &[]);
        assert_eq!(
            render_mismatches(&report, DisplayOptions::default()),
            "Mismatch detected for: com.acme:core\n  Required is: com.acme:core:0.9\n  Local available is: com.acme:core:1.0\n  Dependencies:\n   - com.acme:core:0.9 (required by com.acme:web:1.0)\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&serialize_mismatches(&report).expect("json")).expect("parse");
        assert_eq!(json["mismatches"][0]["artifact_key"], "com.acme:core");
        assert_eq!(json["mismatches"][0]["local"]["artifact"]["version"], "1.0");
        assert_eq!(json["unmatched_selected"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn no_mismatch_message() {
        assert_eq!(
            render_mismatches(&MismatchReport::default(), DisplayOptions::default()),
            "No local version mismatches found.\n"
        );
    }
}
