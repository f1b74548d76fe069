//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - variable expansion (no re-expansion, unknown keys untouched)
//! - the dependency list codec round trip
//! - mismatch detection against the local index

use crate::codec::{export_dependencies, import_dependencies};
use crate::expand::{VariableTable, expand};
use crate::extract::group_by_key;
use crate::index::index_artifacts;
use crate::mismatch::detect_mismatches;
use crate::model::{Dependency, LocalArtifact};
use mvu_types::{Artifact, ArtifactKey};
use proptest::prelude::*;

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,10}"
}

fn arb_version() -> impl Strategy<Value = String> {
    (0u32..20, 0u32..20, prop::bool::ANY).prop_map(|(major, minor, snapshot)| {
        if snapshot {
            format!("{major}.{minor}-SNAPSHOT")
        } else {
            format!("{major}.{minor}")
        }
    })
}

fn arb_scope() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("compile".to_string()),
        Just("test".to_string()),
        Just("provided".to_string()),
        Just("runtime".to_string()),
        Just("system".to_string()),
    ]
}

fn owner() -> LocalArtifact {
    LocalArtifact::new(
        Artifact::jar("com.acme", "owner", "1.0").expect("artifact"),
        "owner/pom.xml",
    )
}

fn arb_dependency() -> impl Strategy<Value = Dependency> {
    (
        arb_ident(),
        arb_ident(),
        arb_version(),
        arb_scope(),
        prop::option::of(arb_ident()),
        prop::collection::vec((arb_ident(), arb_ident()), 0..3),
    )
        .prop_map(|(g, a, v, scope, classifier, exclusions)| {
            let mut dep = Dependency::new(Artifact::jar(g, a, v).expect("artifact"), owner());
            if scope == "system" {
                dep.system_path = Some("/opt/lib.jar".to_string());
            }
            dep.scope = scope;
            dep.classifier = classifier;
            dep.exclusions = exclusions
                .iter()
                .map(|(g, a)| ArtifactKey::new(g, a))
                .collect();
            dep
        })
}

proptest! {
    #[test]
    fn codec_round_trip(deps in prop::collection::vec(arb_dependency(), 0..8)) {
        let text = export_dependencies(&owner(), &deps);
        let imported = import_dependencies(&text, &owner());
        prop_assert!(imported.warnings.is_empty());
        prop_assert_eq!(imported.dependencies, deps);
    }

    #[test]
    fn import_never_panics(input in ".{0,200}") {
        let _ = import_dependencies(&input, &owner());
    }

    #[test]
    fn expand_without_placeholders_is_identity(raw in "[^$]{0,40}") {
        let table = VariableTable::for_project(
            &Artifact::jar("g", "a", "1").expect("artifact"),
            None,
        );
        prop_assert_eq!(expand(&raw, &table), raw);
    }

    #[test]
    fn unknown_keys_are_left_untouched(key in "[a-z]{1,8}\\.unknown") {
        let raw = format!("x-${{{key}}}-y");
        prop_assert_eq!(expand(&raw, &VariableTable::new()), raw);
    }

    #[test]
    fn mismatches_only_for_differing_versions(
        local_version in arb_version(),
        declared in prop::collection::vec(arb_version(), 1..6),
    ) {
        let local = LocalArtifact::new(
            Artifact::jar("com.acme", "core", local_version.clone()).expect("artifact"),
            "core/pom.xml",
        );
        let index = index_artifacts(&[local, owner()]).expect("index");
        let deps = group_by_key(declared.iter().map(|v| {
            let artifact = Artifact::jar("com.acme", "core", v.clone()).expect("artifact");
            Dependency::new(artifact, owner())
        }));
        let report = detect_mismatches(&index, &deps, &[]);
        let expected = declared.iter().filter(|v| **v != local_version).count();
        prop_assert_eq!(report.mismatches.len(), expected);
    }
}
