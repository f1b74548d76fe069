use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use mvu_domain::ReactorError;
use mvu_domain::identity::resolve_identity;
use mvu_domain::model::{LocalArtifact, ProfileSelection};
use mvu_pom::PomDocument;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::read_descriptor;

/// Descriptor file name looked up in every project directory.
pub const DEFAULT_DESCRIPTOR: &str = "pom.xml";

/// A discovered project and the descriptor it was read from.
#[derive(Clone, Debug)]
pub struct ScannedProject {
    pub local: LocalArtifact,
    pub document: PomDocument,
}

/// Discover every project reachable from `roots` through module references.
///
/// Projects are returned in discovery order: a project first, then its declared modules, then the
/// modules of its active profiles. A root without a descriptor is skipped silently.
pub fn scan(
    roots: &[Utf8PathBuf],
    profiles: &ProfileSelection,
    descriptor_name: &str,
) -> anyhow::Result<Vec<ScannedProject>> {
    let mut scanner = Scanner {
        profiles,
        descriptor_name,
        visited: BTreeSet::new(),
        chain: Vec::new(),
        out: Vec::new(),
    };
    for root in roots {
        scanner.visit(root, true)?;
    }
    Ok(scanner.out)
}

struct Scanner<'a> {
    profiles: &'a ProfileSelection,
    descriptor_name: &'a str,
    /// Canonical directories of every project scanned so far.
    visited: BTreeSet<Utf8PathBuf>,
    /// Canonical directories of the module chain being walked.
    chain: Vec<Utf8PathBuf>,
    out: Vec<ScannedProject>,
}

impl Scanner<'_> {
    fn visit(&mut self, dir: &Utf8Path, root: bool) -> anyhow::Result<()> {
        let descriptor = dir.join(self.descriptor_name);
        if !descriptor.is_file() {
            if !root {
                warn!(module = %dir, "module without {}; skipped", self.descriptor_name);
            }
            return Ok(());
        }

        let canonical = dir
            .canonicalize_utf8()
            .with_context(|| format!("resolve {dir}"))?;
        if self.chain.contains(&canonical) {
            return Err(ReactorError::ModuleCycle {
                path: canonical,
                chain: self.chain.clone(),
            }
            .into());
        }
        if !self.visited.insert(canonical.clone()) {
            return Err(ReactorError::DuplicateModule { path: canonical }.into());
        }

        let document = read_descriptor(&descriptor)?;
        let artifact = resolve_identity(&document.project)
            .with_context(|| format!("resolve project coordinates of {descriptor}"))?;
        debug!(project = %artifact, location = %descriptor, "found project");

        let project = &document.project;
        let modules: Vec<String> = project
            .modules
            .iter()
            .chain(
                project
                    .profiles
                    .iter()
                    .filter(|p| self.profiles.is_active(p.id.as_deref()))
                    .flat_map(|p| p.modules.iter()),
            )
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        self.out.push(ScannedProject {
            local: LocalArtifact::new(artifact, descriptor),
            document,
        });

        self.chain.push(canonical);
        for module in modules {
            self.visit(&dir.join(module), false)?;
        }
        self.chain.pop();
        Ok(())
    }
}
