//! Small constructors shared by the unit tests of this crate.

use crate::model::{Dependency, LocalArtifact};
use mvu_types::Artifact;

pub fn art(triple: &str) -> Artifact {
    Artifact::parse_triple(triple).expect("valid triple")
}

pub fn local(triple: &str, location: &str) -> LocalArtifact {
    LocalArtifact::new(art(triple), location)
}

pub fn dep(triple: &str, owner: &LocalArtifact) -> Dependency {
    Dependency::new(art(triple), owner.clone())
}
