//! Project descriptor (`pom.xml`) support.
//!
//! This crate is IO-free: it parses descriptor text into a model that remembers where every
//! interesting value lives in the source, and edits the source text in place. Bytes that are not
//! explicitly rewritten are preserved exactly.

#![forbid(unsafe_code)]

mod edit;
mod model;
mod parse;

pub use edit::{NewDependency, PomEditor};
pub use model::{
    DependencyEntry, ExclusionEntry, Layout, ParentRef, PomDocument, ProfileModel, ProjectModel,
    TextField,
};

/// Parse descriptor text. Fails on malformed XML or when the root element is not `<project>`.
pub fn parse_pom(source: &str) -> anyhow::Result<PomDocument> {
    let project = parse::parse_project(source)?;
    Ok(PomDocument {
        source: source.to_string(),
        project,
    })
}
