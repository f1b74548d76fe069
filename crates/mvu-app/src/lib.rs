//! Use case orchestration for mvu.
//!
//! This crate provides the application layer: use cases that coordinate the settings, repo and
//! domain layers, log what they do, and rewrite descriptors on disk. Listings and reports are
//! returned as text; the CLI decides where they go.

#![forbid(unsafe_code)]

mod align;
mod artifact_list;
mod deps_file;
mod listing;
mod mutate;
mod session;

pub use align::{
    align_local_versions, detect_mismatches, replace_dependency, set_dependency_version,
    update_artifact_and_dependency_version, update_own_version,
};
pub use artifact_list::{check_artifact_list, persist_artifact_list, render_comparison};
pub use deps_file::{apply_project_dependencies, extract_project_dependencies};
pub use listing::{
    render_artifacts, render_dependants, render_dependencies, render_mismatches,
    render_multi_version, search_artifacts, serialize_mismatches,
};
pub use mutate::{MutationOptions, MutationSummary, Outcome};
pub use session::{LoadInput, Session, load_session};
