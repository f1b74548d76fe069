//! Stable value types shared across the mvu workspace.
//!
//! This crate is intentionally boring:
//! - artifact coordinates and the canonical `group:artifact` key
//! - display options threaded into human-readable formatting
//! - the persisted artifact list format

#![forbid(unsafe_code)]

pub mod artifact_list;
pub mod coords;
pub mod display;

pub use artifact_list::{ArtifactList, RejectedLine, format_artifact_list, parse_artifact_list};
pub use coords::{Artifact, ArtifactKey, CoordinateError, DEFAULT_PACKAGING};
pub use display::DisplayOptions;
