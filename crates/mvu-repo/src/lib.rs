//! Repository adapters: discover the projects of a reactor and build its dependency model.
//!
//! This crate is allowed to do filesystem IO (reading only). Rewriting descriptors is the job of
//! the application layer.

#![forbid(unsafe_code)]

mod reactor;
mod scan;

use anyhow::Context;
use camino::Utf8Path;
use mvu_pom::PomDocument;

pub use reactor::{Reactor, ReactorOptions, extract_reactor, load_reactor};
pub use scan::{DEFAULT_DESCRIPTOR, ScannedProject, scan};

/// Read and parse one descriptor file.
pub fn read_descriptor(path: &Utf8Path) -> anyhow::Result<PomDocument> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    mvu_pom::parse_pom(&text).with_context(|| format!("parse {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn read_descriptor_parses_file() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8_root(&tmp).join("pom.xml");
        std::fs::write(
            &path,
            "<project><groupId>g</groupId><artifactId>a</artifactId><version>1</version></project>",
        )
        .expect("write");
        let doc = read_descriptor(&path).expect("read");
        assert_eq!(doc.project.artifact_id(), Some("a"));
    }

    #[test]
    fn read_descriptor_errors_name_the_file() {
        let tmp = TempDir::new().expect("temp dir");
        let missing = utf8_root(&tmp).join("missing.xml");
        let err = read_descriptor(&missing).expect_err("missing");
        assert!(err.to_string().contains("missing.xml"));

        let broken = utf8_root(&tmp).join("pom.xml");
        std::fs::write(&broken, "<notaproject/>").expect("write");
        let err = read_descriptor(&broken).expect_err("not a project");
        assert!(format!("{err:#}").starts_with(&format!("parse {broken}")));
    }
}
