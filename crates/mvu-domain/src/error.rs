use camino::Utf8PathBuf;
use mvu_types::ArtifactKey;

/// Reactor consistency violations. All of them abort the run before any analysis or mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReactorError {
    #[error("duplicate artifact key {key}: declared by {first} and {second}")]
    DuplicateArtifactKey {
        key: ArtifactKey,
        first: Utf8PathBuf,
        second: Utf8PathBuf,
    },

    #[error("module cycle: {path} is already on the module chain [{}]", join_chain(.chain))]
    ModuleCycle {
        path: Utf8PathBuf,
        chain: Vec<Utf8PathBuf>,
    },

    #[error("module {path} is reachable through more than one module chain")]
    DuplicateModule { path: Utf8PathBuf },
}

fn join_chain(chain: &[Utf8PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
