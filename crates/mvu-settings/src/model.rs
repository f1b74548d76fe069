use serde::{Deserialize, Serialize};

/// `mvu.toml` schema v1.
///
/// Permissive on purpose: unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvuConfigV1 {
    /// Optional schema string; must be `mvu.config.v1` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Reactor roots, relative to the config file.
    #[serde(default)]
    pub directories: Vec<String>,

    /// Active profiles; `*` activates all of them.
    #[serde(default)]
    pub profiles: Vec<String>,

    /// Descriptor file name (`pom.xml` when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,

    #[serde(default)]
    pub protect: ProtectConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectConfig {
    /// Glob patterns over `group:artifact`; matching dependencies are never rewritten.
    #[serde(default)]
    pub dependencies: Vec<String>,
}
