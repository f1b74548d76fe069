//! Configured protection patterns for dependency keys.

use globset::{Glob, GlobSet, GlobSetBuilder};
use mvu_types::ArtifactKey;

/// Glob patterns over `group:artifact`. Matching dependencies are never rewritten.
#[derive(Clone, Debug, Default)]
pub struct ProtectRules {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl ProtectRules {
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            patterns: patterns.to_vec(),
            set: Some(builder.build()?),
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// The first configured pattern matching `key`.
    pub fn matching(&self, key: &ArtifactKey) -> Option<&str> {
        let set = self.set.as_ref()?;
        let first = set.matches(key.as_str()).into_iter().min()?;
        self.patterns.get(first).map(String::as_str)
    }
}
