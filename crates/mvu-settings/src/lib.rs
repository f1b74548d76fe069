//! Config parsing and resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{MvuConfigV1, ProtectConfig};
pub use resolve::{CONFIG_SCHEMA_V1, Overrides, ResolvedConfig};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "mvu.toml";

/// Parse `mvu.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<MvuConfigV1> {
    let cfg: MvuConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings (config file + command line overrides).
pub fn resolve_config(cfg: MvuConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
