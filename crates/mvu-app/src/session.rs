//! Load settings and the reactor model.

use anyhow::Context;
use mvu_repo::{Reactor, ReactorOptions};
use mvu_settings::{MvuConfigV1, Overrides, ResolvedConfig};

/// Input for [`load_session`].
#[derive(Clone, Debug)]
pub struct LoadInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// The resolved configuration and the reactor it describes.
#[derive(Clone, Debug)]
pub struct Session {
    pub config: ResolvedConfig,
    pub reactor: Reactor,
}

/// Parse config, scan the reactor, index it and extract its dependencies.
pub fn load_session(input: LoadInput<'_>) -> anyhow::Result<Session> {
    let cfg = if input.config_text.trim().is_empty() {
        MvuConfigV1::default()
    } else {
        mvu_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let config = mvu_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let opts = ReactorOptions {
        profiles: config.profiles.clone(),
        protect: config.protect.clone(),
        descriptor_name: config.descriptor_name.clone(),
    };
    let reactor = mvu_repo::load_reactor(&config.roots, &opts)?;
    Ok(Session { config, reactor })
}
