use crate::model::MvuConfigV1;
use anyhow::Context;
use camino::Utf8PathBuf;
use globset::Glob;
use mvu_domain::model::ProfileSelection;
use mvu_domain::protect::ProtectRules;

const DEFAULT_DESCRIPTOR: &str = "pom.xml";

/// The only `schema` value understood by this version.
pub const CONFIG_SCHEMA_V1: &str = "mvu.config.v1";

/// Command line values. Non-empty values replace the config file's.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub directories: Vec<Utf8PathBuf>,
    pub profiles: Vec<String>,
    pub descriptor: Option<String>,
    /// Directory that relative config `directories` are resolved against.
    pub config_dir: Option<Utf8PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub roots: Vec<Utf8PathBuf>,
    pub profiles: ProfileSelection,
    pub descriptor_name: String,
    pub protect: ProtectRules,
}

pub fn resolve_config(cfg: MvuConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != CONFIG_SCHEMA_V1
    {
        anyhow::bail!("unsupported config schema: '{schema}' (expected '{CONFIG_SCHEMA_V1}')");
    }

    let roots = if !overrides.directories.is_empty() {
        overrides.directories
    } else if !cfg.directories.is_empty() {
        let base = overrides.config_dir.unwrap_or_default();
        cfg.directories.iter().map(|d| base.join(d)).collect()
    } else {
        vec![Utf8PathBuf::from(".")]
    };

    let profiles = if overrides.profiles.is_empty() {
        ProfileSelection::from_names(&cfg.profiles)
    } else {
        ProfileSelection::from_names(&overrides.profiles)
    };

    let descriptor_name = overrides
        .descriptor
        .or(cfg.descriptor)
        .unwrap_or_else(|| DEFAULT_DESCRIPTOR.to_string());
    validate_descriptor_name(&descriptor_name)?;

    validate_protect_globs(&cfg.protect.dependencies)?;
    let protect = ProtectRules::new(&cfg.protect.dependencies)
        .context("compile protect.dependencies globset")?;

    Ok(ResolvedConfig {
        roots,
        profiles,
        descriptor_name,
        protect,
    })
}

fn validate_descriptor_name(name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        anyhow::bail!("invalid descriptor file name: '{name}' (expected a plain file name)");
    }
    Ok(())
}

fn validate_protect_globs(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid protect.dependencies glob: {pattern}"))?;
    }
    Ok(())
}
