//! CLI entry point for mvu.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, output and exit
//! codes. All business logic lives in the `mvu-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use mvu_app::{LoadInput, MutationOptions, MutationSummary, Session};
use mvu_domain::analysis::DependencyFilter;
use mvu_settings::{DEFAULT_CONFIG_FILE, Overrides};
use mvu_types::DisplayOptions;
use std::io::IsTerminal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "mvu",
    version,
    about = "Keep dependency versions aligned across a multi-module Maven reactor"
)]
struct Cli {
    /// Search projects in directory DIR. Defaults to the current directory.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    directories: Vec<Utf8PathBuf>,

    /// Enable profile(s), comma separated; `*` enables all profiles.
    #[arg(long = "profile", value_name = "PROFILE")]
    profiles: Vec<String>,

    /// Log intended changes without writing any file.
    #[arg(long)]
    dryrun: bool,

    /// Verbose output (locations and profiles in listings, debug logging).
    #[arg(short, long)]
    verbose: bool,

    /// Path to the mvu config TOML (`mvu.toml` in the current directory when present).
    #[arg(long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    /// Descriptor file name to look for in every project directory.
    #[arg(long, value_name = "NAME")]
    descriptor: Option<String>,

    /// List all found artifacts.
    #[arg(long)]
    list_artifacts: bool,

    /// List all found dependencies (supports --filter-local and --filter-system).
    #[arg(long)]
    list_dependencies: bool,

    /// List all dependencies together with their dependants.
    #[arg(long)]
    list_deps_and_dependants: bool,

    /// Search for artifacts matching PATTERN (supports --exact).
    #[arg(long, value_name = "PATTERN")]
    search_artifacts: Vec<String>,

    /// Search for dependencies matching PATTERN (supports --exact and --filter-local).
    #[arg(long, value_name = "PATTERN")]
    search_dependencies: Vec<String>,

    /// When searching, only match exactly the same artifact keys.
    #[arg(long)]
    exact: bool,

    /// Include only (true) or exclude (false) dependencies built locally.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    filter_local: Option<bool>,

    /// Include only (true) or exclude (false) system-scoped dependencies.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    filter_system: Option<bool>,

    /// Search dependencies referenced with more than one version.
    #[arg(long)]
    search_multi_version_deps: bool,

    /// Report dependencies whose version differs from the locally built artifact.
    #[arg(long)]
    detect_local_version_mismatch: bool,

    /// Print the mismatch report as JSON.
    #[arg(long)]
    json: bool,

    /// Sync the version of all dependants of local project KEY (group:artifact) to its version.
    #[arg(long, value_name = "KEY")]
    align_local_dep_version: Vec<String>,

    /// Set the version of every dependency on group:artifact.
    #[arg(long, value_name = "G:A:V")]
    set_dep_version: Vec<String>,

    /// Write the list of local artifacts to FILE.
    #[arg(long, value_name = "FILE")]
    persist_artifact_list: Option<Utf8PathBuf>,

    /// Compare the local artifacts with the list in FILE.
    #[arg(long, value_name = "FILE")]
    check_artifact_list: Option<Utf8PathBuf>,

    /// Write the dependencies of PROJECT to FILE.
    #[arg(long, num_args = 2, value_names = ["PROJECT", "FILE"], action = ArgAction::Append)]
    extract_project_deps: Vec<String>,

    /// Replace the dependencies of PROJECT with those listed in FILE.
    #[arg(long, num_args = 2, value_names = ["PROJECT", "FILE"], action = ArgAction::Append)]
    apply_project_deps: Vec<String>,

    /// Replace dependency OLD (g:a:v) by NEW (g:a:v).
    #[arg(long, num_args = 2, value_names = ["OLD", "NEW"], action = ArgAction::Append)]
    replace_dependency: Vec<String>,

    /// Update the own version of the matching project.
    #[arg(long, value_name = "G:A:V")]
    update_artifact_version: Vec<String>,

    /// Update the project and every dependency on it to the version
    /// (--update-artifact-version and --set-dep-version together).
    #[arg(long, value_name = "G:A:V")]
    update_artifact_and_dep_version: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default.into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let (config_text, config_dir) = read_config(cli.config.as_deref())?;
    let session = mvu_app::load_session(LoadInput {
        config_text: &config_text,
        overrides: Overrides {
            directories: cli.directories.clone(),
            profiles: cli.profiles.clone(),
            descriptor: cli.descriptor.clone(),
            config_dir,
        },
    })?;

    let display = DisplayOptions {
        verbose: cli.verbose,
    };
    let opts = MutationOptions {
        dry_run: cli.dryrun,
        display,
    };
    let reactor = &session.reactor;

    if cli.list_artifacts {
        print!("{}", mvu_app::render_artifacts(reactor, display));
    }

    if cli.list_dependencies {
        let filter = DependencyFilter {
            local: cli.filter_local,
            system: cli.filter_system,
            ..Default::default()
        };
        print!("{}", mvu_app::render_dependencies(reactor, &filter, display));
    }

    if cli.list_deps_and_dependants {
        print!("{}", mvu_app::render_dependants(reactor, display));
    }

    if !cli.search_artifacts.is_empty() {
        print!(
            "{}",
            mvu_app::search_artifacts(reactor, &cli.search_artifacts, cli.exact)
        );
    }

    for pattern in &cli.search_dependencies {
        let filter = DependencyFilter {
            pattern: Some(pattern.clone()),
            exact: cli.exact,
            local: cli.filter_local,
            system: None,
        };
        print!("{}", mvu_app::render_dependencies(reactor, &filter, display));
    }

    if cli.search_multi_version_deps {
        print!("{}", mvu_app::render_multi_version(reactor, display));
    }

    if cli.detect_local_version_mismatch {
        let report = mvu_app::detect_mismatches(reactor, &[]);
        if cli.json {
            print!("{}", mvu_app::serialize_mismatches(&report)?);
        } else {
            print!("{}", mvu_app::render_mismatches(&report, display));
        }
    }

    run_mutations(cli, &session, opts)
}

fn run_mutations(cli: &Cli, session: &Session, opts: MutationOptions) -> anyhow::Result<()> {
    let reactor = &session.reactor;
    let mut summary = MutationSummary::default();

    if !cli.align_local_dep_version.is_empty() {
        summary.merge(&mvu_app::align_local_versions(
            reactor,
            &cli.align_local_dep_version,
            opts,
        ));
    }

    // Dependency versions are set before any own version is updated.
    let set_dep_versions = cli
        .set_dep_version
        .iter()
        .chain(&cli.update_artifact_and_dep_version);
    for triple in set_dep_versions {
        summary.merge(&mvu_app::set_dependency_version(reactor, triple, opts)?);
    }

    if let Some(file) = &cli.persist_artifact_list {
        summary.record(&mvu_app::persist_artifact_list(reactor, file, opts));
    }

    if let Some(file) = &cli.check_artifact_list {
        let cmp = mvu_app::check_artifact_list(reactor, file)?;
        print!("{}", mvu_app::render_comparison(&cmp));
    }

    for pair in cli.extract_project_deps.chunks(2) {
        if let [project, file] = pair {
            summary.record(&mvu_app::extract_project_dependencies(
                reactor,
                project,
                Utf8Path::new(file),
                opts,
            ));
        }
    }

    for pair in cli.apply_project_deps.chunks(2) {
        if let [project, file] = pair {
            summary.record(&mvu_app::apply_project_dependencies(
                reactor,
                project,
                Utf8Path::new(file),
                opts,
            ));
        }
    }

    for pair in cli.replace_dependency.chunks(2) {
        if let [old, new] = pair {
            summary.merge(&mvu_app::replace_dependency(reactor, old, new, opts));
        }
    }

    let own_versions = cli
        .update_artifact_version
        .iter()
        .chain(&cli.update_artifact_and_dep_version);
    for triple in own_versions {
        summary.record(&mvu_app::update_own_version(reactor, triple, opts));
    }

    if summary.total() > 0 {
        info!(
            written = summary.written,
            unchanged = summary.unchanged,
            dry_run = summary.dry_run,
            protected = summary.protected,
            skipped = summary.skipped,
            failed = summary.failed,
            "Done"
        );
    }
    Ok(())
}

/// Config text and the directory it came from. A missing default config means defaults; a
/// missing explicit config is an error.
fn read_config(explicit: Option<&Utf8Path>) -> anyhow::Result<(String, Option<Utf8PathBuf>)> {
    let path = explicit.unwrap_or(Utf8Path::new(DEFAULT_CONFIG_FILE));
    let dir = path.parent().map(Utf8Path::to_path_buf);
    match explicit {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
            Ok((text, dir))
        }
        None => Ok((std::fs::read_to_string(path).unwrap_or_default(), dir)),
    }
}
