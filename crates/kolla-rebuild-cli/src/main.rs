//! # kolla-rebuild
//!
//! Rebuild Kolla containers for the StorPool backend.
//!
//! Sequential glue: resolve the run configuration, stage the build-context
//! files, then render and run one `docker build` per requested component.

mod driver;

use std::str::FromStr as _;

use anyhow::Context as _;
use clap::Parser;
use kolla_rebuild_common::config::Config;
use kolla_rebuild_common::constants::{ALL_COMPONENTS, DEFAULT_RELEASE};
use kolla_rebuild_common::error::RebuildError;
use kolla_rebuild_common::types::{Component, Release};
use kolla_rebuild_core::{dockerfile, locate, prepare, version};

/// Rebuild Kolla containers for the StorPool Cinder and Nova backends.
#[derive(Parser, Debug)]
#[command(name = "kolla-rebuild", version, about, long_about = None)]
struct Cli {
    /// The OpenStack component containers to rebuild.
    #[arg(short, long = "component", value_name = "NAME")]
    components: Vec<String>,

    /// Update the upstream container image before rebuilding.
    #[arg(long)]
    pull: bool,

    /// Quiet operation; no diagnostic output.
    #[arg(short, long)]
    quiet: bool,

    /// The OpenStack release to rebuild the containers for.
    #[arg(short, long, default_value = DEFAULT_RELEASE, value_name = "NAME")]
    release: String,

    /// The integration package version to use instead of the last released one.
    #[arg(short = 's', long = "sp-osi", value_name = "VERSION")]
    sp_osi: Option<String>,
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Validates the requested components, substituting the default set.
fn resolve_components(requested: &[String]) -> anyhow::Result<Vec<Component>> {
    let names: Vec<&str> = if requested.is_empty() {
        ALL_COMPONENTS.to_vec()
    } else {
        requested.iter().map(String::as_str).collect()
    };
    names
        .into_iter()
        .map(|name| {
            if !ALL_COMPONENTS.contains(&name) {
                return Err(RebuildError::UnknownComponent {
                    name: name.to_string(),
                    allowed: ALL_COMPONENTS.join(" "),
                }
                .into());
            }
            Ok(Component::parse(name)?)
        })
        .collect()
}

/// Prepares the runtime configuration object.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let release = Release::from_str(&cli.release)?;
    let sp_osi_version = match &cli.sp_osi {
        Some(value) => {
            if !version::is_valid_version(value) {
                return Err(RebuildError::InvalidVersion {
                    value: value.clone(),
                }
                .into());
            }
            value.clone()
        }
        None => locate::find_sp_osi_version(),
    };
    let topdir = locate::find_topdir()?;
    Ok(Config {
        topdir,
        release,
        sp_osi_version,
        verbose: !cli.quiet,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let components = resolve_components(&cli.components)?;
    let cfg = build_config(&cli)?;
    tracing::info!(
        release = %cfg.release,
        sp_osi_version = %cfg.sp_osi_version,
        topdir = %cfg.topdir.display(),
        "resolved the run configuration"
    );

    let datadir = cfg.data_dir();
    let files = prepare::prepare_data_files(&cfg, &datadir)?;

    let docker = which::which("docker").context("docker executable not found on PATH")?;
    let opts = driver::BuildOptions {
        docker: &docker,
        datadir: &datadir,
        pull: cli.pull,
    };
    for component in &components {
        let build = dockerfile::build_dockerfile(&cfg, &files, component)?;
        driver::run_build(&cfg, &build, &opts)?;
    }
    Ok(())
}
