//! Writing the rendered Dockerfile and invoking `docker build`.
//!
//! One invocation per component, fully sequential. The temporary Dockerfile
//! lives only for the duration of its build and is removed on every exit
//! path when the `NamedTempFile` guard drops.

use std::ffi::OsString;
use std::io::Write as _;
use std::path::Path;
use std::process::Command;

use anyhow::Context as _;
use kolla_rebuild_common::config::Config;
use kolla_rebuild_common::types::BuildDescriptor;

/// Invocation parameters shared by every build in a run.
#[derive(Debug)]
pub struct BuildOptions<'a> {
    /// Resolved path of the `docker` executable.
    pub docker: &'a Path,
    /// The build-context directory handed to `docker build`.
    pub datadir: &'a Path,
    /// Whether to pass `--pull` to update the upstream image first.
    pub pull: bool,
}

fn render_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str().to_os_string())
        .chain(args.iter().cloned())
        .map(|word| {
            let word = word.to_string_lossy().into_owned();
            if word.is_empty() || word.contains(char::is_whitespace) {
                format!("'{word}'")
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the Dockerfile to a temporary file and runs `docker build` once.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written, if the build
/// command cannot be launched, or if it exits with a non-zero status. The
/// error message carries the rendered command line.
pub fn run_build(
    cfg: &Config,
    build: &BuildDescriptor,
    opts: &BuildOptions<'_>,
) -> anyhow::Result<()> {
    let mut dockerfile = tempfile::Builder::new()
        .prefix("Dockerfile.")
        .tempfile()
        .context("could not create a temporary Dockerfile")?;
    dockerfile
        .write_all(build.dockerfile.as_bytes())
        .and_then(|()| dockerfile.flush())
        .with_context(|| {
            format!(
                "could not write the Dockerfile to {}",
                dockerfile.path().display()
            )
        })?;

    if cfg.verbose {
        tracing::info!(
            path = %dockerfile.path().display(),
            dockerfile = %build.dockerfile,
            "wrote the Dockerfile"
        );
    }

    let mut args: Vec<OsString> = vec![
        "build".into(),
        "-t".into(),
        build.image.clone().into(),
        "--rm".into(),
    ];
    if opts.pull {
        args.push("--pull".into());
    }
    args.push("-f".into());
    args.push(dockerfile.path().into());
    args.push("--".into());
    args.push(opts.datadir.into());

    let cmd_str = render_command(opts.docker, &args);
    tracing::info!(command = %cmd_str, image = %build.image, "rebuilding the container");

    let status = Command::new(opts.docker)
        .args(&args)
        .status()
        .with_context(|| format!("could not run `{cmd_str}`"))?;
    if !status.success() {
        anyhow::bail!("command `{cmd_str}` failed: {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kolla_rebuild_common::types::Release;

    use super::*;

    fn test_config() -> Config {
        Config {
            topdir: PathBuf::from("/src/osi"),
            release: Release::Master,
            sp_osi_version: "3.4.0".to_string(),
            verbose: false,
        }
    }

    fn test_build() -> BuildDescriptor {
        BuildDescriptor {
            dockerfile: "FROM scratch\n".to_string(),
            image: "storpool/cinder-volume".to_string(),
        }
    }

    #[test]
    fn command_rendering_quotes_whitespace() {
        let rendered = render_command(
            Path::new("docker"),
            &["build".into(), "-f".into(), "/tmp/Dockerfile. 1".into()],
        );
        assert_eq!(rendered, "docker build -f '/tmp/Dockerfile. 1'");
    }

    #[test]
    fn successful_build_command_is_accepted() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let opts = BuildOptions {
            docker: Path::new("true"),
            datadir: dir.path(),
            pull: false,
        };
        run_build(&test_config(), &test_build(), &opts).expect("true should succeed");
    }

    #[test]
    fn failing_build_command_reports_the_command_line() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let opts = BuildOptions {
            docker: Path::new("false"),
            datadir: dir.path(),
            pull: true,
        };
        let err = run_build(&test_config(), &test_build(), &opts)
            .expect_err("false should fail");
        let msg = err.to_string();
        assert!(msg.contains("failed"));
        assert!(msg.contains("--pull"));
        assert!(msg.contains("storpool/cinder-volume"));
    }

    #[test]
    fn unlaunchable_build_command_is_an_error() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let opts = BuildOptions {
            docker: Path::new("/nonexistent/docker"),
            datadir: dir.path(),
            pull: false,
        };
        let err = run_build(&test_config(), &test_build(), &opts)
            .expect_err("launch should fail");
        assert!(err.to_string().contains("could not run"));
    }
}
