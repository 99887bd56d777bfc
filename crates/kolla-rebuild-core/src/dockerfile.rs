//! Rendering the per-component container build scripts.
//!
//! Each supported component has its own Dockerfile template; the template
//! pulls the upstream Kolla service image for the configured release, runs
//! the staged install script with the resolved integration package version,
//! and drops back to the service user.

use kolla_rebuild_common::config::Config;
use kolla_rebuild_common::constants::{IMAGE_NAMESPACE, INSTALL_SCRIPT, KOLLA_IMAGE_REGISTRY};
use kolla_rebuild_common::error::{RebuildError, Result};
use kolla_rebuild_common::types::{BuildDescriptor, Component, FileManifest};

const CINDER_VOLUME_TEMPLATE: &str = "\
FROM @BASE_IMAGE@
USER root
COPY @INSTALL_SCRIPT@ /tmp/sp-osi-install.sh
RUN /bin/sh /tmp/sp-osi-install.sh cinder @SP_OSI_VERSION@ && rm -f /tmp/sp-osi-install.sh
USER cinder
";

const NOVA_COMPUTE_TEMPLATE: &str = "\
FROM @BASE_IMAGE@
USER root
COPY @INSTALL_SCRIPT@ /tmp/sp-osi-install.sh
RUN /bin/sh /tmp/sp-osi-install.sh nova @SP_OSI_VERSION@ && rm -f /tmp/sp-osi-install.sh
USER nova
";

fn template_for(component: &Component) -> Option<&'static str> {
    match (component.project(), component.service()) {
        ("cinder", "volume") => Some(CINDER_VOLUME_TEMPLATE),
        ("nova", "compute") => Some(NOVA_COMPUTE_TEMPLATE),
        _ => None,
    }
}

/// Renders the Dockerfile for one component and derives the image name.
///
/// A pure transform: the same configuration, staged files, and component
/// always produce the same descriptor.
///
/// # Errors
///
/// Returns `RebuildError::UnsupportedRelease` if the release/component pair
/// has no template, and `RebuildError::MissingFile` if a staged file has
/// disappeared from disk since the manifest was built.
pub fn build_dockerfile(
    cfg: &Config,
    files: &FileManifest,
    component: &Component,
) -> Result<BuildDescriptor> {
    let template = template_for(component).ok_or_else(|| RebuildError::UnsupportedRelease {
        release: cfg.release.to_string(),
        component: component.to_string(),
    })?;

    // The manifest is validated at staging time; re-check here since the
    // build may run long after staging.
    for entry in files.iter() {
        if !entry.source.is_file() {
            return Err(RebuildError::MissingFile {
                path: entry.source.clone(),
            });
        }
    }
    let install = files
        .find(INSTALL_SCRIPT)
        .ok_or_else(|| RebuildError::MissingFile {
            path: INSTALL_SCRIPT.into(),
        })?;

    let base_image = format!(
        "{KOLLA_IMAGE_REGISTRY}/{component}:{tag}",
        tag = cfg.release.base_tag()
    );
    let dockerfile = template
        .replace("@BASE_IMAGE@", &base_image)
        .replace("@INSTALL_SCRIPT@", &install.dest.to_string_lossy())
        .replace("@SP_OSI_VERSION@", &cfg.sp_osi_version);
    let image = format!("{IMAGE_NAMESPACE}/{component}");

    tracing::debug!(%image, base = %base_image, "rendered the Dockerfile");
    Ok(BuildDescriptor { dockerfile, image })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use kolla_rebuild_common::types::Release;

    use super::*;

    fn staged_files(datadir: &Path) -> FileManifest {
        std::fs::create_dir_all(datadir).expect("failed to create the data dir");
        std::fs::write(datadir.join(INSTALL_SCRIPT), "#!/bin/sh\n").expect("failed to write");
        let mut files = FileManifest::new();
        files.push(datadir.join(INSTALL_SCRIPT), INSTALL_SCRIPT.into());
        files
    }

    fn test_config(topdir: &Path, release: Release) -> Config {
        Config {
            topdir: topdir.to_path_buf(),
            release,
            sp_osi_version: "3.4.0".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn version_is_substituted_exactly_once_for_every_pair() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let files = staged_files(&dir.path().join("kolla"));

        for release in Release::ALL {
            for name in ["cinder-volume", "nova-compute"] {
                let cfg = test_config(dir.path(), release);
                let component = Component::parse(name).expect("parse failed");
                let build =
                    build_dockerfile(&cfg, &files, &component).expect("render failed");

                assert_eq!(
                    build.dockerfile.matches(&cfg.sp_osi_version).count(),
                    1,
                    "{release}/{name}"
                );
                assert!(!build.dockerfile.contains('@'), "{release}/{name}");
                assert_eq!(build.image, format!("storpool/{name}"));
            }
        }
    }

    #[test]
    fn base_image_follows_the_release_tag() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let files = staged_files(&dir.path().join("kolla"));
        let cfg = test_config(dir.path(), Release::Zed);
        let component = Component::parse("cinder-volume").expect("parse failed");

        let build = build_dockerfile(&cfg, &files, &component).expect("render failed");
        assert!(
            build
                .dockerfile
                .starts_with("FROM quay.io/openstack.kolla/cinder-volume:zed-rocky-9\n")
        );
    }

    #[test]
    fn install_script_path_is_copied_into_the_image() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let files = staged_files(&dir.path().join("kolla"));
        let cfg = test_config(dir.path(), Release::Master);
        let component = Component::parse("nova-compute").expect("parse failed");

        let build = build_dockerfile(&cfg, &files, &component).expect("render failed");
        assert!(build.dockerfile.contains("COPY sp-osi-install.sh /tmp/sp-osi-install.sh"));
        assert!(build.dockerfile.contains("USER nova"));
    }

    #[test]
    fn unknown_pair_has_no_template() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let files = staged_files(&dir.path().join("kolla"));
        let cfg = test_config(dir.path(), Release::Master);
        let component = Component::parse("glance-api").expect("parse failed");

        let err = build_dockerfile(&cfg, &files, &component)
            .expect_err("glance-api should have no template");
        let msg = err.to_string();
        assert!(msg.contains("master"));
        assert!(msg.contains("glance-api"));
    }

    #[test]
    fn a_staged_file_gone_from_disk_is_fatal() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let datadir = dir.path().join("kolla");
        let files = staged_files(&datadir);
        std::fs::remove_file(datadir.join(INSTALL_SCRIPT)).expect("failed to remove");
        let cfg = test_config(dir.path(), Release::Master);
        let component = Component::parse("cinder-volume").expect("parse failed");

        assert!(matches!(
            build_dockerfile(&cfg, &files, &component),
            Err(RebuildError::MissingFile { .. })
        ));
    }
}
