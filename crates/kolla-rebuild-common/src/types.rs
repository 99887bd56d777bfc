//! Domain primitive types for the container rebuild pipeline.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{RebuildError, Result};

/// An OpenStack release the containers can be rebuilt for.
///
/// The set is fixed: Kolla publishes base images per release, and the
/// Dockerfile templates are written against these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Release {
    /// The development branch.
    Master,
    /// The 2023.1 (Antelope) release.
    Antelope,
    /// The Zed release.
    Zed,
    /// The Yoga release.
    Yoga,
}

impl Release {
    /// All supported releases, newest first.
    pub const ALL: [Self; 4] = [Self::Master, Self::Antelope, Self::Zed, Self::Yoga];

    /// Returns the release name as used on the command line and in image tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Antelope => "2023.1",
            Self::Zed => "zed",
            Self::Yoga => "yoga",
        }
    }

    /// Returns the Kolla base-image tag for this release.
    #[must_use]
    pub fn base_tag(self) -> String {
        format!("{}-rocky-9", self.as_str())
    }

    /// Space-separated list of the supported release names, for messages.
    #[must_use]
    pub fn allowed_names() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|release| release.as_str()).collect();
        names.join(" ")
    }
}

impl FromStr for Release {
    type Err = RebuildError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|release| release.as_str() == value)
            .copied()
            .ok_or_else(|| RebuildError::UnknownRelease {
                name: value.to_string(),
                allowed: Self::allowed_names(),
            })
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container image identity: an OpenStack project plus a service role.
///
/// Parsed from the `project-service` command-line form, e.g. `cinder-volume`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    project: String,
    service: String,
}

impl Component {
    /// Splits a `project-service` name at its first dash.
    ///
    /// # Errors
    ///
    /// Returns `RebuildError::InvalidComponent` if the name does not split
    /// into two non-empty parts.
    pub fn parse(name: &str) -> Result<Self> {
        match name.split_once('-') {
            Some((project, service)) if !project.is_empty() && !service.is_empty() => Ok(Self {
                project: project.to_string(),
                service: service.to_string(),
            }),
            _ => Err(RebuildError::InvalidComponent {
                name: name.to_string(),
            }),
        }
    }

    /// The OpenStack project name (e.g. `cinder`).
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The service role within the project (e.g. `volume`).
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project, self.service)
    }
}

/// A single staged build-context file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Absolute path of the file on disk.
    pub source: PathBuf,
    /// Path of the file relative to the build context.
    pub dest: PathBuf,
}

/// Ordered collection of files staged for the container build context.
///
/// Built once by the preparer, consumed by the Dockerfile builder, and
/// discarded after the run.
#[derive(Debug, Clone, Default)]
pub struct FileManifest {
    entries: Vec<ManifestEntry>,
}

impl FileManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a staged file.
    pub fn push(&mut self, source: PathBuf, dest: PathBuf) {
        self.entries.push(ManifestEntry { source, dest });
    }

    /// Iterates over the staged files in staging order.
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    /// Looks up a staged file by its context-relative destination.
    #[must_use]
    pub fn find(&self, dest: &str) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.dest.as_os_str() == dest)
    }

    /// Number of staged files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no files have been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rendered container build: the Dockerfile text plus the target image name.
///
/// Produced per component, immediately consumed by the build driver.
#[derive(Debug, Clone)]
pub struct BuildDescriptor {
    /// The rendered Dockerfile text.
    pub dockerfile: String,
    /// The target image name (`storpool/<project>-<service>`).
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_parses_every_supported_name() {
        for release in Release::ALL {
            assert_eq!(release.as_str().parse::<Release>().ok(), Some(release));
        }
    }

    #[test]
    fn release_rejects_unknown_name_listing_the_allowed_set() {
        let err = "pike".parse::<Release>().expect_err("pike is unsupported");
        let msg = err.to_string();
        assert!(msg.contains("pike"));
        assert!(msg.contains("master"));
        assert!(msg.contains("2023.1"));
    }

    #[test]
    fn release_base_tag_includes_the_release_name() {
        assert_eq!(Release::Zed.base_tag(), "zed-rocky-9");
        assert_eq!(Release::Antelope.base_tag(), "2023.1-rocky-9");
    }

    #[test]
    fn component_splits_at_the_first_dash() {
        let comp = Component::parse("cinder-volume").expect("parse failed");
        assert_eq!(comp.project(), "cinder");
        assert_eq!(comp.service(), "volume");
        assert_eq!(comp.to_string(), "cinder-volume");
    }

    #[test]
    fn component_keeps_dashes_in_the_service_part() {
        let comp = Component::parse("nova-compute-ironic").expect("parse failed");
        assert_eq!(comp.project(), "nova");
        assert_eq!(comp.service(), "compute-ironic");
    }

    #[test]
    fn component_without_separator_is_invalid() {
        assert!(Component::parse("cinder").is_err());
        assert!(Component::parse("cinder-").is_err());
        assert!(Component::parse("-volume").is_err());
        assert!(Component::parse("").is_err());
    }

    #[test]
    fn manifest_preserves_order_and_finds_by_dest() {
        let mut files = FileManifest::new();
        files.push("/data/a.sh".into(), "a.sh".into());
        files.push("/data/b.patch".into(), "b.patch".into());

        assert_eq!(files.len(), 2);
        let dests: Vec<_> = files.iter().map(|entry| entry.dest.clone()).collect();
        assert_eq!(dests, [PathBuf::from("a.sh"), PathBuf::from("b.patch")]);
        assert!(files.find("b.patch").is_some());
        assert!(files.find("missing").is_none());
    }
}
