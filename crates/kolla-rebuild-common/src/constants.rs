//! Fixed sets and default values for the container rebuild tool.

/// The known containers that we want to rebuild.
pub const ALL_COMPONENTS: [&str; 2] = ["cinder-volume", "nova-compute"];

/// The default OpenStack release (or "master") to rebuild the containers for.
pub const DEFAULT_RELEASE: &str = "master";

/// Name of the build-context data directory under the project top directory.
pub const DATA_DIR: &str = "kolla";

/// The in-image install script that every build context must contain.
pub const INSTALL_SCRIPT: &str = "sp-osi-install.sh";

/// The checksum manifest describing the staged data files.
pub const CHECKSUM_MANIFEST: &str = "checksums.json";

/// Registry prefix of the upstream Kolla service images.
pub const KOLLA_IMAGE_REGISTRY: &str = "quay.io/openstack.kolla";

/// Image namespace for the rebuilt containers.
pub const IMAGE_NAMESPACE: &str = "storpool";

/// Package-index metadata endpoint for the integration package.
pub const SP_OSI_INDEX_URL: &str = "https://pypi.org/pypi/storpool.spopenstack/json";

/// Integration package version used when the package-index lookup fails.
pub const FALLBACK_SP_OSI_VERSION: &str = "3.4.0";

/// How many parent directories the top-directory search will examine.
pub const MAX_TOPDIR_DEPTH: usize = 8;
