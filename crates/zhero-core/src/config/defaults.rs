//! Default values for Zhero configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Vocabulary Defaults
// ============================================================================

/// Local cache file for the vocabulary document.
pub const DEFAULT_VOCAB_FILE: &str = "rdf_schema.jsonld";

/// Schema.org release the vocabulary is fetched from when not cached locally.
pub const DEFAULT_VOCAB_SOURCE: &str =
    "https://raw.githubusercontent.com/schemaorg/schemaorg/refs/heads/main/data/releases/29.2/schemaorg-all-https.jsonld";

/// Namespace whose prefix is stripped to produce short class/property names.
pub const DEFAULT_VOCAB_NAMESPACE: &str = "https://schema.org/";

/// Deadline for the one-time vocabulary download (seconds).
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Root class of the vocabulary hierarchy.
pub const DEFAULT_ROOT_CLASS: &str = "Thing";

/// Marker repeated once per nesting level in the flattened class listing.
pub const DEFAULT_HIERARCHY_MARKER: &str = ">";

// ============================================================================
// Server Defaults
// ============================================================================

/// Port of the admin server (vocabulary browser, schema and page editing).
pub const DEFAULT_ADMIN_PORT: u16 = 8080;

/// Port of the public server (published pages).
pub const DEFAULT_PUBLIC_PORT: u16 = 8081;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory name.
pub const DEFAULT_DATA_DIR: &str = ".zhero";

/// Default schema definitions subdirectory.
pub const DEFAULT_SCHEMAS_DIR: &str = "schemas";

/// Default page content subdirectory.
pub const DEFAULT_PAGES_DIR: &str = "pages";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log format: "pretty" or "json".
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "zhero.toml";

/// Directory name under the user config dir.
pub const USER_CONFIG_DIR: &str = "zhero";

/// User config file name.
pub const USER_CONFIG_FILE: &str = "config.toml";
