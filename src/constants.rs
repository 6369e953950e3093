//! Common constants used throughout forge.

/// Manifest file name expected at every template root.
pub const MANIFEST_FILE: &str = "forge.json";

/// The only manifest schema version this build understands.
pub const SCHEMA_VERSION: u64 = 1;

/// Conventional subdirectory of a pack that holds its templates.
pub const TEMPLATES_DIR: &str = "templates";

/// Suffixes stripped from rendered destination names.
pub const TEMPLATE_SUFFIXES: [&str; 2] = [".j2", ".jinja"];

/// Name of the pack that ships with forge.
pub const BUILTIN_PACK: &str = "builtin";

/// Ledger of user-added packs, relative to the forge home.
pub const LEDGER_FILE: &str = "packs.json";

/// Reproducibility record derived from the ledger.
pub const LOCK_FILE: &str = "packs.lock.json";

/// Maximum length of a pack name derived from a remote source.
pub const SLUG_MAX_LEN: usize = 40;
