//! Process-wide settings for forge.
//! Built once at process entry and passed by reference to every operation
//! that touches the pack ledger or the builtin pack.

use crate::constants::{LEDGER_FILE, LOCK_FILE};
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Environment variable overriding the forge home directory.
pub const HOME_ENV: &str = "FORGE_HOME";

/// Environment variable overriding the builtin template pack location.
pub const BUILTIN_ENV: &str = "FORGE_BUILTIN_TEMPLATES";

/// Resolved locations of everything forge reads or writes outside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of forge's own state.
    pub home: PathBuf,
    /// Where remote packs are cloned, one slot per pack name.
    pub cache_dir: PathBuf,
    /// Mutable ledger of user-added packs.
    pub ledger_path: PathBuf,
    /// Derived reproducibility record, rewritten after each ledger change.
    pub lock_path: PathBuf,
    /// Directory of the builtin pack.
    pub builtin_root: PathBuf,
}

impl Settings {
    /// Builds settings rooted at `home`, without consulting the environment.
    pub fn with_home<H: Into<PathBuf>, B: Into<PathBuf>>(home: H, builtin_root: B) -> Self {
        let home = home.into();
        Self {
            cache_dir: home.join("cache"),
            ledger_path: home.join(LEDGER_FILE),
            lock_path: home.join(LOCK_FILE),
            builtin_root: builtin_root.into(),
            home,
        }
    }

    /// Builds settings from `FORGE_HOME` / `FORGE_BUILTIN_TEMPLATES`, falling back
    /// to `~/.project-forge` and the templates shipped with the crate.
    pub fn from_env() -> Result<Self> {
        let home = match std::env::var_os(HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => dirs::home_dir()
                .map(|dir| dir.join(".project-forge"))
                .ok_or_else(|| {
                    Error::IoError(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("cannot determine home directory (set {HOME_ENV})"),
                    ))
                })?,
        };
        let builtin_root = std::env::var_os(BUILTIN_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_builtin_root);

        debug!("Using forge home '{}'.", home.display());
        Ok(Self::with_home(home, builtin_root))
    }

    /// Cache slot used for a remote pack with the given name.
    pub fn cache_slot(&self, pack_name: &str) -> PathBuf {
        self.cache_dir.join(format!("pack-{pack_name}"))
    }
}

/// The `templates_builtin` directory next to the crate manifest.
pub fn default_builtin_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates_builtin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_home_layout() {
        let settings = Settings::with_home("/tmp/forge-home", "/opt/builtin");
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/forge-home/cache"));
        assert_eq!(settings.ledger_path, PathBuf::from("/tmp/forge-home/packs.json"));
        assert_eq!(settings.lock_path, PathBuf::from("/tmp/forge-home/packs.lock.json"));
        assert_eq!(settings.builtin_root, PathBuf::from("/opt/builtin"));
        assert_eq!(
            settings.cache_slot("my-pack"),
            PathBuf::from("/tmp/forge-home/cache/pack-my-pack")
        );
    }
}
