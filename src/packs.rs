//! Template pack registry.
//! Keeps the ordered ledger of user-added packs and regenerates the
//! reproducibility lock file from it after every mutation.

use crate::config::Settings;
use crate::constants::{BUILTIN_PACK, SLUG_MAX_LEN};
use crate::error::{Error, Result};
use crate::git::{redact, GitFetcher, PackFetcher};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a pack came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    Builtin,
    Local,
    Remote,
}

impl std::fmt::Display for PackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            PackKind::Builtin => "builtin",
            PackKind::Local => "local",
            PackKind::Remote => "remote",
        })
    }
}

/// A named source of templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub name: String,
    pub kind: PackKind,
    pub path: PathBuf,
    /// Origin the pack was fetched from, for remote packs.
    #[serde(default)]
    pub source: Option<String>,
    /// Revision fetched, when it could be resolved.
    #[serde(default)]
    pub commit: Option<String>,
}

/// A ledger entry: the pack plus any bookkeeping keys kept in the ledger only.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PackRecord {
    #[serde(flatten)]
    pack: Pack,
    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Ledger {
    #[serde(default)]
    packs: Vec<PackRecord>,
}

#[derive(Debug, Serialize)]
struct LockEntry<'a> {
    name: &'a str,
    kind: PackKind,
    source: Option<&'a str>,
    path: &'a Path,
    commit: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LockFile<'a> {
    packs: Vec<LockEntry<'a>>,
}

impl<'a> From<&'a Ledger> for LockFile<'a> {
    fn from(ledger: &'a Ledger) -> Self {
        let packs = ledger
            .packs
            .iter()
            .map(|record| LockEntry {
                name: &record.pack.name,
                kind: record.pack.kind,
                source: record.pack.source.as_deref(),
                path: &record.pack.path,
                commit: record.pack.commit.as_deref(),
            })
            .collect();
        Self { packs }
    }
}

/// Pack registry bound to one set of [`Settings`].
pub struct PackRegistry<'a> {
    settings: &'a Settings,
    fetcher: Box<dyn PackFetcher + 'a>,
}

impl<'a> PackRegistry<'a> {
    /// Creates a registry that fetches remote packs with git.
    pub fn new(settings: &'a Settings) -> Self {
        Self::with_fetcher(settings, Box::new(GitFetcher::new()))
    }

    pub fn with_fetcher(settings: &'a Settings, fetcher: Box<dyn PackFetcher + 'a>) -> Self {
        Self { settings, fetcher }
    }

    /// All packs in evaluation order: builtin first, then the ledger order.
    pub fn list(&self) -> Result<Vec<Pack>> {
        let ledger = self.load_ledger()?;
        let mut packs = vec![Pack {
            name: BUILTIN_PACK.to_string(),
            kind: PackKind::Builtin,
            path: self.settings.builtin_root.clone(),
            source: None,
            commit: None,
        }];
        packs.extend(ledger.packs.into_iter().map(|record| record.pack));
        Ok(packs)
    }

    /// Registers a local directory or fetches a remote pack.
    ///
    /// An existing local directory becomes a `local` pack at its canonical path.
    /// Anything else is fetched into the pack's cache slot, replacing whatever
    /// was cached there before. Re-adding an existing name replaces that entry
    /// in place.
    ///
    /// # Errors
    /// * `Error::InvalidPack` if the name is reserved or empty
    /// * `Error::FetchFailed` if a remote source cannot be fetched
    pub fn add(&self, source: &str, name: Option<&str>) -> Result<Pack> {
        let mut ledger = self.load_ledger()?;
        fs::create_dir_all(&self.settings.cache_dir).map_err(Error::IoError)?;

        let local = Path::new(source);
        let pack = if local.is_dir() {
            let path = fs::canonicalize(local).map_err(Error::IoError)?;
            let pack_name = match name {
                Some(name) => name.to_string(),
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| slug(source)),
            };
            check_name(&pack_name)?;
            Pack { name: pack_name, kind: PackKind::Local, path, source: None, commit: None }
        } else {
            let pack_name = name.map(str::to_string).unwrap_or_else(|| slug(source));
            check_name(&pack_name)?;

            let dest = self.settings.cache_slot(&pack_name);
            if dest.exists() {
                debug!("Clearing cached pack '{}'.", dest.display());
                fs::remove_dir_all(&dest).map_err(Error::IoError)?;
            }

            let commit = self.fetcher.fetch(source, &dest)?;
            let path = fs::canonicalize(&dest).map_err(Error::IoError)?;
            Pack {
                name: pack_name,
                kind: PackKind::Remote,
                path,
                source: Some(redact(source)),
                commit,
            }
        };

        upsert(&mut ledger, pack.clone());
        self.save_ledger(&ledger)?;
        debug!("Added pack '{}' ({}).", pack.name, pack.kind);
        Ok(pack)
    }

    /// Removes the pack called `name` from the ledger.
    ///
    /// # Errors
    /// * `Error::PackNotFound` if no user pack has that name
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut ledger = self.load_ledger()?;
        let before = ledger.packs.len();
        ledger.packs.retain(|record| record.pack.name != name);
        if ledger.packs.len() == before {
            return Err(Error::PackNotFound { name: name.to_string() });
        }

        self.save_ledger(&ledger)?;
        debug!("Removed pack '{name}'.");
        Ok(())
    }

    fn load_ledger(&self) -> Result<Ledger> {
        let path = &self.settings.ledger_path;
        if !path.exists() {
            return Ok(Ledger::default());
        }
        let content = fs::read_to_string(path).map_err(Error::IoError)?;
        serde_json::from_str(&content).map_err(Error::JsonError)
    }

    /// Writes the ledger, then rebuilds the lock file from it in full.
    fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        fs::create_dir_all(&self.settings.home).map_err(Error::IoError)?;

        let content = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.settings.ledger_path, content).map_err(Error::IoError)?;

        let lock = serde_json::to_string_pretty(&LockFile::from(ledger))?;
        fs::write(&self.settings.lock_path, lock).map_err(Error::IoError)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidPack("pack name must not be empty".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidPack(format!("'{name}' is not a valid pack name")));
    }
    if name == BUILTIN_PACK {
        return Err(Error::InvalidPack(format!("'{BUILTIN_PACK}' is reserved")));
    }
    Ok(())
}

/// Replaces the whole record with the same name in place, or appends a new one.
/// Bookkeeping keys of a replaced record are dropped with it.
fn upsert(ledger: &mut Ledger, pack: Pack) {
    let record = PackRecord { pack, extra: IndexMap::new() };
    match ledger.packs.iter_mut().find(|existing| existing.pack.name == record.pack.name) {
        Some(existing) => *existing = record,
        None => ledger.packs.push(record),
    }
}

/// Derives a filesystem-safe pack name from a source reference.
pub fn slug(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for ch in source.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed: String = out.trim_matches('-').chars().take(SLUG_MAX_LEN).collect();
    if trimmed.is_empty() {
        "pack".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(
            slug("https://github.com/acme/Forge-Packs.git"),
            "https-github-com-acme-forge-packs-git"
        );
        assert_eq!(slug("git@github.com:acme/packs"), "git-github-com-acme-packs");
        assert_eq!(slug("///"), "pack");
        assert_eq!(slug(&"a".repeat(100)).len(), SLUG_MAX_LEN);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let pack = |name: &str, path: &str| Pack {
            name: name.to_string(),
            kind: PackKind::Local,
            path: PathBuf::from(path),
            source: None,
            commit: None,
        };
        let mut ledger = Ledger::default();
        upsert(&mut ledger, pack("a", "/a"));
        upsert(&mut ledger, pack("b", "/b"));
        upsert(&mut ledger, pack("a", "/a2"));

        let names: Vec<_> = ledger.packs.iter().map(|r| r.pack.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(ledger.packs[0].pack.path, PathBuf::from("/a2"));
    }

    #[test]
    fn test_upsert_drops_bookkeeping_of_replaced_record() {
        let mut ledger: Ledger = serde_json::from_str(
            r#"{"packs": [{"name": "a", "kind": "local", "path": "/a", "pinned": true}]}"#,
        )
        .unwrap();
        assert!(ledger.packs[0].extra.contains_key("pinned"));

        upsert(
            &mut ledger,
            Pack {
                name: "a".to_string(),
                kind: PackKind::Local,
                path: PathBuf::from("/a2"),
                source: None,
                commit: None,
            },
        );

        assert_eq!(ledger.packs.len(), 1);
        assert!(ledger.packs[0].extra.is_empty());
        assert_eq!(ledger.packs[0].pack.path, PathBuf::from("/a2"));
    }
}
