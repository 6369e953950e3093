//! Template discovery across packs.

use crate::constants::{MANIFEST_FILE, TEMPLATES_DIR};
use crate::error::{Error, Result};
use crate::packs::Pack;
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A template found in a pack. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTemplate {
    pub name: String,
    pub root: PathBuf,
    pub pack: Pack,
}

/// Directories of `pack` that may hold templates: `<pack>/templates` when it
/// exists, then the pack directory itself.
pub fn template_dirs(pack: &Pack) -> Vec<PathBuf> {
    let conventional = pack.path.join(TEMPLATES_DIR);
    let mut dirs = Vec::with_capacity(2);
    if conventional.is_dir() {
        dirs.push(conventional);
    }
    dirs.push(pack.path.clone());
    dirs
}

fn is_template_root(dir: &Path) -> bool {
    dir.is_dir() && dir.join(MANIFEST_FILE).is_file()
}

/// Finds every template across `packs`, sorted by name.
///
/// When several packs provide the same name, the last pack in `packs` wins,
/// so user packs override the builtin pack and later packs override earlier ones.
pub fn find_templates(packs: &[Pack]) -> Result<Vec<LocatedTemplate>> {
    let mut found: BTreeMap<String, LocatedTemplate> = BTreeMap::new();

    for pack in packs {
        for dir in template_dirs(pack) {
            if !dir.is_dir() {
                debug!("Skipping missing template directory '{}'.", dir.display());
                continue;
            }

            let mut children: Vec<PathBuf> = Vec::new();
            for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::IoError(e.into()))?;
                if is_template_root(entry.path()) {
                    children.push(entry.into_path());
                }
            }

            for root in children {
                let name = match root.file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    None => continue,
                };
                if let Some(previous) = found.get(&name) {
                    debug!(
                        "Template '{}' from pack '{}' overrides pack '{}'.",
                        name, pack.name, previous.pack.name
                    );
                }
                found.insert(
                    name.clone(),
                    LocatedTemplate { name, root, pack: pack.clone() },
                );
            }
        }
    }

    Ok(found.into_values().collect())
}

/// Finds the template called `name`.
///
/// # Errors
/// * `Error::TemplateNotFound` if no pack provides it
pub fn get_template(name: &str, packs: &[Pack]) -> Result<LocatedTemplate> {
    find_templates(packs)?
        .into_iter()
        .find(|template| template.name == name)
        .ok_or_else(|| Error::TemplateNotFound { name: name.to_string() })
}
