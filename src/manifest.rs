//! Template manifests (`forge.json`).
//! A manifest is read fresh on every operation and validated completely
//! before anything is rendered; a partially valid manifest is never returned.

use crate::constants::{MANIFEST_FILE, SCHEMA_VERSION};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Declaration of one template variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarSpec {
    /// Text shown when prompting; the variable name when absent.
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    /// Pattern the whole value must match.
    #[serde(default)]
    pub regex: Option<String>,
}

impl VarSpec {
    /// Default value, treating an empty string as no default.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref().filter(|value| !value.is_empty())
    }
}

/// How a file's content is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    /// Decode as UTF-8 and render as a template.
    #[default]
    Text,
    /// Copy raw bytes verbatim.
    Binary,
    /// Text if the bytes are valid UTF-8, binary otherwise.
    Auto,
}

/// One file produced by a template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    /// Source path relative to the template root.
    pub src: String,
    /// Destination path template; `src` when absent.
    #[serde(default)]
    pub dst: Option<String>,
    #[serde(default)]
    pub mode: FileMode,
}

impl FileEntry {
    pub fn destination_template(&self) -> &str {
        self.dst.as_deref().unwrap_or(&self.src)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hooks {
    /// Commands run after generation, each an argument vector.
    #[serde(default)]
    pub post: Vec<Vec<String>>,
}

/// A validated template manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub schema_version: u64,
    #[serde(default)]
    pub vars: IndexMap<String, VarSpec>,
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub hooks: Option<Hooks>,
}

impl Manifest {
    /// Post-generation commands, empty when the manifest declares none.
    pub fn post_hooks(&self) -> &[Vec<String>] {
        self.hooks.as_ref().map(|hooks| hooks.post.as_slice()).unwrap_or_default()
    }

    /// Parses and validates manifest JSON. `origin` names the manifest in errors.
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidManifest {
            manifest: origin.to_string(),
            reason,
        };

        let raw: serde_json::Value =
            serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let object = raw
            .as_object()
            .ok_or_else(|| invalid("top level must be an object".to_string()))?;

        // Integer only: `1.0` and `true` are rejected.
        match object.get("schema_version").and_then(serde_json::Value::as_u64) {
            Some(SCHEMA_VERSION) => {}
            _ => {
                return Err(invalid(format!(
                    "unsupported schema_version (expected {SCHEMA_VERSION})"
                )))
            }
        }
        if !object.get("files").is_some_and(serde_json::Value::is_array) {
            return Err(invalid("manifest must include a 'files' list".to_string()));
        }
        if object.get("vars").is_some_and(|vars| !vars.is_object()) {
            return Err(invalid("'vars' must be an object".to_string()));
        }

        let manifest: Manifest =
            serde_json::from_value(raw).map_err(|e| invalid(e.to_string()))?;
        manifest.validate(origin)?;
        Ok(manifest)
    }

    fn validate(&self, origin: &str) -> Result<()> {
        for (name, spec) in &self.vars {
            if let Some(pattern) = &spec.regex {
                regex::Regex::new(pattern).map_err(|e| Error::InvalidManifest {
                    manifest: origin.to_string(),
                    reason: format!("variable '{name}' has an invalid regex: {e}"),
                })?;
            }
        }

        for (index, command) in self.post_hooks().iter().enumerate() {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(Error::InvalidHook {
                    reason: format!(
                        "post hook #{} in '{origin}' must be a non-empty argument list",
                        index + 1
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Loads and validates the manifest at `template_root`.
///
/// # Errors
/// * `Error::ManifestNotFound` if the template root has no manifest
/// * `Error::InvalidManifest` for a bad schema version or malformed shape
/// * `Error::InvalidHook` for an empty hook command
pub fn load_manifest<P: AsRef<Path>>(template_root: P) -> Result<Manifest> {
    let template_root = template_root.as_ref();
    let manifest_path = template_root.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(Error::ManifestNotFound {
            template_dir: template_root.display().to_string(),
        });
    }

    debug!("Loading manifest from {}", manifest_path.display());
    let content = std::fs::read_to_string(&manifest_path).map_err(Error::IoError)?;
    Manifest::from_json(&content, &manifest_path.display().to_string())
}
