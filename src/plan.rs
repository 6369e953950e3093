//! Render planning and plan execution.
//! Planning reads template sources and renders paths and contents without
//! touching the destination; executing is the only step that writes.

use crate::constants::TEMPLATE_SUFFIXES;
use crate::error::{Error, Result};
use crate::fs::{safe_join, write_file};
use crate::locator::LocatedTemplate;
use crate::manifest::{FileEntry, FileMode, Manifest};
use crate::renderer::{Context, TemplateRenderer};
use log::debug;
use std::path::{Path, PathBuf};

/// A located template together with its freshly loaded manifest.
#[derive(Debug, Clone)]
pub struct Template {
    pub located: LocatedTemplate,
    pub manifest: Manifest,
}

/// Content of one planned write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes.as_slice(),
        }
    }
}

/// One planned file write. `destination` is always inside the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOp {
    pub destination: PathBuf,
    pub payload: Payload,
}

impl WriteOp {
    pub fn is_binary(&self) -> bool {
        matches!(self.payload, Payload::Binary(_))
    }
}

/// Removes a known template suffix such as `.j2` from a rendered name.
pub fn strip_template_suffix(rendered: &str) -> &str {
    TEMPLATE_SUFFIXES
        .iter()
        .find_map(|suffix| rendered.strip_suffix(*suffix))
        .unwrap_or(rendered)
}

/// Expands the manifest's file list into write operations, in manifest order.
///
/// Any failure (path traversal, missing source, undefined variable) aborts
/// the whole plan.
pub fn render_plan<P: AsRef<Path>>(
    renderer: &dyn TemplateRenderer,
    template: &Template,
    destination_root: P,
    context: &Context,
) -> Result<Vec<WriteOp>> {
    let destination_root = destination_root.as_ref();
    template
        .manifest
        .files
        .iter()
        .map(|entry| plan_entry(renderer, template, destination_root, context, entry))
        .collect()
}

fn plan_entry(
    renderer: &dyn TemplateRenderer,
    template: &Template,
    destination_root: &Path,
    context: &Context,
    entry: &FileEntry,
) -> Result<WriteOp> {
    let rendered = renderer.render(entry.destination_template(), context)?;
    let destination = safe_join(destination_root, strip_template_suffix(&rendered))?;

    let source = safe_join(&template.located.root, &entry.src)?;
    if !source.is_file() {
        return Err(Error::TemplateFileNotFound { path: source.display().to_string() });
    }
    let raw = std::fs::read(&source).map_err(Error::IoError)?;

    let payload = match entry.mode {
        FileMode::Binary => Payload::Binary(raw),
        FileMode::Text => {
            let text = String::from_utf8(raw).map_err(|e| {
                Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("'{}' is not valid UTF-8: {e}", source.display()),
                ))
            })?;
            Payload::Text(renderer.render(&text, context)?)
        }
        FileMode::Auto => match String::from_utf8(raw) {
            Ok(text) => Payload::Text(renderer.render(&text, context)?),
            Err(e) => Payload::Binary(e.into_bytes()),
        },
    };

    debug!(
        "Planned {} '{}' -> '{}'",
        if matches!(payload, Payload::Binary(_)) { "copy" } else { "render" },
        entry.src,
        destination.display()
    );
    Ok(WriteOp { destination, payload })
}

/// Writes every operation in order.
///
/// There is no rollback: when operation N fails, operations before it stay on disk.
///
/// # Errors
/// * `Error::DestinationExists` if a destination exists and `overwrite` is false
pub fn apply_plan(plan: &[WriteOp], overwrite: bool) -> Result<()> {
    for op in plan {
        write_file(&op.destination, op.payload.as_bytes(), overwrite)?;
    }
    Ok(())
}
