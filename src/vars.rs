//! Variable assignment parsing and context resolution.

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::prompt::Prompter;
use crate::renderer::Context;
use log::debug;
use regex::Regex;

/// Parses `key=value` assignments. The value is everything after the first `=`.
///
/// # Errors
/// * `Error::InvalidVariableAssignment` if an item has no `=` or an empty key
pub fn parse_assignments<I, S>(assignments: I) -> Result<Context>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut context = Context::new();
    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            Error::InvalidVariableAssignment {
                assignment: assignment.to_string(),
                reason: "use key=value".to_string(),
            }
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidVariableAssignment {
                assignment: assignment.to_string(),
                reason: "empty variable name".to_string(),
            });
        }
        context.insert(key.to_string(), value.to_string());
    }
    Ok(context)
}

/// Builds the rendering context for `manifest`.
///
/// Declared variables are resolved in manifest order: a provided value wins,
/// otherwise the default is used in non-interactive mode and offered as the
/// answer in interactive mode. Provided values for undeclared variables are
/// kept as-is.
///
/// # Errors
/// * `Error::MissingVariable` if a variable without default is not provided
///   in non-interactive mode
/// * `Error::VariablePatternMismatch` if a value violates the variable's regex
pub fn resolve_context(
    manifest: &Manifest,
    provided: &Context,
    prompter: &dyn Prompter,
    non_interactive: bool,
) -> Result<Context> {
    let mut context = Context::new();

    for (name, spec) in &manifest.vars {
        let value = match provided.get(name) {
            Some(value) => value.clone(),
            None if non_interactive => spec
                .default_value()
                .map(str::to_string)
                .ok_or_else(|| Error::MissingVariable { name: name.clone() })?,
            None => prompter.input(
                spec.prompt.clone().unwrap_or_else(|| name.clone()),
                spec.default_value().map(str::to_string),
            )?,
        };

        if let Some(pattern) = &spec.regex {
            check_pattern(name, &value, pattern)?;
        }
        debug!("Resolved variable '{name}'.");
        context.insert(name.clone(), value);
    }

    for (name, value) in provided {
        if !context.contains_key(name) {
            context.insert(name.clone(), value.clone());
        }
    }

    Ok(context)
}

/// Requires `value` to match `pattern` in full.
fn check_pattern(name: &str, value: &str, pattern: &str) -> Result<()> {
    let anchored = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
        Error::InvalidVariableAssignment {
            assignment: name.to_string(),
            reason: format!("invalid pattern '{pattern}': {e}"),
        }
    })?;
    if anchored.is_match(value) {
        Ok(())
    } else {
        Err(Error::VariablePatternMismatch {
            name: name.to_string(),
            value: value.to_string(),
            pattern: pattern.to_string(),
        })
    }
}
