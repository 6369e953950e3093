//! Post-generation hook execution.
//! Hooks are argument vectors declared in the manifest, never shell strings.

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::prompt::Prompter;
use crate::renderer::{Context, TemplateRenderer};
use log::info;
use std::path::Path;
use std::process::Command;

/// Runs the manifest's post hooks in `destination`, in declaration order.
///
/// Each argument is rendered against `context` first. Without `auto_confirm`
/// every command is confirmed individually; a declined command is skipped.
/// Files already written stay in place when a hook fails.
///
/// # Errors
/// * `Error::InvalidHook` if a command is empty
/// * `Error::HookCommandNotFound` if the program cannot be located
/// * `Error::HookFailed` if the program exits unsuccessfully
pub fn run_post_hooks<P: AsRef<Path>>(
    renderer: &dyn TemplateRenderer,
    prompt: &dyn Prompter,
    manifest: &Manifest,
    destination: P,
    context: &Context,
    auto_confirm: bool,
) -> Result<()> {
    let destination = destination.as_ref();

    for command in manifest.post_hooks() {
        let argv = command
            .iter()
            .map(|arg| renderer.render(arg, context))
            .collect::<Result<Vec<_>>>()?;
        let (program, args) = argv.split_first().ok_or_else(|| Error::InvalidHook {
            reason: "expected a non-empty argument list".to_string(),
        })?;

        let display = argv.join(" ");
        let confirmed = prompt.confirm(
            auto_confirm,
            format!("Run post-hook in {}: {display} ?", destination.display()),
        )?;
        if !confirmed {
            info!("Skipping post-hook: {display}");
            continue;
        }

        info!("Running post-hook: {display}");
        let status = Command::new(program)
            .args(args)
            .current_dir(destination)
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    Error::HookCommandNotFound { command: program.clone() }
                }
                _ => Error::IoError(e),
            })?;

        if !status.success() {
            return Err(Error::HookFailed { command: display, status: status.to_string() });
        }
    }

    Ok(())
}
