//! Core template processing orchestration.
//! Ties discovery, manifest loading, planning, execution and hooks together.

use crate::error::{Error, Result};
use crate::git::init_repository;
use crate::hooks::run_post_hooks;
use crate::locator::get_template;
use crate::manifest::load_manifest;
use crate::packs::Pack;
use crate::plan::{apply_plan, render_plan, Template};
use crate::prompt::Prompter;
use crate::renderer::{Context, TemplateRenderer};
use log::debug;
use std::path::{Path, PathBuf};

/// Switches controlling one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Replace files that already exist in the destination.
    pub overwrite: bool,
    /// Plan only; write nothing and run no hooks.
    pub dry_run: bool,
    /// Run hooks without asking.
    pub auto_confirm: bool,
    /// Initialize a git repository in the destination after writing.
    pub init_repo: bool,
}

/// Generates projects using one renderer and one prompter.
pub struct Generator<'a> {
    renderer: &'a dyn TemplateRenderer,
    prompt: &'a dyn Prompter,
}

impl<'a> Generator<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, prompt: &'a dyn Prompter) -> Self {
        Self { renderer, prompt }
    }

    /// Generates `template_name` into `destination`.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Planned destination paths, identical for a
    ///   dry run and the corresponding real run
    ///
    /// # Notes
    /// A dry run stops after planning, so it cannot report destinations that
    /// a real run would refuse to overwrite.
    pub fn generate<P: AsRef<Path>>(
        &self,
        template_name: &str,
        destination: P,
        packs: &[Pack],
        context: &Context,
        options: GenerateOptions,
    ) -> Result<Vec<PathBuf>> {
        let destination = std::path::absolute(destination.as_ref()).map_err(Error::IoError)?;

        let located = get_template(template_name, packs)?;
        debug!("Using template '{}' from pack '{}'.", located.name, located.pack.name);
        let manifest = load_manifest(&located.root)?;
        let template = Template { located, manifest };

        let plan = render_plan(self.renderer, &template, &destination, context)?;
        let created = plan.iter().map(|op| op.destination.clone()).collect();

        if options.dry_run {
            return Ok(created);
        }

        std::fs::create_dir_all(&destination).map_err(Error::IoError)?;
        apply_plan(&plan, options.overwrite)?;

        if options.init_repo {
            init_repository(&destination)?;
        }

        run_post_hooks(
            self.renderer,
            self.prompt,
            &template.manifest,
            &destination,
            context,
            options.auto_confirm,
        )?;

        Ok(created)
    }
}
