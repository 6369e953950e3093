//! Forge's main application entry point.
//! Parses arguments, builds the settings once and dispatches to the library.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use project_forge::{
    cli::{get_args, Command, NewArgs, OutputStyle, PackCommand},
    config::Settings,
    doctor::run_checks,
    error::{default_error_handler, Error, Result},
    features::{self, FEATURES},
    generate::{GenerateOptions, Generator},
    locator::{find_templates, get_template},
    logger::init_logger,
    manifest::load_manifest,
    packs::PackRegistry,
    prompt::DialoguerPrompter,
    renderer::MiniJinjaRenderer,
    vars::{parse_assignments, resolve_context},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = Settings::from_env().and_then(|settings| run(&settings, args.command)) {
        default_error_handler(err);
    }
}

fn run(settings: &Settings, command: Command) -> Result<()> {
    let registry = PackRegistry::new(settings);

    match command {
        Command::List => {
            let packs = registry.list()?;
            for template in find_templates(&packs)? {
                println!("{:<28} {:<16} {}", template.name, template.pack.name, template.pack.kind);
            }
        }
        Command::New(args) => new_project(&registry, args)?,
        Command::Features => {
            for feature in FEATURES {
                println!("{:<24} {}", feature.name(), feature.description());
            }
        }
        Command::Add { feature, dest, force } => {
            let feature = features::get(&feature)?;
            let dest = std::path::absolute(dest).map_err(Error::IoError)?;
            feature.apply(&dest, force)?;
            println!("Applied feature: {}", feature.name());
        }
        Command::Pack(PackCommand::List) => {
            for pack in registry.list()? {
                println!(
                    "{:<20} {:<8} {} {} {}",
                    pack.name,
                    pack.kind,
                    pack.path.display(),
                    pack.source.as_deref().unwrap_or(""),
                    pack.commit.as_deref().unwrap_or("")
                );
            }
            if settings.lock_path.exists() {
                println!("Lockfile: {}", settings.lock_path.display());
            }
        }
        Command::Pack(PackCommand::Add { source, name }) => {
            let pack = registry.add(&source, name.as_deref())?;
            match &pack.commit {
                Some(commit) => println!(
                    "Added pack: {} ({}) @ {}",
                    pack.name,
                    pack.kind,
                    &commit[..commit.len().min(12)]
                ),
                None => println!("Added pack: {} ({})", pack.name, pack.kind),
            }
        }
        Command::Pack(PackCommand::Remove { name }) => {
            registry.remove(&name)?;
            println!("Removed pack: {name}");
        }
        Command::Doctor => {
            for check in run_checks(settings) {
                println!("{:<12} {:<8} {}", check.name, check.status, check.details);
            }
        }
    }

    Ok(())
}

fn new_project(registry: &PackRegistry<'_>, args: NewArgs) -> Result<()> {
    let renderer = MiniJinjaRenderer::new();
    let prompt = DialoguerPrompter::new();

    let packs = registry.list()?;
    let manifest = load_manifest(get_template(&args.template, &packs)?.root)?;
    let provided = parse_assignments(&args.vars)?;
    let context = resolve_context(&manifest, &provided, &prompt, args.yes)?;
    let dest = std::path::absolute(&args.dest).map_err(Error::IoError)?;

    let options = GenerateOptions {
        overwrite: args.force,
        dry_run: args.dry_run,
        auto_confirm: args.yes,
        init_repo: args.git,
    };
    let created =
        Generator::new(&renderer, &prompt).generate(&args.template, &dest, &packs, &context, options)?;

    if args.dry_run {
        println!("Dry run: would create {} files", created.len());
    } else {
        println!("Created {} files in {}", created.len(), dest.display());
    }

    match args.output {
        OutputStyle::List => {
            for path in &created {
                println!("  - {}", path.display());
            }
        }
        OutputStyle::Tree => print_tree(&dest, &created),
    }
    Ok(())
}

/// Prints `created` as an indented tree relative to `dest`.
fn print_tree(dest: &Path, created: &[PathBuf]) {
    let root = std::fs::canonicalize(dest).unwrap_or_else(|_| dest.to_path_buf());
    let mut nodes: BTreeSet<PathBuf> = BTreeSet::new();
    for path in created {
        let relative = path.strip_prefix(&root).or_else(|_| path.strip_prefix(dest));
        let Ok(relative) = relative else { continue };
        for ancestor in relative.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                nodes.insert(ancestor.to_path_buf());
            }
        }
    }

    println!("{}", dest.display());
    for node in nodes {
        let depth = node.components().count();
        let name = node.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!("{}{}", "  ".repeat(depth), name);
    }
}
