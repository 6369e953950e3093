//! Forge generates new projects from named templates collected from packs.
//! Packs are resolved into templates, a template's manifest is planned into
//! file writes under a destination root, the plan is applied and the
//! template's post-generation hooks are run.

/// Command-line interface definitions
pub mod cli;

/// Process-wide settings: forge home, cache and ledger locations
pub mod config;

/// Common constants
pub mod constants;

/// Environment checks for external tools and the lock file
pub mod doctor;

/// Error types and handling
pub mod error;

/// Post-generation features applied to existing projects
pub mod features;

/// Path safety guard and file writing
pub mod fs;

/// Orchestration of a full generation run
pub mod generate;

/// Git clone and init support for packs and projects
pub mod git;

/// Post-generation hook execution
pub mod hooks;

/// Template discovery across packs
pub mod locator;

/// Logger initialization for the binary
pub mod logger;

/// Template manifest loading and validation
pub mod manifest;

/// Pack registry and its ledger
pub mod packs;

/// Render planning and plan execution
pub mod plan;

/// User input and interaction handling
pub mod prompt;

/// Template rendering
pub mod renderer;

/// Variable parsing and context resolution
pub mod vars;
