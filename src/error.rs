//! Error handling for forge.
//! Every fallible operation in the library returns [`Result`], and the binary
//! reports the single [`Error`] it receives verbatim before exiting.

use thiserror::Error;

/// Custom error types for forge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations.
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// Ledger or manifest JSON that could not be parsed or written.
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Template rendering failed, including references to undefined variables.
    #[error("Template render error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    #[error("Prompt error: {0}.")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Invalid variable assignment '{assignment}': {reason}.")]
    InvalidVariableAssignment { assignment: String, reason: String },

    #[error("Missing required variable '{name}' (provide --var {name}=...).")]
    MissingVariable { name: String },

    #[error("Variable '{name}' value '{value}' does not match pattern '{pattern}'.")]
    VariablePatternMismatch { name: String, value: String, pattern: String },

    #[error("Refusing absolute path: '{path}'.")]
    AbsolutePath { path: String },

    #[error("Refusing path traversal: '{path}' escapes '{root}'.")]
    PathTraversal { path: String, root: String },

    #[error("Missing manifest in template: '{template_dir}'.")]
    ManifestNotFound { template_dir: String },

    #[error("Invalid manifest '{manifest}': {reason}.")]
    InvalidManifest { manifest: String, reason: String },

    #[error("Missing template file: '{path}'.")]
    TemplateFileNotFound { path: String },

    #[error("File exists: '{path}' (use --force).")]
    DestinationExists { path: String },

    #[error("Template '{name}' not found. Try: forge list.")]
    TemplateNotFound { name: String },

    #[error("Invalid hook command: {reason}.")]
    InvalidHook { reason: String },

    #[error("Hook command not found: '{command}'.")]
    HookCommandNotFound { command: String },

    #[error("Hook '{command}' failed with status: {status}.")]
    HookFailed { command: String, status: String },

    #[error("Fetching pack from '{source_ref}' failed: {reason}.")]
    FetchFailed { source_ref: String, reason: String },

    #[error("No pack named '{name}'.")]
    PackNotFound { name: String },

    #[error("Invalid pack: {0}.")]
    InvalidPack(String),

    #[error("Unknown feature '{name}'. Try: forge features.")]
    UnknownFeature { name: String },

    #[error("Feature '{name}' cannot be applied: {reason}.")]
    FeatureNotApplicable { name: String, reason: String },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
