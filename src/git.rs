//! Git plumbing used by the pack registry and by `generate --git`.
use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::Path;
use url::Url;

/// Fetches a remote pack into a local directory.
pub trait PackFetcher {
    /// Copies `source` into `dest` (which does not exist yet).
    ///
    /// # Returns
    /// * `Result<Option<String>>` - The fetched revision, or `None` when it
    ///   could not be determined
    ///
    /// # Errors
    /// * `Error::FetchFailed` if the source cannot be fetched
    fn fetch(&self, source: &str, dest: &Path) -> Result<Option<String>>;
}

/// Fetcher performing a depth-1 clone through libgit2.
#[derive(Debug, Default)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl PackFetcher for GitFetcher {
    fn fetch(&self, source: &str, dest: &Path) -> Result<Option<String>> {
        debug!("Cloning '{}' to '{}'.", redact(source), dest.display());

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.depth(1);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_opts);

        let repo = builder.clone(source, dest).map_err(|e| Error::FetchFailed {
            source_ref: redact(source),
            reason: e.message().to_string(),
        })?;

        Ok(head_revision(&repo))
    }
}

/// Resolves `HEAD` to a commit id; a failure degrades to `None`.
fn head_revision(repo: &git2::Repository) -> Option<String> {
    match repo.head().and_then(|head| head.peel_to_commit()) {
        Ok(commit) => Some(commit.id().to_string()),
        Err(e) => {
            warn!("Could not resolve fetched revision: {}", e.message());
            None
        }
    }
}

/// Initializes an empty repository at `dest`.
pub fn init_repository<P: AsRef<Path>>(dest: P) -> Result<()> {
    let dest = dest.as_ref();
    debug!("Initializing git repository in '{}'.", dest.display());
    git2::Repository::init(dest).map(|_| ()).map_err(Error::Git2Error)
}

/// Strips credentials from URL sources before they reach logs or errors.
pub fn redact(source: &str) -> String {
    match Url::parse(source) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => source.to_string(),
    }
}
