//! Post-generation features applied to an existing project.
//! The set is closed: every feature is listed in [`FEATURES`].

use crate::error::{Error, Result};
use crate::fs::write_file;
use log::debug;
use std::fs;
use std::path::Path;

/// A named change that can be applied to a generated project.
pub trait Feature: Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Applies the feature under `dest`, refusing to replace files unless `overwrite`.
    fn apply(&self, dest: &Path, overwrite: bool) -> Result<()>;
}

/// Every available feature, in display order.
pub static FEATURES: &[&dyn Feature] =
    &[&CiGithubActions, &Docker, &PythonQuality, &ReleasePythonPypi];

/// Looks up a feature by name.
///
/// # Errors
/// * `Error::UnknownFeature` if no feature has that name
pub fn get(name: &str) -> Result<&'static dyn Feature> {
    FEATURES
        .iter()
        .copied()
        .find(|feature| feature.name() == name)
        .ok_or_else(|| Error::UnknownFeature { name: name.to_string() })
}

pub struct CiGithubActions;

impl Feature for CiGithubActions {
    fn name(&self) -> &'static str {
        "ci-github-actions"
    }

    fn description(&self) -> &'static str {
        "Add a GitHub Actions CI workflow (pytest + ruff)."
    }

    fn apply(&self, dest: &Path, overwrite: bool) -> Result<()> {
        write_file(dest.join(".github/workflows/ci.yml"), CI_WORKFLOW, overwrite)
    }
}

pub struct Docker;

impl Feature for Docker {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn description(&self) -> &'static str {
        "Add a simple Dockerfile (you may need to tweak CMD)."
    }

    fn apply(&self, dest: &Path, overwrite: bool) -> Result<()> {
        write_file(dest.join("Dockerfile"), DOCKERFILE, overwrite)
    }
}

pub struct ReleasePythonPypi;

impl Feature for ReleasePythonPypi {
    fn name(&self) -> &'static str {
        "release-python-pypi"
    }

    fn description(&self) -> &'static str {
        "Add a tag-based release workflow that publishes to PyPI (Trusted Publishing)."
    }

    fn apply(&self, dest: &Path, overwrite: bool) -> Result<()> {
        write_file(dest.join(".github/workflows/release.yml"), RELEASE_WORKFLOW, overwrite)
    }
}

pub struct PythonQuality;

impl Feature for PythonQuality {
    fn name(&self) -> &'static str {
        "python-quality"
    }

    fn description(&self) -> &'static str {
        "Add ruff + black + mypy + pre-commit config (and a dev extra in pyproject.toml)."
    }

    /// Patches `pyproject.toml` in place and writes `.pre-commit-config.yaml`.
    ///
    /// Sections already present are left untouched, so applying twice changes
    /// nothing in `pyproject.toml`. The pre-commit file is checked before any
    /// patching, so a refused overwrite leaves the project unchanged.
    fn apply(&self, dest: &Path, overwrite: bool) -> Result<()> {
        let pyproject = dest.join("pyproject.toml");
        if !pyproject.is_file() {
            return Err(Error::FeatureNotApplicable {
                name: self.name().to_string(),
                reason: "expected pyproject.toml in the project root".to_string(),
            });
        }
        let precommit = dest.join(".pre-commit-config.yaml");
        if !overwrite && fs::symlink_metadata(&precommit).is_ok() {
            return Err(Error::DestinationExists { path: precommit.display().to_string() });
        }

        let original = fs::read_to_string(&pyproject).map_err(Error::IoError)?;
        let mut patched = ensure_dev_extra(&original);
        for (marker, block) in [
            ("[tool.ruff]", RUFF_SECTION),
            ("[tool.black]", BLACK_SECTION),
            ("[tool.mypy]", MYPY_SECTION),
        ] {
            patched = append_block_if_missing(patched, marker, block);
        }
        if patched != original {
            debug!("Patching {}", pyproject.display());
            fs::write(&pyproject, patched).map_err(Error::IoError)?;
        }

        write_file(precommit, PRECOMMIT_CONFIG, overwrite)
    }
}

const OPTIONAL_DEPENDENCIES: &str = "[project.optional-dependencies]";
const DEV_EXTRA: &str = "dev = [\"pytest\", \"ruff\", \"black\", \"mypy\", \"pre-commit\"]\n";

fn with_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn is_dev_assignment(line: &str) -> bool {
    line.strip_prefix("dev").is_some_and(|rest| rest.trim_start().starts_with('='))
}

/// Adds a `dev` extra to `[project.optional-dependencies]`, creating the
/// table when it is missing. An existing `dev` extra is kept.
fn ensure_dev_extra(text: &str) -> String {
    let has_table = text.lines().any(|line| line.trim() == OPTIONAL_DEPENDENCIES);
    if has_table && text.lines().any(is_dev_assignment) {
        return text.to_string();
    }
    if !has_table {
        let mut out = with_trailing_newline(text.to_string());
        out.push('\n');
        out.push_str(OPTIONAL_DEPENDENCIES);
        out.push('\n');
        out.push_str(DEV_EXTRA);
        return out;
    }

    let mut out = String::with_capacity(text.len() + DEV_EXTRA.len());
    let mut in_table = false;
    let mut inserted = false;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed == OPTIONAL_DEPENDENCIES {
            in_table = true;
            out.push_str(line);
            continue;
        }
        if in_table && trimmed.starts_with('[') && trimmed.ends_with(']') {
            if !inserted {
                out.push_str(DEV_EXTRA);
                inserted = true;
            }
            in_table = false;
        }
        out.push_str(line);
    }
    if !inserted {
        out = with_trailing_newline(out);
        out.push_str(DEV_EXTRA);
    }
    out
}

fn append_block_if_missing(text: String, marker: &str, block: &str) -> String {
    if text.contains(marker) {
        return text;
    }
    let mut out = with_trailing_newline(text);
    out.push('\n');
    out.push_str(block.trim_start_matches('\n'));
    out
}

const RUFF_SECTION: &str = r#"
[tool.ruff]
line-length = 100
target-version = "py311"

[tool.ruff.lint]
select = ["E", "F", "I", "B", "UP"]
ignore = []
"#;

const BLACK_SECTION: &str = r#"
[tool.black]
line-length = 100
target-version = ["py311"]
"#;

const MYPY_SECTION: &str = r#"
[tool.mypy]
python_version = "3.11"
strict = true
warn_unused_configs = true
"#;

const PRECOMMIT_CONFIG: &str = r#"repos:
  - repo: https://github.com/astral-sh/ruff-pre-commit
    rev: v0.6.9
    hooks:
      - id: ruff
        args: [--fix]
      - id: ruff-format
  - repo: https://github.com/psf/black
    rev: 24.10.0
    hooks:
      - id: black
  - repo: https://github.com/pre-commit/mirrors-mypy
    rev: v1.12.1
    hooks:
      - id: mypy
"#;

const CI_WORKFLOW: &str = r#"name: CI

on:
  push:
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-python@v5
        with:
          python-version: "3.11"
      - name: Install
        run: |
          python -m pip install -U pip
          pip install -e ".[dev]" || pip install -e .
          pip install pytest ruff
      - name: Lint
        run: ruff check .
      - name: Tests
        run: pytest
"#;

const DOCKERFILE: &str = r#"FROM python:3.11-slim

WORKDIR /app
COPY . /app

RUN python -m pip install -U pip && pip install -e .

CMD ["python", "-m", "app"]
"#;

const RELEASE_WORKFLOW: &str = r#"name: Release

on:
  push:
    tags:
      - "v*"

permissions:
  contents: read
  id-token: write

jobs:
  build-and-publish:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-python@v5
        with:
          python-version: "3.11"
      - name: Build
        run: |
          python -m pip install -U pip
          pip install build
          python -m build
      - name: Publish to PyPI
        uses: pypa/gh-action-pypi-publish@release/v1
"#;
