use project_forge::error::{Error, Result};
use project_forge::hooks::run_post_hooks;
use project_forge::manifest::Manifest;
use project_forge::prompt::Prompter;
use project_forge::renderer::{Context, MiniJinjaRenderer};
use std::cell::RefCell;
use std::collections::VecDeque;
use tempfile::TempDir;

/// Answers confirmations from a fixed script and records the questions.
struct ScriptedPrompter {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    fn new(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        self.asked.borrow_mut().push(prompt);
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }

    fn input(&self, prompt: String, _default: Option<String>) -> Result<String> {
        panic!("unexpected prompt: {prompt}")
    }
}

fn manifest(hooks: &str) -> Manifest {
    Manifest::from_json(
        &format!(r#"{{"schema_version": 1, "files": [], "hooks": {{"post": {hooks}}}}}"#),
        "forge.json",
    )
    .unwrap()
}

fn context(pairs: &[(&str, &str)]) -> Context {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[cfg(unix)]
#[test]
fn test_hooks_run_in_destination() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = manifest(r#"[["touch", "{{ project_name }}.marker"]]"#);
    let prompt = ScriptedPrompter::new(&[]);

    run_post_hooks(
        &MiniJinjaRenderer::new(),
        &prompt,
        &manifest,
        temp_dir.path(),
        &context(&[("project_name", "demo")]),
        true,
    )
    .unwrap();

    assert!(temp_dir.path().join("demo.marker").exists());
    assert!(prompt.asked.borrow().is_empty());
}

#[cfg(unix)]
#[test]
fn test_declined_hook_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = manifest(r#"[["touch", "first"], ["touch", "second"]]"#);
    let prompt = ScriptedPrompter::new(&[false, true]);

    run_post_hooks(&MiniJinjaRenderer::new(), &prompt, &manifest, temp_dir.path(), &Context::new(), false)
        .unwrap();

    assert!(!temp_dir.path().join("first").exists());
    assert!(temp_dir.path().join("second").exists());
    assert_eq!(prompt.asked.borrow().len(), 2);
    assert!(prompt.asked.borrow()[0].contains("touch first"));
}

#[cfg(unix)]
#[test]
fn test_failing_hook_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = manifest(r#"[["false"]]"#);
    let prompt = ScriptedPrompter::new(&[]);

    let result =
        run_post_hooks(&MiniJinjaRenderer::new(), &prompt, &manifest, temp_dir.path(), &Context::new(), true);
    assert!(matches!(result, Err(Error::HookFailed { .. })));
}

#[test]
fn test_missing_hook_command() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = manifest(r#"[["forge-definitely-not-a-command", "--version"]]"#);
    let prompt = ScriptedPrompter::new(&[]);

    let result =
        run_post_hooks(&MiniJinjaRenderer::new(), &prompt, &manifest, temp_dir.path(), &Context::new(), true);
    match result {
        Err(Error::HookCommandNotFound { command }) => {
            assert_eq!(command, "forge-definitely-not-a-command")
        }
        other => panic!("Expected HookCommandNotFound, got {other:?}"),
    }
}

#[test]
fn test_hook_argument_with_undefined_variable() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = manifest(r#"[["echo", "{{ nope }}"]]"#);
    let prompt = ScriptedPrompter::new(&[]);

    let result =
        run_post_hooks(&MiniJinjaRenderer::new(), &prompt, &manifest, temp_dir.path(), &Context::new(), true);
    assert!(matches!(result, Err(Error::MinijinjaError(_))));
}
