//! User input and interaction handling.
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};
use log::warn;
use std::io::ErrorKind;

/// Source of interactive answers.
pub trait Prompter {
    /// Asks a yes/no question. Returns `true` without asking when `skip` is set.
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool>;

    /// Asks for a free-form value, offering `default` when present.
    fn input(&self, prompt: String, default: Option<String>) -> Result<String>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }

        let answer = Confirm::new().with_prompt(prompt.as_str()).default(false).interact();
        declined_without_terminal(answer, &prompt)
    }

    fn input(&self, prompt: String, default: Option<String>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default);
        }
        input.interact_text().map_err(Error::DialoguerError)
    }
}

/// Treats a confirmation that could not be asked, because there is no
/// terminal, as a "no".
fn declined_without_terminal(answer: dialoguer::Result<bool>, prompt: &str) -> Result<bool> {
    match answer {
        Err(dialoguer::Error::IO(e)) if e.kind() == ErrorKind::NotConnected => {
            warn!("No terminal to confirm '{prompt}'; treating it as declined.");
            Ok(false)
        }
        answer => answer.map_err(Error::DialoguerError),
    }
}
