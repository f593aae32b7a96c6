//! Terminal prompter backed by `dialoguer`

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, Input, Select};

use crate::application::{ApplicationError, Prompter};

/// Interactive prompts on the controlling terminal.
///
/// Everything goes to stderr so stdout only ever carries the generated prompt or
/// an export.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Prompt(e.to_string())
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, label: &str, initial: &str) -> Result<String, ApplicationError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)
    }

    fn confirm(&mut self, question: &str) -> Result<bool, ApplicationError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn edit(&mut self, text: &str) -> Result<String, ApplicationError> {
        // Closing the editor without saving keeps the text as it was.
        let edited = Editor::new().edit(text).map_err(prompt_error)?;
        Ok(edited.unwrap_or_else(|| text.to_string()))
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, ApplicationError> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(prompt_error)
    }

    fn show(&mut self, text: &str) {
        eprintln!("\n----- preview -----\n{text}\n-------------------\n");
    }
}
