//! Scripted [`Prompter`] for unit tests

use std::collections::VecDeque;

use crate::application::{ApplicationError, Prompter};

/// Replays queued answers; running out of answers is a prompt error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    inputs: VecDeque<String>,
    confirms: VecDeque<bool>,
    edits: VecDeque<String>,
    selections: VecDeque<usize>,
    pub shown: Vec<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, answer: &str) -> Self {
        self.inputs.push_back(answer.to_string());
        self
    }

    pub fn confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    pub fn edit(mut self, answer: &str) -> Self {
        self.edits.push_back(answer.to_string());
        self
    }

    pub fn select(mut self, index: usize) -> Self {
        self.selections.push_back(index);
        self
    }

    fn exhausted(kind: &str, prompt: &str) -> ApplicationError {
        ApplicationError::Prompt(format!("no scripted {kind} answer for \"{prompt}\""))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, label: &str, _initial: &str) -> Result<String, ApplicationError> {
        self.asked.push(label.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| Self::exhausted("input", label))
    }

    fn confirm(&mut self, question: &str) -> Result<bool, ApplicationError> {
        self.asked.push(question.to_string());
        self.confirms
            .pop_front()
            .ok_or_else(|| Self::exhausted("confirm", question))
    }

    fn edit(&mut self, text: &str) -> Result<String, ApplicationError> {
        self.edits
            .pop_front()
            .ok_or_else(|| Self::exhausted("edit", text))
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, ApplicationError> {
        self.asked.push(prompt.to_string());
        let index = self
            .selections
            .pop_front()
            .ok_or_else(|| Self::exhausted("select", prompt))?;
        if index >= items.len() {
            return Err(ApplicationError::Prompt(format!(
                "scripted selection {index} out of range for \"{prompt}\""
            )));
        }
        Ok(index)
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}
