//! Parameter sessions: filling in one template's placeholders.
//!
//! A session is opened from a template body and lives for as long as the user is
//! generating from it. It is never persisted and never sees later edits to the store.

use indexmap::IndexMap;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::core::placeholder::{extract_placeholders, render};

/// How the session's output text is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Output is recomputed from the template body and the current values
    Auto,
    /// Output is whatever the user typed; values no longer affect it
    Manual,
}

/// State of one "generate" activation.
#[derive(Debug, Clone)]
pub struct ParameterSession {
    source_content: String,
    values: IndexMap<String, String>,
    mode: Mode,
    rendered: String,
}

impl ParameterSession {
    /// Open a session in auto mode with every placeholder set to the empty string.
    pub fn new(content: impl Into<String>) -> Self {
        let source_content = content.into();
        let values: IndexMap<String, String> = extract_placeholders(&source_content)
            .into_iter()
            .map(|name| (name, String::new()))
            .collect();
        let rendered = render(&source_content, &values);
        debug!(placeholders = values.len(), "Opened parameter session");

        Self {
            source_content,
            values,
            mode: Mode::Auto,
            rendered,
        }
    }

    pub fn source_content(&self) -> &str {
        &self.source_content
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current output text.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Placeholder names in first-occurrence order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn has_placeholders(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a placeholder's value and return the current output.
    ///
    /// In manual mode the value is remembered but the output is left alone.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<&str> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| Error::unknown_placeholder(name))?;
        *slot = value.into();

        if self.mode == Mode::Auto {
            self.rendered = render(&self.source_content, &self.values);
        }
        Ok(&self.rendered)
    }

    /// Switch between auto and manual mode and return the new mode.
    ///
    /// Entering manual mode keeps the current output as the editable text and never
    /// asks. Leaving it throws the manual text away, so `confirm` is called first and
    /// the session stays in manual mode unless it returns `true`.
    pub fn toggle_manual<F>(&mut self, confirm: F) -> Mode
    where
        F: FnOnce() -> bool,
    {
        match self.mode {
            Mode::Auto => {
                self.mode = Mode::Manual;
                debug!("Session switched to manual mode");
            }
            Mode::Manual => {
                if confirm() {
                    self.mode = Mode::Auto;
                    self.rendered = render(&self.source_content, &self.values);
                    debug!("Session switched back to auto mode");
                } else {
                    debug!("Return to auto mode declined");
                }
            }
        }
        self.mode
    }

    /// Replace the output text verbatim. Only valid in manual mode.
    pub fn set_manual_text(&mut self, text: impl Into<String>) -> Result<()> {
        if self.mode != Mode::Manual {
            return Err(Error::validation(
                "output can only be edited directly in manual mode",
            ));
        }
        self.rendered = text.into();
        Ok(())
    }
}
