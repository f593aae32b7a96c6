//! Port interfaces for the application layer

use crate::application::ApplicationError;

/// Interactive input from whoever is driving the application.
///
/// The terminal implementation lives in `infrastructure::prompter`; tests script the
/// answers instead.
pub trait Prompter {
    /// Ask for a line of text, pre-filled with `initial`. Empty answers are allowed.
    fn input(&mut self, label: &str, initial: &str) -> Result<String, ApplicationError>;

    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, question: &str) -> Result<bool, ApplicationError>;

    /// Let the user edit `text` freely and return the result.
    fn edit(&mut self, text: &str) -> Result<String, ApplicationError>;

    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, ApplicationError>;

    /// Show the current preview.
    fn show(&mut self, text: &str);
}
