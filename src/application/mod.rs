//! Application layer - orchestrates use cases on top of the template store

pub mod errors;
pub mod generate_prompt;
pub mod list_view;
pub mod template_management;
#[cfg(test)]
pub(crate) mod testing;
pub mod traits;

pub use errors::*;
pub use generate_prompt::*;
pub use list_view::*;
pub use template_management::*;
pub use traits::*;
