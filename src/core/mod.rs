//! Core domain: templates, the ordered store and the placeholder engine.

pub mod config;
pub mod error;
pub mod placeholder;
pub mod repository;
pub mod session;
pub mod store;
pub mod template;

pub use error::{Error, ErrorKind, Result};
pub use repository::SnapshotStore;
pub use session::{Mode, ParameterSession};
pub use store::{ImportSummary, TemplateStore};
pub use template::Template;
