//! promptdeck: reusable prompt templates with `[bracketed]` placeholders.
//!
//! The library is split the same way the binary uses it:
//!
//! - [`core`] holds the ordered [`TemplateStore`](core::TemplateStore), the
//!   placeholder scanner and [`ParameterSession`](core::ParameterSession).
//! - [`application`] holds the use cases the CLI drives (import, export, generate,
//!   filtered list view).
//! - [`infrastructure`] holds the JSON file and in-memory snapshot stores, the bundled
//!   default templates and the terminal prompter.
//!
//! # Example
//!
//! ```
//! use promptdeck::core::{ParameterSession, TemplateStore};
//! use promptdeck::infrastructure::MemoryStore;
//!
//! let mut store = TemplateStore::open(MemoryStore::new(), None).unwrap();
//! let id = store.create("Translate", "", "Translate into [language]: [text]").unwrap();
//!
//! let mut session = ParameterSession::new(store.get(&id).unwrap().content.clone());
//! session.set_value("language", "French").unwrap();
//! session.set_value("text", "good morning").unwrap();
//! assert_eq!(session.rendered(), "Translate into French: good morning");
//! ```
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod infrastructure;
