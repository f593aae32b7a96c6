//! Prompt template records and identity assignment.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{Error, Result};

/// A stored prompt template.
///
/// Fields the application does not know about (for example ones written by a newer
/// version, or hand-added to an import file) are kept in `extra` and written back
/// unchanged on every save and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Opaque identifier, unique within a collection and never reassigned
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional description, empty when not given
    #[serde(default)]
    pub desc: String,
    /// Template body containing `[placeholder]` spans
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Template {
    /// Build a template from user-entered fields.
    ///
    /// `name` and `desc` are trimmed, `content` is kept verbatim but must contain
    /// something other than whitespace.
    pub fn new(id: String, name: &str, desc: &str, content: &str) -> Result<Self> {
        let fields = TemplateFields::validate(name, desc, content)?;
        Ok(Self {
            id,
            name: fields.name,
            desc: fields.desc,
            content: fields.content,
            extra: Map::new(),
        })
    }

    /// Replace the editable fields, keeping `id` and any extra fields.
    pub(crate) fn apply(&mut self, fields: TemplateFields) {
        self.name = fields.name;
        self.desc = fields.desc;
        self.content = fields.content;
    }

    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.desc.to_lowercase().contains(needle)
    }

    /// Convert an import candidate into a template.
    ///
    /// Returns `None` unless the candidate is an object whose `id`, `name` and
    /// `content` are non-empty strings (and whose `desc`, if present, is a string).
    pub fn from_candidate(candidate: Value) -> Option<Self> {
        let object = candidate.as_object()?;
        let required_present = ["id", "name", "content"].iter().all(|key| {
            object
                .get(*key)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty())
        });
        if !required_present {
            return None;
        }
        serde_json::from_value(candidate).ok()
    }
}

/// Validated user input for create and update.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TemplateFields {
    pub name: String,
    pub desc: String,
    pub content: String,
}

impl TemplateFields {
    pub fn validate(name: &str, desc: &str, content: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("template name cannot be empty"));
        }
        if content.trim().is_empty() {
            return Err(Error::validation("template content cannot be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            desc: desc.trim().to_string(),
            content: content.to_string(),
        })
    }
}

/// Generate a fresh template id.
///
/// The millisecond timestamp keeps ids roughly creation-ordered; the random suffix
/// makes two ids minted in the same millisecond distinct.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..8])
}
