//! Default template set bundled into the binary

use crate::core::error::Result;
use crate::core::template::Template;

/// Raw JSON of the bundled defaults, in the same array shape as an export file
pub const DEFAULT_TEMPLATES_JSON: &str = include_str!("../../assets/default_templates.json");

/// Parse the bundled default set.
pub fn default_templates() -> Result<Vec<Template>> {
    Ok(serde_json::from_str(DEFAULT_TEMPLATES_JSON)?)
}
