//! Template management use cases: import, export and resetting to defaults

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::application::{ApplicationError, Prompter};
use crate::core::error::{Error, Result};
use crate::core::repository::SnapshotStore;
use crate::core::store::{ImportSummary, TemplateStore};
use crate::core::template::Template;

/// Parse an import payload into candidate records.
///
/// Text that is not JSON at all is a parse error; JSON that is not an array is a
/// consistency error. Individual records are checked later by the store.
pub fn parse_import_payload(raw: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::consistency(format!(
            "import file must contain a JSON array of templates, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Serialize templates in the export file format.
pub fn render_export(templates: &[Template]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(templates)?;
    json.push('\n');
    Ok(json)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Use case for importing templates from a JSON file
pub struct ImportTemplatesUseCase<'a, S: SnapshotStore> {
    store: &'a mut TemplateStore<S>,
}

impl<'a, S: SnapshotStore> ImportTemplatesUseCase<'a, S> {
    pub fn new(store: &'a mut TemplateStore<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&mut self, path: &Path) -> std::result::Result<ImportSummary, ApplicationError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|source| ApplicationError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        self.execute_str(&raw).inspect(|summary| {
            info!(path = %path.display(), added = summary.added, "Imported template file");
        })
    }

    pub fn execute_str(&mut self, raw: &str) -> std::result::Result<ImportSummary, ApplicationError> {
        let candidates = parse_import_payload(raw)?;
        Ok(self.store.import_batch(candidates)?)
    }
}

/// Use case for exporting the whole collection
pub struct ExportTemplatesUseCase<'a, S: SnapshotStore> {
    store: &'a TemplateStore<S>,
}

impl<'a, S: SnapshotStore> ExportTemplatesUseCase<'a, S> {
    pub fn new(store: &'a TemplateStore<S>) -> Self {
        Self { store }
    }

    /// Pretty-printed JSON array of every template in stored order.
    pub fn execute(&self) -> std::result::Result<String, ApplicationError> {
        Ok(render_export(&self.store.export_all())?)
    }

    /// Write the export to `path`, creating parent directories as needed.
    pub async fn execute_to_file(&self, path: &Path) -> std::result::Result<usize, ApplicationError> {
        let json = self.execute()?;
        let write_err = |source: std::io::Error| ApplicationError::WriteFile {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        fs::write(path, json).await.map_err(write_err)?;

        let count = self.store.len();
        info!(path = %path.display(), count, "Exported templates");
        Ok(count)
    }
}

/// Use case for replacing the collection with the bundled defaults
pub struct ResetDefaultsUseCase<'a, S: SnapshotStore> {
    store: &'a mut TemplateStore<S>,
}

impl<'a, S: SnapshotStore> ResetDefaultsUseCase<'a, S> {
    pub fn new(store: &'a mut TemplateStore<S>) -> Self {
        Self { store }
    }

    /// Replace everything with `defaults` once the user agrees.
    ///
    /// Returns `false` without touching the store when the confirmation is declined.
    /// `assume_yes` skips the question.
    pub fn execute<P: Prompter>(
        &mut self,
        defaults: Vec<Template>,
        prompter: &mut P,
        assume_yes: bool,
    ) -> std::result::Result<bool, ApplicationError> {
        if !assume_yes {
            let question = format!(
                "Replace all {} templates with the {} default templates? This cannot be undone",
                self.store.len(),
                defaults.len()
            );
            if !prompter.confirm(&question)? {
                return Ok(false);
            }
        }

        self.store.reset_to_defaults(defaults)?;
        Ok(true)
    }
}

/// Use case for deleting a template after confirmation
pub struct DeleteTemplateUseCase<'a, S: SnapshotStore> {
    store: &'a mut TemplateStore<S>,
}

impl<'a, S: SnapshotStore> DeleteTemplateUseCase<'a, S> {
    pub fn new(store: &'a mut TemplateStore<S>) -> Self {
        Self { store }
    }

    /// Delete `id` once the user agrees; returns the removed template, or `None` if
    /// the confirmation was declined.
    pub fn execute<P: Prompter>(
        &mut self,
        id: &str,
        prompter: &mut P,
        assume_yes: bool,
    ) -> std::result::Result<Option<Template>, ApplicationError> {
        let name = self
            .store
            .get(id)
            .map(|t| t.name.clone())
            .ok_or_else(|| Error::template_not_found(id))?;

        if !assume_yes && !prompter.confirm(&format!("Delete template \"{name}\"?"))? {
            return Ok(None);
        }

        Ok(Some(self.store.delete(id)?))
    }
}

/// Default export file name for a given directory
pub fn default_export_path(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("prompt-templates-{stamp}.json"))
}
