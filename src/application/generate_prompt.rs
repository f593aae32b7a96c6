//! Use case for generating a prompt from a stored template

use tracing::{debug, info};

use crate::application::{ApplicationError, Prompter};
use crate::core::error::Error;
use crate::core::repository::SnapshotStore;
use crate::core::session::{Mode, ParameterSession};
use crate::core::store::TemplateStore;

/// Request to fill in a template
#[derive(Debug, Clone, Default)]
pub struct GeneratePromptRequest {
    pub template_id: String,
    /// Values given up front, e.g. from `--set name=value`
    pub presets: Vec<(String, String)>,
    /// Ask for every placeholder without a preset
    pub prompt_missing: bool,
    /// Open the result for manual editing before finishing
    pub edit: bool,
    /// Offer a review menu to change values, edit manually or return to auto mode
    pub review: bool,
}

/// Result of a generation session
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPrompt {
    pub template_name: String,
    pub placeholders: Vec<String>,
    pub mode: Mode,
    pub text: String,
}

const CHANGE_VALUE: &str = "Change a value";
const EDIT_MANUALLY: &str = "Edit the output manually";
const EDIT_AGAIN: &str = "Edit the output again";
const BACK_TO_AUTO: &str = "Regenerate from values (discards manual edits)";
const DONE: &str = "Done";

/// Use case for filling a template's placeholders and producing the final text
pub struct GeneratePromptUseCase<'a, S: SnapshotStore> {
    store: &'a TemplateStore<S>,
}

impl<'a, S: SnapshotStore> GeneratePromptUseCase<'a, S> {
    pub fn new(store: &'a TemplateStore<S>) -> Self {
        Self { store }
    }

    pub fn execute<P: Prompter>(
        &self,
        request: GeneratePromptRequest,
        prompter: &mut P,
    ) -> Result<GeneratedPrompt, ApplicationError> {
        // 1. Open a session on the template body
        let template = self
            .store
            .get(&request.template_id)
            .ok_or_else(|| Error::template_not_found(&request.template_id))?;
        let mut session = ParameterSession::new(template.content.clone());
        info!(id = %template.id, name = %template.name, "Generating prompt");

        // 2. Apply preset values; an unknown name is an error, not a silent no-op
        let mut answered = Vec::with_capacity(request.presets.len());
        for (name, value) in &request.presets {
            session.set_value(name, value.as_str())?;
            answered.push(name.as_str());
        }

        // 3. Ask for whatever is still missing
        if request.prompt_missing {
            let missing: Vec<String> = session
                .placeholders()
                .filter(|name| !answered.contains(name))
                .map(str::to_string)
                .collect();
            for name in missing {
                let value = prompter.input(&name, "")?;
                session.set_value(&name, value)?;
            }
        }

        // 4. Optional manual edit and review loop
        if request.edit {
            self.edit_manually(&mut session, prompter)?;
        }
        if request.review {
            self.review(&mut session, prompter)?;
        }

        Ok(GeneratedPrompt {
            template_name: template.name.clone(),
            placeholders: session.placeholders().map(str::to_string).collect(),
            mode: session.mode(),
            text: session.rendered().to_string(),
        })
    }

    fn edit_manually<P: Prompter>(
        &self,
        session: &mut ParameterSession,
        prompter: &mut P,
    ) -> Result<(), ApplicationError> {
        if session.mode() == Mode::Auto {
            session.toggle_manual(|| true);
        }
        let edited = prompter.edit(session.rendered())?;
        session.set_manual_text(edited)?;
        debug!("Output edited manually");
        Ok(())
    }

    fn review<P: Prompter>(
        &self,
        session: &mut ParameterSession,
        prompter: &mut P,
    ) -> Result<(), ApplicationError> {
        loop {
            prompter.show(session.rendered());

            let mut actions = Vec::with_capacity(4);
            if session.has_placeholders() {
                actions.push(CHANGE_VALUE);
            }
            match session.mode() {
                Mode::Auto => actions.push(EDIT_MANUALLY),
                Mode::Manual => {
                    actions.push(EDIT_AGAIN);
                    actions.push(BACK_TO_AUTO);
                }
            }
            actions.push(DONE);

            let labels: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
            match actions[prompter.select("What next?", &labels)?] {
                CHANGE_VALUE => {
                    let names: Vec<String> = session.placeholders().map(str::to_string).collect();
                    let name = &names[prompter.select("Which placeholder?", &names)?];
                    let current = session.value(name).unwrap_or_default().to_string();
                    let value = prompter.input(name, &current)?;
                    session.set_value(name, value)?;
                }
                EDIT_MANUALLY | EDIT_AGAIN => self.edit_manually(session, prompter)?,
                BACK_TO_AUTO => {
                    let confirmed =
                        prompter.confirm("Discard your manual edits and regenerate from the values?")?;
                    session.toggle_manual(|| confirmed);
                }
                _ => return Ok(()),
            }
        }
    }
}
