//! promptdeck CLI entrypoint
//! Parses command-line arguments and dispatches to the template store and use cases.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use promptdeck::application::{
    DeleteTemplateUseCase, ExportTemplatesUseCase, GeneratePromptRequest, GeneratePromptUseCase,
    ImportTemplatesUseCase, ListView, ResetDefaultsUseCase,
};
use promptdeck::core::config::{Config, ConfigSources, STORE_ENV};
use promptdeck::core::placeholder::{extract_placeholders, token};
use promptdeck::core::{Mode, TemplateStore};
use promptdeck::infrastructure::{JsonFileStore, TerminalPrompter, default_templates};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

type Store = TemplateStore<JsonFileStore>;

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Template store file (overrides PROMPTDECK_STORE and the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List templates in stored order
    List {
        /// Only show templates whose name or description contains this text
        #[arg(long, short)]
        filter: Option<String>,
    },
    /// Show one template with its placeholders
    Show {
        id: String,
    },
    /// List the placeholders of a template, one per line
    Placeholders {
        id: String,
    },
    /// Add a new template at the top of the list
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        desc: String,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Edit a template; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Delete a template
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Move a template to a 1-based position in the list
    Move {
        id: String,
        #[arg(long)]
        to: usize,
    },
    /// Put the list in the given order; every id must be listed exactly once
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Export every template as a pretty-printed JSON array
    Export {
        /// Output file, or a directory for a timestamped file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import templates from a JSON array file, appending them to the list
    Import {
        path: PathBuf,
    },
    /// Replace every template with the bundled default set
    ResetDefaults {
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Fill in a template's placeholders and print the result
    Generate {
        id: String,
        /// Placeholder value as NAME=VALUE; repeatable. Write `=` inside NAME as `\=`
        #[arg(long = "set", value_parser = parse_key_val)]
        values: Vec<(String, String)>,
        /// Never prompt; unset placeholders become empty
        #[arg(long)]
        no_prompt: bool,
        /// Open the result in $EDITOR before printing it
        #[arg(long)]
        edit: bool,
        /// Review the preview and change values or edit before finishing
        #[arg(long)]
        review: bool,
        /// Write the result to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Template body; use `-` to read it from stdin
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Read the template body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
}

/// Split `NAME=VALUE` at the first unescaped `=`.
///
/// In the name, `\=` stands for a literal `=` and `\\` for a backslash; any other
/// backslash is kept as-is. The value is taken verbatim.
fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let mut name = String::new();
    let mut chars = raw.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '=' => return Ok((name, raw[index + 1..].to_string())),
            '\\' => match chars.clone().next() {
                Some((_, next @ ('=' | '\\'))) => {
                    name.push(next);
                    chars.next();
                }
                _ => name.push(c),
            },
            _ => name.push(c),
        }
    }
    Err(format!("expected NAME=VALUE, got `{raw}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries prompts and exports
    let default_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::resolve(ConfigSources {
        config_file: cli.config.clone(),
        env_store: std::env::var_os(STORE_ENV).map(PathBuf::from),
        cli_store: cli.store.clone(),
    })
    .context("Failed to load configuration")?;
    debug!(store = %config.store_path.display(), "Starting promptdeck");

    let seed = if config.seed_defaults {
        Some(default_templates().context("Bundled default templates are invalid")?)
    } else {
        None
    };
    let mut store = TemplateStore::open(JsonFileStore::new(&config.store_path), seed)
        .with_context(|| format!("Failed to open template store {}", config.store_path.display()))?;

    match cli.command {
        Commands::List { filter } => list_templates(&store, filter.as_deref()),
        Commands::Show { id } => show_template(&store, &id)?,
        Commands::Placeholders { id } => {
            let template = store
                .get(&id)
                .with_context(|| format!("Template not found: {id}"))?;
            for name in extract_placeholders(&template.content) {
                println!("{name}");
            }
        }
        Commands::Add {
            name,
            desc,
            content,
        } => {
            let content = content
                .read()?
                .context("Template content is required: pass --content or --content-file")?;
            let id = store
                .create(&name, &desc, &content)
                .context("Failed to add template")?;
            println!("{id}");
        }
        Commands::Edit {
            id,
            name,
            desc,
            content,
        } => edit_template(&mut store, &id, name, desc, content)?,
        Commands::Delete { id, yes } => {
            let removed = DeleteTemplateUseCase::new(&mut store)
                .execute(&id, &mut TerminalPrompter::new(), yes)
                .context("Failed to delete template")?;
            match removed {
                Some(template) => eprintln!("Deleted \"{}\"", template.name),
                None => eprintln!("Kept \"{id}\""),
            }
        }
        Commands::Move { id, to } => {
            ListView::new()
                .move_to(&mut store, &id, to.saturating_sub(1))
                .context("Failed to move template")?;
            list_templates(&store, None);
        }
        Commands::Reorder { ids } => {
            ListView::new()
                .reorder(&mut store, &ids)
                .context("Failed to reorder templates")?;
            list_templates(&store, None);
        }
        Commands::Export { output } => export_templates(&store, output).await?,
        Commands::Import { path } => {
            let summary = ImportTemplatesUseCase::new(&mut store)
                .execute(&path)
                .await
                .with_context(|| format!("Failed to import {}", path.display()))?;
            println!(
                "Imported {} template(s) ({} with new ids, {} skipped)",
                summary.added, summary.reassigned, summary.skipped
            );
        }
        Commands::ResetDefaults { yes } => {
            let defaults = default_templates().context("Bundled default templates are invalid")?;
            let replaced = ResetDefaultsUseCase::new(&mut store)
                .execute(defaults, &mut TerminalPrompter::new(), yes)
                .context("Failed to reset templates")?;
            if replaced {
                println!("Restored {} default template(s)", store.len());
            } else {
                eprintln!("Templates left unchanged");
            }
        }
        Commands::Generate {
            id,
            values,
            no_prompt,
            edit,
            review,
            output,
        } => {
            let request = GeneratePromptRequest {
                template_id: id,
                presets: values,
                prompt_missing: !no_prompt && std::io::stdin().is_terminal(),
                edit,
                review,
            };
            let generated = GeneratePromptUseCase::new(&store)
                .execute(request, &mut TerminalPrompter::new())
                .context("Failed to generate prompt")?;
            if generated.placeholders.is_empty() {
                eprintln!("\"{}\" has no placeholders; output is the template as-is", generated.template_name);
            }
            if generated.mode == Mode::Manual {
                debug!("Output was edited manually");
            }
            write_output(&generated.text, output.as_deref()).await?;
        }
    }
    Ok(())
}

impl ContentArgs {
    /// Template body from `--content`, `--content -` (stdin) or `--content-file`
    fn read(&self) -> anyhow::Result<Option<String>> {
        match (&self.content, &self.content_file) {
            (Some(text), _) if text == "-" => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read template content from stdin")?;
                Ok(Some(buf))
            }
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("Failed to read {}", path.display())),
            (None, None) => Ok(None),
        }
    }
}

fn list_templates(store: &Store, filter: Option<&str>) {
    let view = ListView::new().with_filter(filter);
    let visible = view.visible(store);

    if visible.is_empty() {
        match view.filter() {
            Some(query) => println!("No templates match \"{query}\""),
            None => println!("No templates yet. Add one with `promptdeck add`."),
        }
        return;
    }

    for (index, template) in visible.iter().enumerate() {
        println!("{:>3}. {}  ({})", index + 1, template.name, template.id);
        if !template.desc.is_empty() {
            println!("     {}", template.desc);
        }
    }
    if view.is_filtered() {
        println!("\n{} of {} templates (filtered; positions are not reorderable)", visible.len(), store.len());
    }
}

fn show_template(store: &Store, id: &str) -> anyhow::Result<()> {
    let template = store
        .get(id)
        .with_context(|| format!("Template not found: {id}"))?;
    let placeholders = extract_placeholders(&template.content);

    println!("Name: {}", template.name);
    println!("Id: {}", template.id);
    if !template.desc.is_empty() {
        println!("Description: {}", template.desc);
    }
    if placeholders.is_empty() {
        println!("Placeholders: none");
    } else {
        let tokens: Vec<String> = placeholders.iter().map(|p| token(p)).collect();
        println!("Placeholders: {}", tokens.join(", "));
    }
    println!("\n{}", template.content);
    Ok(())
}

fn edit_template(
    store: &mut Store,
    id: &str,
    name: Option<String>,
    desc: Option<String>,
    content: ContentArgs,
) -> anyhow::Result<()> {
    let current = store
        .get(id)
        .with_context(|| format!("Template not found: {id}"))?
        .clone();
    let content = content.read()?.unwrap_or(current.content);

    store
        .update(
            id,
            name.as_deref().unwrap_or(&current.name),
            desc.as_deref().unwrap_or(&current.desc),
            &content,
        )
        .context("Failed to update template")?;
    info!(id = %id, "Template edited from CLI");
    eprintln!("Updated {id}");
    Ok(())
}

async fn export_templates(store: &Store, output: Option<PathBuf>) -> anyhow::Result<()> {
    let export = ExportTemplatesUseCase::new(store);
    match output {
        None => print!("{}", export.execute()?),
        Some(path) => {
            let path = if path.is_dir() {
                promptdeck::application::default_export_path(&path)
            } else {
                path
            };
            let count = export
                .execute_to_file(&path)
                .await
                .context("Failed to export templates")?;
            eprintln!("Exported {count} template(s) to {}", path.display());
        }
    }
    Ok(())
}

async fn write_output(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        None => println!("{text}"),
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote prompt to {}", path.display());
        }
    }
    Ok(())
}
