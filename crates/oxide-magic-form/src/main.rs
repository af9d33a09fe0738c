//! oxide-magic-form CLI
//!
//! Command-line tool for rendering form schemas and dry-running submissions.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

use oxide_magic_form::{FormData, FormOptions, FormRenderer, FormSchema};

/// Schema-driven Bootstrap 5 forms.
#[derive(Parser)]
#[command(name = "oxide-magic-form")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema to HTML.
    Render {
        /// Schema JSON file.
        schema: PathBuf,

        /// Initial values JSON file.
        #[arg(long)]
        values: Option<PathBuf>,

        /// Form heading.
        #[arg(short, long, default_value = "Form")]
        title: String,

        /// Submit button label.
        #[arg(short, long, default_value = "Submit")]
        button: String,

        /// Wrap the form in a dialog with this trigger label.
        #[arg(long)]
        modal: Option<String>,
    },

    /// Validate values against a schema and print what would be submitted.
    Submit {
        /// Schema JSON file.
        schema: PathBuf,

        /// Values JSON file.
        #[arg(long)]
        values: PathBuf,
    },
}

fn load_values(schema: &FormSchema, path: &Path) -> anyhow::Result<FormData> {
    let json = std::fs::read_to_string(path)?;
    Ok(FormData::from_json(schema, &json)?)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render {
            schema,
            values,
            title,
            button,
            modal,
        } => {
            let form_schema = FormSchema::from_file(&schema)?;
            debug!(path = %schema.display(), groups = form_schema.groups().len(), "Loaded schema");

            let mut options = FormOptions::new().title(title).submit_label(button);
            if let Some(trigger) = modal {
                options = options.modal(trigger);
            }

            let mut form = FormRenderer::new(form_schema, options);
            if let Some(path) = values {
                let initial = load_values(form.schema(), &path)?;
                form.set_initial_values(&initial)?;
            }
            println!("{}", form.render());
        }

        Commands::Submit { schema, values } => {
            let form_schema = FormSchema::from_file(&schema)?;
            let data = load_values(&form_schema, &values)?;

            let submitted = Rc::new(RefCell::new(None));
            let sink = Rc::clone(&submitted);
            let mut form = FormRenderer::new(form_schema, FormOptions::default())
                .on_submit(move |data| *sink.borrow_mut() = Some(data.to_json()));
            form.set_initial_values(&data)?;

            if !form.handle_submit() {
                for (field, message) in form.errors().all_errors() {
                    warn!(field = %field, "{message}");
                }
                return Ok(ExitCode::FAILURE);
            }

            if let Some(json) = submitted.borrow_mut().take() {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            info!("Submission accepted.");
        }
    }

    Ok(ExitCode::SUCCESS)
}
