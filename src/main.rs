//! Volume Manager Plugin CLI
//!
//! Validates a storage model document and prints the configuration tasks
//! that would converge its nodes.
//!
//! ```text
//! volmgr validate --model model.yaml
//! volmgr plan --model model.yaml --output json
//! volmgr schema
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use volmgr::{
    ModelDocument, PluginConfig, Result, TaskEntry, ValidationError, VolMgrPlugin,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Volume Manager Plugin - storage model validation and task planning
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Plugin configuration file (YAML)
    #[arg(long, global = true, env = "VOLMGR_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a model document
    Validate {
        /// Model document (YAML)
        #[arg(long, env = "VOLMGR_MODEL")]
        model: PathBuf,
    },
    /// Validate a model document and print the tasks it needs
    Plan {
        /// Model document (YAML)
        #[arg(long, env = "VOLMGR_MODEL")]
        model: PathBuf,
    },
    /// Print the JSON schema of model documents
    Schema,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Serialize)]
struct ValidationReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    valid: bool,
    errors: &'a [ValidationError],
}

#[derive(Serialize)]
struct PlanReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    tasks: &'a [TaskEntry],
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    match &args.command {
        Command::Schema => {
            let schema = ModelDocument::json_schema()?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { model } => {
            let plugin = load_plugin(args)?;
            let errors = validate(&plugin, model)?.1;
            print_validation(args.output, &errors)?;
            Ok(exit_for(&errors))
        }
        Command::Plan { model } => {
            let plugin = load_plugin(args)?;
            let (snapshot, errors) = validate(&plugin, model)?;
            if !errors.is_empty() {
                print_validation(args.output, &errors)?;
                return Ok(exit_for(&errors));
            }

            let tasks = plugin.create_configuration(&snapshot);
            print_plan(args.output, &tasks)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_plugin(args: &Args) -> Result<VolMgrPlugin> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            PluginConfig::from_path(path)?
        }
        None => PluginConfig::default(),
    };
    VolMgrPlugin::new(config)
}

/// Property checks followed by the full rule pass
fn validate(
    plugin: &VolMgrPlugin,
    path: &Path,
) -> Result<(volmgr::ModelSnapshot, Vec<ValidationError>)> {
    info!("Loading model from {}", path.display());
    let document = ModelDocument::from_path(path)?;
    let snapshot = document.build()?;

    let mut errors = document.check_properties();
    errors.extend(plugin.validate_model(&snapshot));
    Ok((snapshot, errors))
}

fn exit_for(errors: &[ValidationError]) -> ExitCode {
    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_validation(format: OutputFormat, errors: &[ValidationError]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = ValidationReport {
                generated_at: chrono::Utc::now(),
                valid: errors.is_empty(),
                errors,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text if errors.is_empty() => println!("Model is valid"),
        OutputFormat::Text => {
            for error in errors {
                println!("{}", error);
            }
            println!("{} validation error(s)", errors.len());
        }
    }
    Ok(())
}

fn print_plan(format: OutputFormat, tasks: &[TaskEntry]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = PlanReport {
                generated_at: chrono::Utc::now(),
                tasks,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for (i, entry) in tasks.iter().enumerate() {
                match entry {
                    TaskEntry::Single(task) => println!("{:>3}. {}", i + 1, task),
                    TaskEntry::Ordered(list) => {
                        println!("{:>3}. ordered ({})", i + 1, list.item_path);
                        for task in &list.tasks {
                            println!("       -> {}", task);
                        }
                    }
                }
            }
            println!("{} task entries", tasks.len());
        }
    }
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
