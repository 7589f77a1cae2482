//! tinyapp demo
//!
//! A small application showing the pieces working together: services in the
//! container, two controllers, MiniJinja templates with a debug fallback and
//! the interactive shell.
//!
//! ```text
//! tinyapp hello Ada            # run one action
//! tinyapp debug:dump 1 '[2]'   # rendered as a tree
//! tinyapp -t ./templates       # start the shell with extra templates
//! ```

mod controllers;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use tinyapp::logging;
use tinyapp::prelude::*;

use crate::controllers::{debug_controller, main_controller, GREETING_KEY};

/// Templates shipped with the demo.
const BUNDLED_TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// tinyapp demo - run an action, or start a shell without one
#[derive(Parser, Debug)]
#[command(name = "tinyapp")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Additional template directory (repeatable)
    #[arg(short = 't', long = "templates", value_name = "DIR")]
    templates: Vec<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Action to run, as [controller:]action
    #[arg(value_name = "ACTION")]
    action: Option<String>,

    /// Arguments for the action
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if config.templates.postfix.is_empty() {
        config.templates.postfix = ".j2".to_string();
    }
    config
        .templates
        .directories
        .extend(cli.templates.iter().cloned());
    if Path::new(BUNDLED_TEMPLATES).is_dir() {
        config
            .templates
            .directories
            .push(PathBuf::from(BUNDLED_TEMPLATES));
    }
    Ok(config)
}

fn build_app(config: &AppConfig) -> anyhow::Result<App> {
    let renderer_config = config.clone();
    let app = App::builder()
        .service(GREETING_KEY, "Hello".to_string())
        .controller(main_controller())
        .controller(debug_controller())
        .renderer_factory(move |_| {
            let engine = renderer_config
                .build_renderer()?
                .with_observer(|err, template, _data, engine| {
                    tracing::debug!(engine = engine.name(), template, error = %err, "fell through");
                });
            Ok(Rc::new(engine) as SharedEngine)
        })
        .build()?;
    Ok(app)
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli)?;
    tracing::debug!(directories = ?config.templates.directories, "template directories");
    let app = build_app(&config)?;

    match &cli.action {
        Some(action) => match app.run(action, cli.args.clone()) {
            Ok(result) => {
                app.stdout(&result.to_string());
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                app.stderr(&format!("Error: {:#}", anyhow::Error::from(err)));
                Ok(ExitCode::FAILURE)
            }
        },
        None => {
            let mut shell = Shell::new(&app);
            if let Some(prompt) = &config.prompt {
                shell = shell.prompt(prompt.clone());
            }
            let ran = shell.run()?;
            tracing::info!(ran, "shell finished");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}
