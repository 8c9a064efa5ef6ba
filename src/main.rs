//! Pagescout - interactive element mapping for web pages
//!
//! Main entry point for the CLI application.

use anyhow::Context;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use pagescout::cli::{config_command, models_text, schema_text, ConfigAction};
use pagescout::core::{logging, UrlSource};
use pagescout::{execute, AgentBrowserSession, Config};

/// Pagescout - map the interactive elements of a web page with an LLM
#[derive(Parser, Debug)]
#[command(name = "pagescout")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,

    /// More output (-v debug)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the extraction workflow (default)
    Run(RunArgs),
    /// Print the JSON schema sent to the model
    Schema,
    /// List models of the configured provider
    Models,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the default config file
    Init,
    /// Print the config file path
    Path,
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// Target URL (otherwise read from the URL environment variable)
    #[arg(long, conflicts_with = "url_env")]
    url: Option<String>,

    /// Environment variable holding the target URL
    #[arg(long, value_name = "VAR")]
    url_env: Option<String>,

    /// Model identifier, e.g. google/gemini-2.0-flash or ollama/qwen3:8b
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// agent-browser session name
    #[arg(long)]
    session: Option<String>,

    /// Write extracted records to this JSON file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Replace the built-in extraction instruction
    #[arg(long)]
    instruction: Option<String>,
}

impl RunArgs {
    /// Apply CLI overrides
    fn apply(self, config: &mut Config) {
        if let Some(value) = self.url {
            config.workflow.url = UrlSource::Literal { value };
        } else if let Some(var) = self.url_env {
            config.workflow.url = UrlSource::Env { var };
        }

        if let Some(model) = self.model {
            config.model.name = model;
        }

        if self.headed {
            config.browser.headed = true;
        }

        if let Some(session) = self.session {
            config.browser.session_name = session;
        }

        if let Some(output) = self.output {
            config.workflow.output = Some(output);
        }

        if let Some(instruction) = self.instruction {
            config.workflow.instruction = Some(instruction);
        }
    }
}

async fn run_workflow(mut config: Config, run: RunArgs) -> anyhow::Result<i32> {
    run.apply(&mut config);

    let result = execute(&config, AgentBrowserSession::new).await;
    println!(
        "Execution result: {}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );

    Ok(result.exit_code())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let config = Config::load();

    let verbose = if args.quiet {
        0
    } else if args.verbose > 0 {
        args.verbose.saturating_add(1)
    } else {
        config.logging.verbose
    };
    logging::init(verbose);

    match args.command {
        Some(Command::Schema) => println!("{}", schema_text()?),
        Some(Command::Models) => println!("{}", models_text(&config).await?),
        Some(Command::Config { action }) => {
            let action = match action {
                ConfigCommand::Show => ConfigAction::Show,
                ConfigCommand::Init => ConfigAction::Init,
                ConfigCommand::Path => ConfigAction::Path,
            };
            println!("{}", config_command(action, &config)?);
        }
        Some(Command::Run(run)) => std::process::exit(run_workflow(config, run).await?),
        None => std::process::exit(run_workflow(config, args.run).await?),
    }

    Ok(())
}
