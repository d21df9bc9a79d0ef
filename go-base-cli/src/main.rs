use std::path::PathBuf;

use clap::{Parser, Subcommand};
use go_base_cli::commands::init::{self, InitOptions, ProjectKind};
use go_base_cli::commands::upgrade;
use go_base_core::{SystemRunner, ToolConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "go-base",
    version,
    about = "Go-Base CLI: initialize go-zero projects with the go-base framework"
)]
struct Cli {
    /// Config file (default: ~/.go-base/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (same as GO_BASE_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new go-zero project with go-base
    Init {
        /// Project name (letters, digits and underscores; prompted when omitted)
        name: Option<String>,
        /// Single-service project type instead of the gateway + ping layout
        #[arg(long = "type", value_enum)]
        kind: Option<ProjectKind>,
    },
    /// Upgrade go-base CLI tool to the latest release of its major version
    Upgrade,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "go_base=debug,go_base_cli=debug,go_base_core=debug"
    } else {
        "go_base=info,go_base_cli=info,go_base_core=info"
    };
    let filter = EnvFilter::try_from_env("GO_BASE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = ToolConfig::load(cli.config.as_deref()).and_then(|config| {
        let runner = SystemRunner;
        match cli.command {
            Commands::Init { name, kind } => init::run(
                &runner,
                &config,
                InitOptions {
                    name,
                    kind,
                    interactive: init::is_interactive(),
                },
            ),
            Commands::Upgrade => upgrade::run(&runner, &config),
        }
    });

    if let Err(e) = result {
        eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
        std::process::exit(1);
    }
}
