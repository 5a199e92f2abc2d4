use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gitflow::cli::{self, Orchestrator};
use gitflow::config;
use gitflow::domain::BumpKind;
use gitflow::notify::{self, ConsoleNotifier};
use gitflow::ui;

#[derive(Parser)]
#[command(
    name = "gitflow",
    version,
    about = "Start and finish feature, hotfix and release branches"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More diagnostic output (-vv for trace)")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current branch and working-tree status
    Info,
    /// Pull the current branch
    Update,
    /// Create a feature branch from development
    StartFeature,
    /// Bump, commit and request the merge of a feature into development
    FinishFeature,
    /// Create a hotfix branch from master
    StartHotfix,
    /// Bump the patch version, commit and request the merge of a hotfix into master
    FinishHotfix,
    /// Create a release branch from development
    StartRelease,
    /// Bump, commit and request the merge of a release into master
    FinishRelease,
    /// Build, stage everything and commit with a conventional message
    Commit,
    /// Bump the project version
    Bump {
        /// major, minor, patch, alpha, beta, release, hotfix, feature, dev or a version
        #[arg(short = 't', long = "type", default_value = "dev")]
        kind: String,
    },
    /// Print the project version
    Version,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "gitflow=debug",
        _ => "gitflow=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            cli::report_failure(&e, &ConsoleNotifier);
            std::process::exit(1);
        }
    };
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    let deps = match cli::connect(&config, &cwd) {
        Ok(deps) => deps,
        Err(e) => {
            cli::report_failure(&e, notify::from_config(&config.notifications).as_ref());
            std::process::exit(1);
        }
    };
    let notifier = deps.notifier.clone();
    let flow = Orchestrator::from_config(deps, &config);

    if let Err(e) = run(&flow, args.command, config.project_name.as_deref()).await {
        cli::report_failure(&e, notifier.as_ref());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    flow: &Orchestrator,
    command: Command,
    project_name: Option<&str>,
) -> gitflow::Result<()> {
    match command {
        Command::Info => ui::display_state(&flow.info().await?),
        Command::Update => print!("{}", flow.update().await?),
        Command::StartFeature => {
            flow.start_feature().await?;
        }
        Command::FinishFeature => {
            flow.finish_feature().await?;
        }
        Command::StartHotfix => {
            flow.start_hotfix().await?;
        }
        Command::FinishHotfix => {
            flow.finish_hotfix().await?;
        }
        Command::StartRelease => {
            flow.start_release().await?;
        }
        Command::FinishRelease => {
            flow.finish_release().await?;
        }
        Command::Commit => {
            flow.commit().await?;
        }
        Command::Bump { kind } => {
            let kind: BumpKind = kind.parse()?;
            let version = flow.bump(&kind)?;
            if kind.is_mutating() {
                ui::display_success(&format!("Version bumped to {}", version));
            }
        }
        Command::Version => println!("{}", flow.version_line(project_name)?),
    }
    Ok(())
}
