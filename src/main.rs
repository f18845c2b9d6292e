use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pocketcalc::ai::GeminiSolver;
use pocketcalc::calculator::{CalculatorState, parse_keys};
use pocketcalc::config::Config;
use pocketcalc::ui::{Session, render_display, run_repl};

#[derive(Parser)]
#[command(name = "pocketcalc")]
#[command(about = "A keypad calculator with history and an AI solver")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start in scientific mode
    #[arg(long, global = true)]
    scientific: bool,

    /// Print the final state as JSON instead of the display
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session (default)
    Repl,
    /// Apply keypad input and print the result, e.g. `eval 5 + 3 =`
    Eval {
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Ask the AI solver a question and show its answer on the display
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref());

    let state = if cli.scientific || config.scientific {
        CalculatorState::scientific()
    } else {
        CalculatorState::new()
    };
    let mut session = Session::new(state, GeminiSolver::from_config(&config.ai));

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_repl(&mut session, stdin.lock(), &mut stdout, config.display_width).await?;
            return Ok(());
        }
        Command::Eval { keys } => {
            let intents = parse_keys(&keys.join(" ")).context("Invalid keypad input")?;
            session.dispatch_all(intents);
        }
        Command::Ask { question } => {
            session
                .ask(&question.join(" "))
                .await
                .context("AI request failed")?;
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(session.state())?);
    } else {
        println!("{}", render_display(session.state(), config.display_width));
    }

    Ok(())
}
