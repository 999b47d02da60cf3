//! quizforge CLI: validate, grade and curate quiz problems.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Quiz problem authoring and grading toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate problem draft JSON files
    Validate {
        /// Path to a problem draft file or directory
        #[arg(long)]
        problem: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a submission against a problem
    Grade {
        /// Problem draft JSON
        #[arg(long)]
        problem: PathBuf,

        /// Submission JSON: {"type": ..., "data": ...}
        #[arg(long)]
        submission: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show what each problem type supports when grading
    Capabilities {
        /// Only this problem type (e.g. "matching")
        #[arg(long = "type")]
        problem_type: Option<String>,
    },

    /// Tag curation tools
    Tags {
        #[command(subcommand)]
        command: commands::tags::TagsCommand,

        /// Config file path
        #[arg(long, global = true)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and an example problem
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { problem, config } => commands::validate::execute(problem, config),
        Commands::Grade {
            problem,
            submission,
            format,
            config,
        } => commands::grade::execute(problem, submission, format, config),
        Commands::Capabilities { problem_type } => commands::capabilities::execute(problem_type),
        Commands::Tags { command, config } => commands::tags::execute(command, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
