//! `pagegen` command line entry point.
//!
//! # Responsibility
//! - Drive generation and published-page lookup against the local store.
//! - Print API response bodies unchanged; exit with 1 on any non-success.

use clap::{Parser, Subcommand};
use log::warn;
use pagegen_api::{ApiResponse, PageApi};
use pagegen_core::{core_version, init_logging, AppConfig, Principal};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pagegen")]
#[command(about = "Generate and serve landing pages from a one-line prompt", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and publish a page from a prompt
    Generate {
        /// Owner recorded on the new page
        #[arg(long)]
        owner: String,
        /// Free-form product description
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// Print a published page as JSON
    Show {
        slug: String,
    },

    /// Write a published page as HTML
    Render {
        slug: String,
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let api = PageApi::from_config(&config);
    match cli.command {
        Commands::Generate { owner, prompt } => {
            let body = serde_json::json!({ "prompt": prompt.join(" ") }).to_string();
            finish(api.generate(Some(&Principal::new(owner)), &body), None)
        }
        Commands::Show { slug } => finish(api.lookup(&slug), None),
        Commands::Render { slug, out } => finish(api.page_html(&slug), out),
        Commands::Version => {
            println!("pagegen {}", core_version());
            ExitCode::SUCCESS
        }
    }
}

fn finish(response: ApiResponse, out: Option<PathBuf>) -> ExitCode {
    if !response.is_success() {
        warn!(
            "event=cli_command module=cli status=error http_status={}",
            response.status
        );
        eprintln!("{}", response.body);
        return ExitCode::FAILURE;
    }

    match out {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, &response.body) {
                eprintln!("cannot write {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", response.body),
    }
    ExitCode::SUCCESS
}
