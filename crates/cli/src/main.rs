// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Storyreport CLI entry point.

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt};

use storyreport::cli::{Cli, Command};
use storyreport::error::ExitCode;

mod cmd_metrics;
mod cmd_render;
mod cmd_run;
mod cmd_validate;

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("STORYREPORT_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("storyreport: {}", e);
            match e.downcast_ref::<storyreport::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        None => {
            // Show help for bare invocation
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::Success)
        }
        Some(Command::Run(args)) => cmd_run::run(&cli, args).await,
        Some(Command::Render(args)) => cmd_render::run(&cli, args).await,
        Some(Command::Metrics(args)) => {
            cmd_metrics::run(&cli, args).await?;
            Ok(ExitCode::Success)
        }
        Some(Command::Validate(args)) => cmd_validate::run(&cli, args).await,
    }
}
