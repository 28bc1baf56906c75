// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scenario test orchestration with multi-format reports and pass criteria
#[derive(Parser)]
#[command(name = "storyreport")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "STORYREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute the suite from Cucumber JSON reports and write reports
    Run(RunArgs),
    /// Render reports from a saved test result
    Render(RenderArgs),
    /// Print aggregated coverage and duplication metrics as JSON
    Metrics(MetricsArgs),
    /// Check a saved test result against the pass criteria
    Validate(ValidateArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Cucumber JSON report files to convert
    #[arg(long = "cucumber-json", value_name = "FILE", required = true, num_args = 1..)]
    pub cucumber_json: Vec<PathBuf>,

    /// Project root scanned for theme metrics (default: the config's directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RenderArgs {
    /// Saved test result (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output formats, overriding the configuration
    #[arg(short, long = "format", value_name = "FORMAT")]
    pub formats: Vec<String>,

    /// Output directory, overriding the configuration
    #[arg(short = 'd', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Project root scanned for theme metrics (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct MetricsArgs {
    /// Project root scanned for theme metrics (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Saved test result (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Project root scanned for theme metrics (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
