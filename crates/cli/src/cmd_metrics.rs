// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics command implementation.

use std::io::Write;

use storyreport::cli::{Cli, MetricsArgs};
use storyreport::discovery;
use storyreport::metrics::{MetricsAggregator, MetricsSource};

/// Run the metrics command.
pub async fn run(cli: &Cli, args: &MetricsArgs) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let root = match &args.root {
        Some(root) => root.clone(),
        None => discovery::resolve_config(cli.config.as_deref(), &cwd)?
            .map_or(cwd, |path| discovery::project_root(&path)),
    };

    let metrics = MetricsAggregator::new(root).aggregate_metrics().await?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if args.compact {
        serde_json::to_writer(&mut handle, &metrics)?;
    } else {
        serde_json::to_writer_pretty(&mut handle, &metrics)?;
    }
    writeln!(handle)?;
    Ok(())
}
