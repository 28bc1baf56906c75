// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Color detection and terminal styling.
//!
//! Detection order:
//! 1. NO_COLOR env var → no color
//! 2. COLOR env var → use color
//! 3. default:
//!    - If not stdout.is_tty() → no color
//!    - If CI env var set → no color
//!    - Else → use color

use std::io::{IsTerminal, Write};

use termcolor::{ColorChoice, WriteColor};

use crate::model::TestStatus;

/// Resolve color choice from environment variables.
///
/// Per [no-color.org](https://no-color.org/), `NO_COLOR` set to any value
/// (including empty string) disables color.
pub fn resolve_color() -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    if std::env::var_os("COLOR").is_some() {
        return ColorChoice::Always;
    }
    if !std::io::stdout().is_terminal() || std::env::var_os("CI").is_some() {
        return ColorChoice::Never;
    }
    ColorChoice::Auto
}

/// Color scheme for command output.
pub mod scheme {
    use termcolor::{Color, ColorSpec};

    /// Bold criterion or suite name.
    pub fn name() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        spec
    }

    /// Red "FAIL" indicator.
    pub fn fail() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        spec
    }

    /// Green "PASS" indicator.
    pub fn pass() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Green)).set_bold(true);
        spec
    }

    /// Yellow indicator for pending and cancelled runs.
    pub fn warn() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Yellow)).set_bold(true);
        spec
    }

    /// Cyan file path.
    pub fn path() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Cyan));
        spec
    }
}

/// Write `PASS` or `FAIL` in the matching color.
pub fn write_verdict(out: &mut impl WriteColor, passed: bool) -> std::io::Result<()> {
    let (spec, label) = if passed {
        (scheme::pass(), "PASS")
    } else {
        (scheme::fail(), "FAIL")
    };
    out.set_color(&spec)?;
    write!(out, "{label}")?;
    out.reset()
}

/// Write a run status in the matching color.
pub fn write_status(out: &mut impl WriteColor, status: TestStatus) -> std::io::Result<()> {
    let spec = match status {
        TestStatus::Passed => scheme::pass(),
        TestStatus::Failed => scheme::fail(),
        TestStatus::Pending | TestStatus::Cancelled => scheme::warn(),
    };
    out.set_color(&spec)?;
    write!(out, "{}", status.as_str().to_uppercase())?;
    out.reset()
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
