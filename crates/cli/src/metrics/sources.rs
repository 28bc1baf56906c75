// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coverage and duplication report readers.
//!
//! Each reader tries a fixed list of candidate files and parses the first one
//! that exists. `Ok(None)` means no candidate exists; `Err` means the first
//! existing candidate could not be read or parsed.

use std::path::Path;

use serde::Deserialize;

use super::{CoverageData, CoverageDetails, CoverageMetric, DuplicatedBlock, DuplicationData};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageFormat {
    /// `{systemTest, overall, unitTest?, integrationTest?}`
    Native,
    /// Istanbul `json-summary` output.
    Istanbul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicationFormat {
    Native,
    Jscpd,
}

/// Coverage report candidates, in priority order.
pub const COVERAGE_CANDIDATES: [(&str, CoverageFormat); 3] = [
    ("coverage/theme-coverage.json", CoverageFormat::Native),
    ("coverage/coverage-summary.json", CoverageFormat::Istanbul),
    ("coverage-summary.json", CoverageFormat::Istanbul),
];

/// Duplication report candidates, in priority order.
pub const DUPLICATION_CANDIDATES: [(&str, DuplicationFormat); 3] = [
    ("duplication/duplication-report.json", DuplicationFormat::Native),
    ("duplication-report.json", DuplicationFormat::Native),
    (".jscpd/jscpd-report.json", DuplicationFormat::Jscpd),
];

// =============================================================================
// Istanbul
// =============================================================================

#[derive(Debug, Deserialize)]
struct IstanbulSummary {
    total: IstanbulTotals,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IstanbulTotals {
    statements: IstanbulCounter,
    branches: IstanbulCounter,
    functions: IstanbulCounter,
    lines: IstanbulCounter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IstanbulCounter {
    total: u64,
    covered: u64,
}

impl From<IstanbulCounter> for CoverageMetric {
    fn from(counter: IstanbulCounter) -> Self {
        CoverageMetric::new(counter.covered, counter.total)
    }
}

impl From<IstanbulSummary> for CoverageData {
    fn from(summary: IstanbulSummary) -> Self {
        let totals = summary.total;
        CoverageData {
            overall: CoverageDetails {
                class: totals.statements.into(),
                branch: totals.branches.into(),
                line: totals.lines.into(),
                method: totals.functions.into(),
            },
            ..CoverageData::default()
        }
    }
}

// =============================================================================
// jscpd
// =============================================================================

#[derive(Debug, Deserialize)]
struct JscpdReport {
    statistics: JscpdStatistics,
    #[serde(default)]
    duplicates: Vec<JscpdDuplicate>,
}

#[derive(Debug, Deserialize)]
struct JscpdStatistics {
    total: JscpdTotal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JscpdTotal {
    lines: u64,
    duplicated_lines: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JscpdDuplicate {
    #[serde(default)]
    lines: u64,
    first_file: JscpdFile,
    second_file: JscpdFile,
}

#[derive(Debug, Deserialize)]
struct JscpdFile {
    name: String,
}

impl From<JscpdReport> for DuplicationData {
    fn from(report: JscpdReport) -> Self {
        let total = report.statistics.total;
        DuplicationData {
            percentage: super::percentage(total.duplicated_lines, total.lines),
            duplicated_lines: total.duplicated_lines,
            total_lines: total.lines,
            duplicated_blocks: report
                .duplicates
                .into_iter()
                .map(|d| DuplicatedBlock {
                    files: vec![d.first_file.name, d.second_file.name],
                    lines: d.lines,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Readers
// =============================================================================

/// Read the first existing candidate under `dir`.
async fn read_first<F: Copy>(
    dir: &Path,
    candidates: &[(&str, F)],
) -> Result<Option<(String, F)>> {
    for (name, format) in candidates {
        let path = dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => return Ok(Some((content, *format))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(Error::io(path, e)),
        }
    }
    Ok(None)
}

fn parse_error(dir: &Path, e: serde_json::Error) -> Error {
    Error::Metrics(format!("{}: {e}", dir.display()))
}

/// Recompute every percentage from its counts.
fn normalize(details: CoverageDetails) -> CoverageDetails {
    let fix = |m: CoverageMetric| CoverageMetric::new(m.covered, m.total);
    CoverageDetails {
        class: fix(details.class),
        branch: fix(details.branch),
        line: fix(details.line),
        method: fix(details.method),
    }
}

/// Read a theme's coverage report.
pub async fn read_coverage(theme: &Path) -> Result<Option<CoverageData>> {
    let Some((content, format)) = read_first(theme, &COVERAGE_CANDIDATES).await? else {
        return Ok(None);
    };
    let data = match format {
        CoverageFormat::Native => {
            let data: CoverageData =
                serde_json::from_str(&content).map_err(|e| parse_error(theme, e))?;
            CoverageData {
                system_test: normalize(data.system_test),
                overall: normalize(data.overall),
                unit_test: data.unit_test.map(normalize),
                integration_test: data.integration_test.map(normalize),
            }
        }
        CoverageFormat::Istanbul => {
            let summary: IstanbulSummary =
                serde_json::from_str(&content).map_err(|e| parse_error(theme, e))?;
            summary.into()
        }
    };
    Ok(Some(data))
}

/// Read a theme's duplication report.
pub async fn read_duplication(theme: &Path) -> Result<Option<DuplicationData>> {
    let Some((content, format)) = read_first(theme, &DUPLICATION_CANDIDATES).await? else {
        return Ok(None);
    };
    let data = match format {
        DuplicationFormat::Native => {
            let mut data: DuplicationData =
                serde_json::from_str(&content).map_err(|e| parse_error(theme, e))?;
            if data.total_lines > 0 {
                data.percentage = super::percentage(data.duplicated_lines, data.total_lines);
            }
            data
        }
        DuplicationFormat::Jscpd => {
            let report: JscpdReport =
                serde_json::from_str(&content).map_err(|e| parse_error(theme, e))?;
            report.into()
        }
    };
    Ok(Some(data))
}
