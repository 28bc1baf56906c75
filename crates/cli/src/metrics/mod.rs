// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coverage and duplication metrics aggregated across themes.
//!
//! A theme is a project subdirectory that may carry its own coverage and
//! duplication reports. [`MetricsAggregator`] discovers themes under a root,
//! reads whatever reports each one has, and folds them into a single
//! [`AggregatedMetrics`] snapshot. Missing or unreadable reports never fail
//! aggregation; the theme contributes zeroed metrics instead.

mod discovery;
mod setup;
mod sources;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;

pub use discovery::{REGISTRY_FILE, ThemeDir, discover_themes};
pub use setup::read_setup_config;
pub use sources::{
    COVERAGE_CANDIDATES, CoverageFormat, DUPLICATION_CANDIDATES, DuplicationFormat, read_coverage,
    read_duplication,
};

/// Minimum system-test class and branch coverage for the aggregate flags.
pub const COVERAGE_TARGET: f64 = 80.0;

/// Maximum duplication percentage for the aggregate flag.
pub const DUPLICATION_CEILING: f64 = 5.0;

/// `covered / total` as a percentage, 0 when `total` is 0.
pub fn percentage(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

/// One coverage dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetric {
    #[serde(default)]
    pub percentage: f64,
    pub covered: u64,
    pub total: u64,
}

impl CoverageMetric {
    pub fn new(covered: u64, total: u64) -> Self {
        Self {
            percentage: percentage(covered, total),
            covered,
            total,
        }
    }

    /// Sum counts and recompute the percentage.
    pub fn combine(self, other: Self) -> Self {
        Self::new(
            self.covered.saturating_add(other.covered),
            self.total.saturating_add(other.total),
        )
    }
}

/// Class, branch, line and method coverage for one test level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageDetails {
    pub class: CoverageMetric,
    pub branch: CoverageMetric,
    pub line: CoverageMetric,
    pub method: CoverageMetric,
}

impl CoverageDetails {
    pub fn combine(self, other: Self) -> Self {
        Self {
            class: self.class.combine(other.class),
            branch: self.branch.combine(other.branch),
            line: self.line.combine(other.line),
            method: self.method.combine(other.method),
        }
    }

    fn sum<'a>(items: impl Iterator<Item = &'a CoverageDetails>) -> Self {
        items.fold(Self::default(), |acc, d| acc.combine(*d))
    }
}

/// Coverage reported by a single theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageData {
    pub system_test: CoverageDetails,
    pub overall: CoverageDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_test: Option<CoverageDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_test: Option<CoverageDetails>,
}

/// Coverage as attached to a result's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageSummary {
    pub system_test: CoverageDetails,
    pub overall: CoverageDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicatedBlock {
    pub files: Vec<String>,
    pub lines: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicationData {
    pub percentage: f64,
    pub duplicated_lines: u64,
    pub total_lines: u64,
    pub duplicated_blocks: Vec<DuplicatedBlock>,
}

impl DuplicationData {
    fn sum<'a>(items: impl Iterator<Item = &'a DuplicationData>) -> Self {
        let mut total = Self::default();
        for item in items {
            total.duplicated_lines = total
                .duplicated_lines
                .saturating_add(item.duplicated_lines);
            total.total_lines = total.total_lines.saturating_add(item.total_lines);
            total
                .duplicated_blocks
                .extend(item.duplicated_blocks.iter().cloned());
        }
        total.percentage = percentage(total.duplicated_lines, total.total_lines);
        total
    }
}

/// Metrics for one discovered theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeMetrics {
    pub name: String,
    pub path: PathBuf,
    pub coverage: CoverageData,
    pub duplication: DuplicationData,
}

/// Coverage rolled up across every theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateCoverage {
    pub overall: CoverageDetails,
    pub system_test: CoverageDetails,
    pub unit_test: CoverageDetails,
    pub integration_test: CoverageDetails,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionFlag {
    pub met: bool,
    pub target: f64,
    pub actual: f64,
}

/// Flags derived from the aggregate with fixed targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassCriteriaFlags {
    pub system_test_class_coverage: CriterionFlag,
    pub branch_coverage: CriterionFlag,
    pub duplication_threshold: CriterionFlag,
}

/// Snapshot of every theme plus the rolled-up totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub timestamp: DateTime<Utc>,
    pub themes: Vec<ThemeMetrics>,
    pub aggregated_metrics: AggregateCoverage,
    pub duplication: DuplicationData,
    pub pass_criteria: PassCriteriaFlags,
}

impl AggregatedMetrics {
    /// Fold per-theme metrics into a fresh aggregate.
    ///
    /// Counts are summed before percentages are computed.
    pub fn from_themes(themes: Vec<ThemeMetrics>, timestamp: DateTime<Utc>) -> Self {
        let coverage = || themes.iter().map(|t| &t.coverage);
        let aggregated_metrics = AggregateCoverage {
            overall: CoverageDetails::sum(coverage().map(|c| &c.overall)),
            system_test: CoverageDetails::sum(coverage().map(|c| &c.system_test)),
            unit_test: CoverageDetails::sum(coverage().filter_map(|c| c.unit_test.as_ref())),
            integration_test: CoverageDetails::sum(
                coverage().filter_map(|c| c.integration_test.as_ref()),
            ),
        };
        let duplication = DuplicationData::sum(themes.iter().map(|t| &t.duplication));

        let class = aggregated_metrics.system_test.class.percentage;
        let branch = aggregated_metrics.system_test.branch.percentage;
        let pass_criteria = PassCriteriaFlags {
            system_test_class_coverage: CriterionFlag {
                met: class >= COVERAGE_TARGET,
                target: COVERAGE_TARGET,
                actual: class,
            },
            branch_coverage: CriterionFlag {
                met: branch >= COVERAGE_TARGET,
                target: COVERAGE_TARGET,
                actual: branch,
            },
            duplication_threshold: CriterionFlag {
                met: duplication.percentage <= DUPLICATION_CEILING,
                target: DUPLICATION_CEILING,
                actual: duplication.percentage,
            },
        };

        Self {
            timestamp,
            themes,
            aggregated_metrics,
            duplication,
            pass_criteria,
        }
    }

    /// The `coverage` block attached to result metadata.
    pub fn coverage_summary(&self) -> CoverageSummary {
        CoverageSummary {
            system_test: self.aggregated_metrics.system_test,
            overall: self.aggregated_metrics.overall,
        }
    }
}

/// Per-metric minimum coverage percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageThreshold {
    pub statements: f64,
    pub branches: f64,
    pub functions: f64,
    pub lines: f64,
}

impl Default for CoverageThreshold {
    fn default() -> Self {
        Self {
            statements: COVERAGE_TARGET,
            branches: COVERAGE_TARGET,
            functions: COVERAGE_TARGET,
            lines: COVERAGE_TARGET,
        }
    }
}

/// Test setup detected for a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetupConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_framework: Option<String>,
    pub environment: String,
    /// Milliseconds.
    pub test_timeout: u64,
    pub coverage_threshold: CoverageThreshold,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            test_framework: None,
            environment: "test".to_string(),
            test_timeout: 30_000,
            coverage_threshold: CoverageThreshold::default(),
        }
    }
}

/// Source of metrics snapshots and setup configuration.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn aggregate_metrics(&self) -> Result<AggregatedMetrics>;

    /// Never fails; unreadable inputs leave defaults in place.
    async fn setup_config(&self, theme: Option<&Path>) -> SetupConfig;
}

/// Filesystem-backed [`MetricsSource`] rooted at a project directory.
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    root: PathBuf,
}

impl MetricsAggregator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn collect_theme(theme: ThemeDir) -> ThemeMetrics {
        let coverage = match read_coverage(&theme.path).await {
            Ok(Some(coverage)) => coverage,
            Ok(None) => {
                debug!("no coverage report for theme {}", theme.name);
                CoverageData::default()
            }
            Err(e) => {
                warn!("unreadable coverage for theme {}: {e}", theme.name);
                CoverageData::default()
            }
        };
        let duplication = match read_duplication(&theme.path).await {
            Ok(Some(duplication)) => duplication,
            Ok(None) => {
                debug!("no duplication report for theme {}", theme.name);
                DuplicationData::default()
            }
            Err(e) => {
                warn!("unreadable duplication report for theme {}: {e}", theme.name);
                DuplicationData::default()
            }
        };
        ThemeMetrics {
            name: theme.name,
            path: theme.path,
            coverage,
            duplication,
        }
    }
}

#[async_trait]
impl MetricsSource for MetricsAggregator {
    async fn aggregate_metrics(&self) -> Result<AggregatedMetrics> {
        let dirs = discover_themes(&self.root).await;
        info!("aggregating metrics for {} themes", dirs.len());

        let mut themes = Vec::with_capacity(dirs.len());
        for dir in dirs {
            themes.push(Self::collect_theme(dir).await);
        }
        Ok(AggregatedMetrics::from_themes(themes, Utc::now()))
    }

    async fn setup_config(&self, theme: Option<&Path>) -> SetupConfig {
        match theme {
            Some(path) => read_setup_config(path).await,
            None => SetupConfig::default(),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
