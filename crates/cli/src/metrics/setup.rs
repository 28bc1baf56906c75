// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test setup detection from a theme's JavaScript tooling files.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::SetupConfig;
use crate::error::{Error, Result};

/// Framework config files, in priority order, with the framework each implies.
const FRAMEWORK_CONFIGS: [(&str, &str); 4] = [
    ("jest.config.js", "jest"),
    ("jest.config.ts", "jest"),
    ("vitest.config.ts", "vitest"),
    ("vitest.config.js", "vitest"),
];

/// Framework packages recognised in `package.json`, in priority order.
const FRAMEWORK_PACKAGES: [&str; 6] = [
    "jest",
    "vitest",
    "mocha",
    "@cucumber/cucumber",
    "@playwright/test",
    "cypress",
];

#[allow(clippy::expect_used)]
static THRESHOLD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(statements|branches|functions|lines)\s*:\s*(\d+(?:\.\d+)?)")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static TIMEOUT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btestTimeout\s*:\s*(\d+)").expect("valid regex"));

#[allow(clippy::expect_used)]
static ENVIRONMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\btestEnvironment\s*:\s*['"]([^'"]+)['"]"#).expect("valid regex")
});

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PackageManifest {
    dependencies: serde_json::Map<String, Value>,
    dev_dependencies: serde_json::Map<String, Value>,
}

/// Detect the setup of the theme at `theme`.
///
/// Starts from [`SetupConfig::default`] and overrides individual fields that
/// can be read. Never fails.
pub async fn read_setup_config(theme: &Path) -> SetupConfig {
    let mut config = SetupConfig::default();

    if let Err(e) = apply_framework_config(theme, &mut config).await {
        warn!("ignoring framework config in {}: {e}", theme.display());
    }
    if let Err(e) = apply_package_manifest(theme, &mut config).await {
        warn!("ignoring package.json in {}: {e}", theme.display());
    }
    config
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

async fn apply_framework_config(theme: &Path, config: &mut SetupConfig) -> Result<()> {
    for (file, framework) in FRAMEWORK_CONFIGS {
        if let Some(content) = read_optional(&theme.join(file)).await? {
            debug!("reading {file} for {}", theme.display());
            config.test_framework = Some(framework.to_string());
            apply_markers(&content, config);
            return Ok(());
        }
    }
    Ok(())
}

/// Override fields from markers found in config source text.
pub(super) fn apply_markers(content: &str, config: &mut SetupConfig) {
    for caps in THRESHOLD_PATTERN.captures_iter(content) {
        let Ok(value) = caps[2].parse::<f64>() else {
            continue;
        };
        let threshold = &mut config.coverage_threshold;
        match &caps[1] {
            "statements" => threshold.statements = value,
            "branches" => threshold.branches = value,
            "functions" => threshold.functions = value,
            "lines" => threshold.lines = value,
            _ => {}
        }
    }
    if let Some(caps) = TIMEOUT_PATTERN.captures(content)
        && let Ok(timeout) = caps[1].parse()
    {
        config.test_timeout = timeout;
    }
    if let Some(caps) = ENVIRONMENT_PATTERN.captures(content) {
        config.environment = caps[1].to_string();
    }
}

async fn apply_package_manifest(theme: &Path, config: &mut SetupConfig) -> Result<()> {
    let Some(content) = read_optional(&theme.join("package.json")).await? else {
        return Ok(());
    };
    let manifest: PackageManifest = serde_json::from_str(&content)?;
    let declared = |name: &str| {
        manifest.dependencies.contains_key(name) || manifest.dev_dependencies.contains_key(name)
    };
    if let Some(framework) = FRAMEWORK_PACKAGES.into_iter().find(|name| declared(name)) {
        config.test_framework = Some(framework.to_string());
    }
    Ok(())
}
