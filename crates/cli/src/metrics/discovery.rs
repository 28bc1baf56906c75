// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Theme directory discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Registry of additional themes, relative to the aggregation root.
pub const REGISTRY_FILE: &str = "theme-registry.json";

/// A discovered theme directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDir {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Registry {
    #[serde(default)]
    themes: Vec<RegistryEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryEntry {
    name: String,
    path: PathBuf,
    #[serde(default)]
    connected: bool,
}

/// Find theme directories under `root`.
///
/// Scans `demo/*`, `release/*` and `theme_demos/*/*` in that order, each
/// sorted by name, then appends connected registry themes. A path found
/// twice is kept only the first time.
pub async fn discover_themes(root: &Path) -> Vec<ThemeDir> {
    let mut found = Vec::new();

    for folder in ["demo", "release"] {
        for (name, path) in subdirectories(&root.join(folder)).await {
            found.push(ThemeDir { name, path });
        }
    }

    for (theme, theme_path) in subdirectories(&root.join("theme_demos")).await {
        for (demo, path) in subdirectories(&theme_path).await {
            found.push(ThemeDir {
                name: format!("{theme}/{demo}"),
                path,
            });
        }
    }

    match registry_themes(root).await {
        Ok(themes) => found.extend(themes),
        Err(e) => warn!("ignoring theme registry: {e}"),
    }

    let mut seen = HashSet::new();
    found.retain(|t| seen.insert(t.path.clone()));
    found
}

/// Immediate subdirectories of `dir`, sorted by name. Missing dirs yield none.
async fn subdirectories(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("skipping {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        if is_dir {
            let name = entry.file_name().to_string_lossy().into_owned();
            dirs.push((name, entry.path()));
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    dirs
}

/// Connected themes listed in the registry. An absent registry is empty.
async fn registry_themes(root: &Path) -> Result<Vec<ThemeDir>> {
    let path = root.join(REGISTRY_FILE);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(path, e)),
    };
    let registry: Registry = serde_json::from_str(&content)
        .map_err(|e| Error::Metrics(format!("{}: {e}", path.display())))?;

    let mut themes = Vec::new();
    for entry in registry.themes.into_iter().filter(|e| e.connected) {
        let theme_path = root.join(&entry.path);
        if tokio::fs::metadata(&theme_path)
            .await
            .is_ok_and(|m| m.is_dir())
        {
            themes.push(ThemeDir {
                name: entry.name,
                path: theme_path,
            });
        } else {
            debug!("registry theme {} has no directory", entry.name);
        }
    }
    Ok(themes)
}
