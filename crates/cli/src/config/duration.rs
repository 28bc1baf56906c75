// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout values given as milliseconds or duration strings.
//!
//! `timeout = 45000`, `timeout = "45s"`, `timeout = "750ms"` and
//! `timeout = "2m"` are all accepted.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Parse a duration string such as `"30s"`, `"500ms"`, `"1.5s"` or `"2m"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        return Ok(Duration::from_millis(n));
    }

    if let Some(secs) = s.strip_suffix('s') {
        let n: f64 = secs
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        if !n.is_finite() || n < 0.0 {
            return Err(format!("invalid duration: {s}"));
        }
        return Ok(Duration::from_secs_f64(n));
    }

    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        return Ok(Duration::from_secs(n * 60));
    }

    Err(format!(
        "invalid duration format: {s} (use 30000, 30s, 500ms, or 1m)"
    ))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Millis(i64),
    Text(String),
}

/// Deserialize a timeout into whole milliseconds.
pub(super) fn deserialize_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimeout::deserialize(deserializer)? {
        RawTimeout::Millis(n) => u64::try_from(n)
            .map_err(|_| serde::de::Error::custom("timeout must be a positive number")),
        RawTimeout::Text(s) => parse_duration(&s)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
