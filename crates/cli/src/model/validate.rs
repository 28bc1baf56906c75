// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation of untyped result documents.
//!
//! Checks run in a fixed order and stop at the first failure. Only the
//! top-level fields are inspected; scenario, step and statistics contents
//! are left to deserialization.

use chrono::DateTime;
use serde_json::Value;

use super::TestStatus;
use crate::error::{Error, Result};

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidResult(message.into())
}

/// Validate a candidate result document.
pub fn validate_candidate(candidate: &Value) -> Result<()> {
    let Some(object) = candidate.as_object() else {
        return Err(invalid("Result must be an object"));
    };

    match object.get("testSuiteId").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        _ => {
            return Err(invalid(
                "testSuiteId is required and must be a non-empty string",
            ));
        }
    }

    for field in ["startTime", "endTime"] {
        let parsed = object
            .get(field)
            .and_then(Value::as_str)
            .map(DateTime::parse_from_rfc3339);
        if !matches!(parsed, Some(Ok(_))) {
            return Err(invalid(format!(
                "{field} is required and must be an RFC 3339 timestamp"
            )));
        }
    }

    let status = match object.get("status") {
        None | Some(Value::Null) => return Err(invalid("status is required")),
        Some(value) => value.as_str(),
    };
    if !TestStatus::ALL
        .iter()
        .any(|s| Some(s.as_str()) == status)
    {
        let allowed: Vec<&str> = TestStatus::ALL.iter().map(|s| s.as_str()).collect();
        return Err(invalid(format!(
            "status must be one of: {}",
            allowed.join(", ")
        )));
    }

    let total = match object.get("totalScenarios") {
        None | Some(Value::Null) => return Err(invalid("totalScenarios is required")),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| invalid("totalScenarios must be a number"))?,
    };
    if total < 0.0 {
        return Err(invalid("totalScenarios must be greater than or equal to 0"));
    }

    if !object.get("scenarios").is_some_and(Value::is_array) {
        return Err(invalid("scenarios is required and must be an array"));
    }

    if !object.get("statistics").is_some_and(Value::is_object) {
        return Err(invalid("statistics is required and must be an object"));
    }

    Ok(())
}
