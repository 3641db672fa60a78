//! Tool parameter validation
//!
//! Turns raw tool arguments into domain values and library errors into public
//! MCP errors, so the handlers can use `?` throughout.

use crate::error::TasCraftError;
use crate::quest::validate_priority;
use mcp_attr::Result as McpResult;
use std::str::FromStr;

/// Public MCP error carrying a readable message
pub fn invalid_params(message: impl Into<String>) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Map a library error to a public MCP error
pub fn public_error(error: TasCraftError) -> mcp_attr::Error {
    invalid_params(error.to_string())
}

/// Parse an optional choice parameter (filter, sort, category, icon, ...).
///
/// Empty or missing values give the type's default.
pub fn parse_choice<T>(value: Option<&str>) -> McpResult<T>
where
    T: FromStr<Err = String> + Default,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse::<T>().map_err(invalid_params),
        None => Ok(T::default()),
    }
}

pub fn parse_priority(priority: Option<u32>) -> McpResult<Option<u32>> {
    priority
        .map(validate_priority)
        .transpose()
        .map_err(public_error)
}

/// Optional text field of an update: `None` keeps it, `""` clears it.
pub fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let v = v.trim().to_string();
        if v.is_empty() { None } else { Some(v) }
    })
}

/// Reject blank required text
pub fn required(name: &str, value: &str) -> McpResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid_params(format!("{} cannot be empty", name)));
    }
    Ok(value.to_string())
}
