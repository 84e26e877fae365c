//! Terminal output for `asana-ctl`.
//!
//! Tool text goes to stdout untouched so it can be piped; errors go to
//! stderr. `anstream` strips the styling when the stream is not a terminal.

mod styles;

use std::io::Write;

use asana_mcp::protocol::{ErrorData, Tool};
use serde_json::Value;

pub(crate) use styles::clap_styles;

use styles::{ARG, DIM, ERROR, NAME};

/// Print an error message to stderr (red X prefix).
pub(crate) fn error(msg: impl std::fmt::Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

/// Print a protocol error with its structured detail.
pub(crate) fn rpc_error(err: &ErrorData) {
    error(format!("{} (code {})", err.message, err.code.0));
    if let Some(data) = &err.data {
        let mut out = anstream::stderr().lock();
        writeln!(out, "  {DIM}{data}{DIM:#}").ok();
    }
}

/// Print plain text to stdout (for output that doesn't need styling).
pub(crate) fn plain(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{msg}").ok();
}

/// Print a JSON value, pretty.
pub(crate) fn json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => plain(text),
        Err(e) => error(format!("Failed to render JSON: {e}")),
    }
}

/// One tool per entry: bold name, dimmed description, then its arguments
/// with required ones marked.
pub(crate) fn tools(tools: &[Tool]) {
    let mut out = anstream::stdout().lock();
    for tool in tools {
        writeln!(out, "{NAME}{}{NAME:#}", tool.name).ok();
        if let Some(description) = &tool.description {
            writeln!(out, "  {DIM}{description}{DIM:#}").ok();
        }

        let required: Vec<&str> = tool
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if let Some(properties) = tool.input_schema.get("properties").and_then(Value::as_object) {
            for (name, schema) in properties {
                let kind = match &schema["type"] {
                    Value::String(kind) => kind.clone(),
                    Value::Array(kinds) => kinds
                        .iter()
                        .filter_map(Value::as_str)
                        .filter(|k| *k != "null")
                        .collect::<Vec<_>>()
                        .join("|"),
                    _ => "any".to_string(),
                };
                let marker = if required.contains(&name.as_str()) {
                    " (required)"
                } else {
                    ""
                };
                writeln!(out, "    {ARG}{name}{ARG:#}: {kind}{marker}").ok();
            }
        }
    }
}
