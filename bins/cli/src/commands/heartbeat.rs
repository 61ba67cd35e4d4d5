//! `heartbeat` command handler.

use super::parse_overrides;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, pretty_json};
use jgs_chroma_infra::get_client;
use std::collections::BTreeMap;

/// Connect with the blocking client and report the server heartbeat.
pub fn run_heartbeat(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let heartbeat = match parse_overrides(overrides_json)
        .and_then(|overrides| get_client(env, &overrides))
        .and_then(|client| client.heartbeat())
    {
        Ok(heartbeat) => heartbeat,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "nanosecondHeartbeat": heartbeat,
        }))?
    } else {
        format!("status: ok\nheartbeat: {heartbeat}\n")
    };

    Ok(CliOutput {
        stdout,
        exit_code: ExitCode::Ok,
    })
}
