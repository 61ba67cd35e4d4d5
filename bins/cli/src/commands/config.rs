//! `config show` command handler.

use super::parse_overrides;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, pretty_json};
use jgs_chroma_infra::{
    EffectiveConnection, ResolutionMode, effective_connection, effective_connection_json,
};
use std::collections::BTreeMap;

/// Print the connection the current environment resolves to.
pub fn run_config_show(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    cloud: bool,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let resolution = if cloud {
        ResolutionMode::Cloud
    } else {
        ResolutionMode::Standard
    };
    let effective = match parse_overrides(overrides_json)
        .and_then(|overrides| effective_connection(env, &overrides, resolution))
    {
        Ok(effective) => effective,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        let json = match effective_connection_json(&effective) {
            Ok(json) => json,
            Err(error) => return Ok(format_error_output(mode, &error)),
        };
        let effective: serde_json::Value = serde_json::from_str(&json)?;
        pretty_json(&serde_json::json!({
            "status": "ok",
            "effectiveConnection": effective,
        }))?
    } else {
        format_config_text(&effective)
    };

    Ok(CliOutput {
        stdout,
        exit_code: ExitCode::Ok,
    })
}

fn format_config_text(effective: &EffectiveConnection) -> String {
    let connection = &effective.connection;
    let mode = match effective.mode {
        ResolutionMode::Standard => "standard",
        ResolutionMode::Cloud => "cloud",
    };
    format!(
        "status: ok\nmode: {mode}\nhost: {}\nport: {}\nuseTLS: {}\ntenant: {}\ndatabase: {}\nauthenticated: {}\n",
        connection.host,
        connection.port,
        connection.use_tls,
        connection.tenant.as_deref().unwrap_or("-"),
        connection.database,
        connection.is_authenticated(),
    )
}
