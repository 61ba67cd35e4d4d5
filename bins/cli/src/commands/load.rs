//! `load` command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_error_output, pretty_json};
use jgs_chroma_infra::{LoadDocumentOutput, run_cloud_load};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Load a text file into the cloud collection and print a peek of it.
pub fn run_load(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: &Path,
) -> Result<CliOutput, CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = match runtime.block_on(run_cloud_load(env, path)) {
        Ok(output) => output,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "load": output,
        }))?
    } else {
        format_load_text(&output)
    };

    Ok(CliOutput {
        stdout,
        exit_code: ExitCode::Ok,
    })
}

fn format_load_text(output: &LoadDocumentOutput) -> String {
    let mut out = format!(
        "status: ok\ncollection: {} ({})\ninserted: {}\nbatches: {}\npeek:\n",
        output.collection.name, output.collection.id, output.inserted, output.batches
    );
    for record in &output.peek.records {
        let line = record
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.get("line"))
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let _ = writeln!(
            out,
            "  [{line}] {}",
            record.document.as_deref().unwrap_or("")
        );
    }
    out
}
