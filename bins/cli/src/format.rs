//! Output format helpers for CLI commands.

use crate::CliOutput;
use crate::error::ExitCode;
use clap::{Args, ValueEnum};
use jgs_chroma_shared::{ErrorEnvelope, REDACTED_VALUE, is_secret_key};

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
    /// Emit machine-readable JSON output (alias for `--output json`).
    #[arg(long, global = true, hide = true)]
    pub json: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        let format = if args.json {
            OutputFormat::Json
        } else {
            args.output
        };
        Self { format }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// Pretty JSON with a trailing newline.
pub fn pretty_json(payload: &serde_json::Value) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(payload)?;
    output.push('\n');
    Ok(output)
}

/// Render a failed command; secret-looking metadata values are masked.
pub fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let error = sanitize_error(error.clone());
    let exit_code = ExitCode::for_envelope(&error);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });
        pretty_json(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}\n"
                .to_string()
        })
    } else {
        format_error_text(&error)
    };

    CliOutput {
        stdout,
        exit_code,
    }
}

fn sanitize_error(mut error: ErrorEnvelope) -> ErrorEnvelope {
    for (key, value) in &mut error.metadata {
        if is_secret_key(key) {
            *value = REDACTED_VALUE.to_string();
        }
    }
    error
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = format!(
        "status: error\ncode: {}\nmessage: {}\nkind: {}\n",
        error.code, error.message, error.kind
    );
    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jgs_chroma_shared::ErrorCode;

    #[test]
    fn error_text_masks_secret_metadata() {
        let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "bad header")
            .with_metadata("api_key", "ck-live")
            .with_metadata("env_var", "CHROMA_PORT");
        let output = format_error_output(
            OutputMode {
                format: OutputFormat::Text,
            },
            &error,
        );
        assert!(output.stdout.contains("code: core:invalid_input"));
        assert!(output.stdout.contains("env_var: CHROMA_PORT"));
        assert!(!output.stdout.contains("ck-live"));
        assert_eq!(output.exit_code, ExitCode::InvalidInput);
    }
}
