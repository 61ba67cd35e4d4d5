//! End-to-end tests for `config show` and offline `load` failures.

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const CHROMA_ENV: &[&str] = &[
    "CHROMA_HOST",
    "CHROMA_PORT",
    "CHROMA_SSL",
    "CHROMA_API_KEY",
    "CHROMADB_API_KEY",
    "CHROMA_TENANT",
    "CHROMADB_TENANT",
    "CHROMA_DATABASE",
    "CHROMADB_DATABASE",
];

fn scratch_dir(label: &str) -> std::io::Result<PathBuf> {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("jgs-cli-{label}-{unique}"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn run_cli(label: &str, args: &[&str], env: &[(&str, &str)]) -> std::io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_jgs-chroma"));
    command.args(args).current_dir(scratch_dir(label)?);
    for key in CHROMA_ENV {
        command.env_remove(key);
    }
    command.env_remove("RUST_LOG");
    command.envs(env.iter().copied());
    command.output()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn config_show_defaults_to_local_plaintext() -> std::io::Result<()> {
    let output = run_cli("defaults", &["config", "show"], &[])?;
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.contains("mode: standard"));
    assert!(text.contains("host: localhost"));
    assert!(text.contains("port: 8000"));
    assert!(text.contains("useTLS: false"));
    assert!(text.contains("authenticated: false"));
    Ok(())
}

#[test]
fn config_show_json_redacts_the_api_key() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_cli(
        "json",
        &["config", "show", "--output", "json"],
        &[
            ("CHROMA_HOST", "https://chroma.example.com:9000"),
            ("CHROMA_API_KEY", "ck-very-secret"),
            ("CHROMA_TENANT", "acme"),
        ],
    )?;
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(!text.contains("ck-very-secret"));

    let payload: serde_json::Value = serde_json::from_str(&text)?;
    let connection = &payload["effectiveConnection"]["connection"];
    assert_eq!(payload["status"], "ok");
    assert_eq!(connection["host"], "chroma.example.com");
    assert_eq!(connection["port"], 9000);
    assert_eq!(connection["useTLS"], true);
    assert_eq!(connection["tenant"], "acme");
    assert_eq!(connection["database"], "default");
    Ok(())
}

#[test]
fn config_show_applies_overrides_json() -> std::io::Result<()> {
    let output = run_cli(
        "overrides",
        &[
            "config",
            "show",
            "--overrides-json",
            r#"{"port": 1234, "ssl": true, "unknown": 1}"#,
        ],
        &[("CHROMA_HOST", "localhost")],
    )?;
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.contains("port: 1234"));
    assert!(text.contains("useTLS: true"));
    Ok(())
}

#[test]
fn non_integer_port_exits_with_config_error() -> std::io::Result<()> {
    let output = run_cli("bad-port", &["config", "show"], &[("CHROMA_PORT", "abc")])?;
    assert_eq!(output.status.code(), Some(2));

    let text = stdout(&output);
    assert!(text.contains("code: config:invalid_port"));
    assert!(text.contains("CHROMA_PORT must be an integer"));
    Ok(())
}

#[test]
fn cloud_config_requires_credentials() -> std::io::Result<()> {
    let output = run_cli(
        "cloud-missing",
        &["config", "show", "--cloud"],
        &[("CHROMA_TENANT", "acme")],
    )?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("config:missing_credentials"));
    Ok(())
}

#[test]
fn load_without_credentials_exits_before_reading() -> std::io::Result<()> {
    let output = run_cli("load-missing", &["load", "--file", "absent.txt"], &[])?;
    assert_eq!(output.status.code(), Some(2));

    let text = stdout(&output);
    assert!(text.contains("config:missing_credentials"));
    assert!(text.contains("Set CHROMA_API_KEY and CHROMA_TENANT"));
    Ok(())
}

#[test]
fn load_of_missing_file_exits_with_io_code() -> std::io::Result<()> {
    let output = run_cli(
        "load-no-file",
        &["load"],
        &[("CHROMA_API_KEY", "ck-1"), ("CHROMA_TENANT", "acme")],
    )?;
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("jgs_doc.txt"));
    Ok(())
}
