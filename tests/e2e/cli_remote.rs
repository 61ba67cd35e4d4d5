//! End-to-end tests for commands that talk to a (mock) Chroma server.

use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::process::Command;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestResult = Result<(), Box<dyn std::error::Error>>;

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

async fn run_cli(dir: &Path, args: &[&str], env: &[(&str, String)]) -> std::io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_jgs-chroma"));
    command.args(args).current_dir(dir);
    for key in CHROMA_ENV {
        command.env_remove(key);
    }
    command.env_remove("RUST_LOG");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().await
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

async fn mount_scope(server: &MockServer, tenant: &str, database: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/tenants/{tenant}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": tenant})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/tenants/{tenant}/databases/{database}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": database})))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn heartbeat_reports_server_clock() -> TestResult {
    let server = MockServer::start().await;
    mount_scope(&server, "default_tenant", "default").await;
    Mock::given(method("GET"))
        .and(path("/api/v2/heartbeat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"nanosecond heartbeat": 1234})),
        )
        .mount(&server)
        .await;

    let overrides = json!({"host": "127.0.0.1", "port": server.address().port(), "ssl": false});
    let output = run_cli(
        &scratch_dir("heartbeat")?,
        &["heartbeat", "--overrides-json", &overrides.to_string()],
        &[],
    )
    .await?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("heartbeat: 1234"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_exits_with_remote_code() -> TestResult {
    let output = run_cli(
        &scratch_dir("unreachable")?,
        &[
            "heartbeat",
            "--overrides-json",
            r#"{"host": "127.0.0.1", "port": 1, "useTls": false}"#,
        ],
        &[],
    )
    .await?;

    assert_eq!(output.status.code(), Some(4));
    assert!(stdout(&output).contains("code: vector:"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn load_inserts_each_line_and_prints_a_peek() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tenants/acme"))
        .and(header("x-chroma-token", "ck-e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "acme"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tenants/acme/databases/jgs_db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "jgs_db"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tenants/acme/databases/jgs_db/collections"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "c-1", "name": "jgs_db"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pre-flight-checks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"max_batch_size": 100})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tenants/acme/databases/jgs_db/collections/c-1/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tenants/acme/databases/jgs_db/collections/c-1/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": ["a", "b"],
            "documents": ["Orders ship in 2 days.", "Returns within 30 days."],
            "metadatas": [{"line": 0}, {"line": 1}]
        })))
        .mount(&server)
        .await;

    let dir = scratch_dir("load")?;
    std::fs::write(
        dir.join("jgs_doc.txt"),
        "Orders ship in 2 days.\nReturns within 30 days.\n",
    )?;
    let env = [
        ("CHROMA_HOST", "http://127.0.0.1".to_owned()),
        ("CHROMA_PORT", server.address().port().to_string()),
        ("CHROMA_API_KEY", "ck-e2e".to_owned()),
        ("CHROMA_TENANT", "acme".to_owned()),
    ];
    let output = run_cli(&dir, &["load", "--output", "json"], &env).await?;
    assert_eq!(output.status.code(), Some(0));

    let payload: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(payload["load"]["inserted"], 2);
    assert_eq!(payload["load"]["collection"]["name"], "jgs_db");
    assert_eq!(payload["load"]["peek"]["records"][1]["document"], "Returns within 30 days.");
    Ok(())
}
