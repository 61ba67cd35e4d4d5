//! Print the effective Chroma connection (env + defaults) as redacted JSON.
//!
//! Pass `--cloud` to resolve the way the document loader does.

use jgs_chroma_config::{
    ChromaEnv, ConnectionOverrides, resolve_cloud_connection, resolve_connection,
};
use std::io;
use std::io::Write;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::ExitCode::from(1)
        },
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cloud = std::env::args().skip(1).any(|arg| arg == "--cloud");
    let env = ChromaEnv::from_std_env()?;
    let descriptor = if cloud {
        resolve_cloud_connection(&env)?
    } else {
        resolve_connection(&env, &ConnectionOverrides::default())?
    };

    let mut output = serde_json::to_string_pretty(&descriptor)?;
    output.push('\n');

    let mut stdout = io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
