//! CLI command handlers.

pub mod config;
pub mod heartbeat;
pub mod load;

pub use config::run_config_show;
pub use heartbeat::run_heartbeat;
pub use load::run_load;

use jgs_chroma_config::ConnectionOverrides;
use jgs_chroma_shared::ErrorEnvelope;

/// Parse `--overrides-json`; absent means no overrides.
fn parse_overrides(overrides_json: Option<&str>) -> Result<ConnectionOverrides, ErrorEnvelope> {
    overrides_json.map_or_else(
        || Ok(ConnectionOverrides::default()),
        |json| ConnectionOverrides::from_json(json).map_err(ErrorEnvelope::from),
    )
}
