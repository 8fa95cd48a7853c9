//! MCP client configuration snippet for this server.
//!
//! Scans source files for the environment variables the server reads and renders the
//! `mcpServers` block most MCP clients accept, with a placeholder per variable.

use crate::error::{AdapterError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const PLACEHOLDER: &str = "<REPLACE>";

// clap `env = "NAME"` attributes and `env::var("NAME")` / `env::var_os("NAME")` calls.
static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:\benv\s*=\s*|\benv::var(?:_os)?\(\s*)"([A-Za-z_][A-Za-z0-9_]*)""#)
        .expect("valid regex")
});

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub mcp_servers: BTreeMap<String, ServerEntry>,
}

#[derive(Debug, Serialize)]
pub struct ServerEntry {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Environment variable names referenced in `source`, deduplicated and sorted.
#[must_use]
pub fn env_vars_in(source: &str) -> Vec<String> {
    let mut names: Vec<String> = ENV_REF
        .captures_iter(source)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Scan `sources` and build the client config for a server launched as `command`.
///
/// # Errors
///
/// Returns an error if a source file cannot be read.
pub fn client_config(name: &str, command: &Path, sources: &[PathBuf]) -> Result<ClientConfig> {
    let mut env = BTreeMap::new();
    for path in sources {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AdapterError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        for var in env_vars_in(&text) {
            env.insert(var, PLACEHOLDER.to_string());
        }
    }

    let command = if command.is_absolute() {
        command.to_path_buf()
    } else {
        std::env::current_dir()?.join(command)
    };

    Ok(ClientConfig {
        mcp_servers: BTreeMap::from([(
            name.to_string(),
            ServerEntry {
                command: command.display().to_string(),
                args: Vec::new(),
                env,
            },
        )]),
    })
}

/// Pretty JSON for copy/paste.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(config: &ClientConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn finds_clap_attributes_and_env_var_calls() {
        let src = r#"
            #[arg(long, env = "RESTCSV_API_KEY", hide_env_values = true)]
            #[arg(long, env="RESTCSV_BASE_URL")]
            let x = std::env::var("HOME_DIR");
            let y = env::var_os( "EXTRA" );
            let z = std::env::var("RESTCSV_API_KEY");
            let not_env = environment = "NOPE";
        "#;
        assert_eq!(
            env_vars_in(src),
            vec!["EXTRA", "HOME_DIR", "RESTCSV_API_KEY", "RESTCSV_BASE_URL"]
        );
    }

    #[test]
    fn config_source_declares_the_api_key() {
        let vars = env_vars_in(include_str!("config.rs"));
        assert!(vars.contains(&crate::config::API_KEY_ENV.to_string()), "{vars:?}");
        assert!(vars.contains(&"RESTCSV_BASE_URL".to_string()), "{vars:?}");
    }

    #[test]
    fn renders_mcp_servers_block() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("config.rs");
        std::fs::write(&src, r#"#[arg(env = "RESTCSV_API_KEY")]"#).expect("write");
        let bin = dir.path().join("restcsv-mcp");

        let cfg = client_config("restcsv", &bin, &[src]).expect("config");
        let v: Value = serde_json::from_str(&render(&cfg).expect("render")).expect("json");

        assert_eq!(
            v,
            json!({
                "mcpServers": {
                    "restcsv": {
                        "command": bin.display().to_string(),
                        "args": [],
                        "env": { "RESTCSV_API_KEY": "<REPLACE>" }
                    }
                }
            })
        );
    }

    #[test]
    fn missing_source_names_the_path() {
        let err = client_config("restcsv", Path::new("/bin/true"), &[PathBuf::from("/nope.rs")])
            .expect_err("missing file");
        assert!(err.to_string().contains("/nope.rs"));
    }
}
