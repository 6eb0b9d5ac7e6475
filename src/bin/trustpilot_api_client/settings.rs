//! Merge command-line flags with config and env files into session options.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use trustpilot::config::{
    ENV_API_HOST, ENV_API_KEY, ENV_API_SECRET, ENV_API_VERSION, ENV_PASSWORD, ENV_TOKEN_ISSUER_HOST, ENV_USERNAME,
};
use trustpilot::SessionOptions;

use crate::cli::Cli;

/// Host used by the command-line tool when none is given
pub const CLI_DEFAULT_HOST: &str = "https://api.tp-staging.com";
const CLI_DEFAULT_VERSION: &str = "v1";

/// Load `TRUSTPILOT_*` values from a JSON config file and a dotenv file.
/// Values from the env file win over the config file.
pub fn load_values(config: Option<&Path>, env_file: Option<&Path>) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();

    if let Some(path) = config {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let json: HashMap<String, Value> =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        for (key, value) in json {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            values.insert(key, value);
        }
    }

    if let Some(path) = env_file {
        let entries = dotenvy::from_path_iter(path).with_context(|| format!("reading {}", path.display()))?;
        for entry in entries {
            let (key, value) = entry.with_context(|| format!("parsing {}", path.display()))?;
            values.insert(key, value);
        }
    }

    Ok(values)
}

/// Build session options: flag or environment variable first, then the
/// loaded file values, then the command-line defaults.
pub fn session_options(cli: &Cli, values: &HashMap<String, String>) -> Result<SessionOptions> {
    let pick = |flag: &Option<String>, key: &str| {
        flag.clone()
            .filter(|v| !v.is_empty())
            .or_else(|| values.get(key).filter(|v| !v.is_empty()).cloned())
    };

    let Some(api_key) = pick(&cli.key, ENV_API_KEY) else {
        bail!("Missing argument: {}", ENV_API_KEY);
    };

    Ok(SessionOptions {
        api_host: Some(pick(&cli.host, ENV_API_HOST).unwrap_or_else(|| CLI_DEFAULT_HOST.to_string())),
        api_version: Some(pick(&cli.api_version, ENV_API_VERSION).unwrap_or_else(|| CLI_DEFAULT_VERSION.to_string())),
        api_key: Some(api_key),
        api_secret: pick(&cli.secret, ENV_API_SECRET),
        token_issuer_host: pick(&cli.token_issuer_host, ENV_TOKEN_ISSUER_HOST),
        username: pick(&cli.username, ENV_USERNAME),
        password: pick(&cli.password, ENV_PASSWORD),
        ..SessionOptions::default()
    })
}
