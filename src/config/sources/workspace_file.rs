//! Relay settings kept next to a deployment: `config/config.toml`, then an
//! overlay named by `CTXRELAY_ENV` (`config/staging.toml` and so on).

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_VAR: &str = "CTXRELAY_ENV";
const DEFAULT_ENV: &str = "development";

/// Deployment environment selecting the overlay file.
pub fn environment_name() -> String {
    std::env::var(ENV_VAR)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string())
}

/// Existing relay config files under `workspace_root`, lowest precedence first.
pub fn existing_files(workspace_root: &Path, env_name: &str) -> Vec<PathBuf> {
    let dir = workspace_root.join("config");
    [dir.join("config.toml"), dir.join(format!("{env_name}.toml"))]
        .into_iter()
        .filter(|path| path.is_file())
        .collect()
}

pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = environment_name();
    for path in existing_files(workspace_root, &env_name) {
        debug!(config_path = %path.display(), env = %env_name, "Adding relay config file");
        builder = builder.add_source(File::from(path).required(false));
    }
    Ok(builder)
}
