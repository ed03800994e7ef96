//! CLI command implementations.

mod kv;

pub use kv::{
    run_delete, run_get, run_get_all, run_set, run_set_secret, DeleteArgs, GetAllArgs, GetArgs,
    ScopeArgs, SetArgs,
};

use crate::cli::{Cli, Commands, ConnectionArgs};
use crate::client::StooClient;
use crate::core::config::{ClientConfig, ConfigFile};
use anyhow::{Context, Result};
use std::path::Path;

/// Load the config file (if any), apply CLI overrides, and finalize.
pub fn load_config(path: Option<&Path>, connection: &ConnectionArgs) -> Result<ClientConfig> {
    let mut file = match path {
        Some(path) => ConfigFile::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigFile::default(),
    };
    file.apply_overrides(&connection.overrides());
    file.into_config().context("invalid client configuration")
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.connection)?;
    let endpoint = config.endpoint().to_string();
    let client = StooClient::connect(config)
        .await
        .with_context(|| format!("failed to connect to {}", endpoint))?;

    let result = match cli.command {
        Commands::Get(args) => run_get(&client, args).await,
        Commands::Set(args) => run_set(&client, args).await,
        Commands::SetSecret(args) => run_set_secret(&client, args).await,
        Commands::Delete(args) => run_delete(&client, args).await,
        Commands::GetAll(args) => run_get_all(&client, args).await,
    };

    client.close();
    result
}
