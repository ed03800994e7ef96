//! Key-value commands.
//!
//! Each command uses the explicit scope when both `--namespace` and
//! `--profile` are given and the configured default scope when neither is.
//! Passing only one of them is an error.

use crate::client::StooClient;
use crate::rpc::KvBackend;
use anyhow::{bail, Context, Result};
use clap::Args;
use std::collections::HashMap;

/// Explicit namespace/profile for a single command.
#[derive(Args, Debug, Default, Clone)]
pub struct ScopeArgs {
    /// Namespace (falls back to the default namespace).
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Profile (falls back to the default profile).
    #[arg(short, long)]
    pub profile: Option<String>,
}

impl ScopeArgs {
    /// The explicit scope, or `None` to fall back to the default scope.
    fn explicit(&self) -> Result<Option<(&str, &str)>> {
        match (self.namespace.as_deref(), self.profile.as_deref()) {
            (Some(namespace), Some(profile)) => Ok(Some((namespace, profile))),
            (None, None) => Ok(None),
            _ => bail!("both --namespace and --profile are required to select a scope"),
        }
    }
}

/// Read a key.
#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Key to read.
    pub key: String,
}

/// Write a key.
#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Key to write.
    pub key: String,

    /// Value to store.
    pub value: String,
}

/// Remove a key.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Key to remove.
    pub key: String,
}

/// List a namespace/profile.
#[derive(Args, Debug)]
pub struct GetAllArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Run the get command.
pub async fn run_get<B: KvBackend>(client: &StooClient<B>, args: GetArgs) -> Result<()> {
    let value = match args.scope.explicit()? {
        Some((namespace, profile)) => client.get(namespace, profile, &args.key).await,
        None => client.get_default(&args.key).await,
    }
    .with_context(|| format!("failed to read {}", args.key))?;
    println!("{}", value);
    Ok(())
}

/// Run the set command.
pub async fn run_set<B: KvBackend>(client: &StooClient<B>, args: SetArgs) -> Result<()> {
    let result = match args.scope.explicit()? {
        Some((namespace, profile)) => {
            client
                .set(namespace, profile, &args.key, &args.value)
                .await
        }
        None => client.set_default(&args.key, &args.value).await,
    }
    .with_context(|| format!("failed to set {}", args.key))?;
    println!("{}", result);
    Ok(())
}

/// Run the set-secret command.
pub async fn run_set_secret<B: KvBackend>(client: &StooClient<B>, args: SetArgs) -> Result<()> {
    let result = match args.scope.explicit()? {
        Some((namespace, profile)) => {
            client
                .set_secret(namespace, profile, &args.key, &args.value)
                .await
        }
        None => client.set_secret_default(&args.key, &args.value).await,
    }
    .with_context(|| format!("failed to set secret {}", args.key))?;
    println!("{}", result);
    Ok(())
}

/// Run the delete command.
pub async fn run_delete<B: KvBackend>(client: &StooClient<B>, args: DeleteArgs) -> Result<()> {
    let result = match args.scope.explicit()? {
        Some((namespace, profile)) => client.delete(namespace, profile, &args.key).await,
        None => client.delete_default(&args.key).await,
    }
    .with_context(|| format!("failed to delete {}", args.key))?;
    println!("{}", result);
    Ok(())
}

/// Run the get-all command.
pub async fn run_get_all<B: KvBackend>(client: &StooClient<B>, args: GetAllArgs) -> Result<()> {
    let entries = match args.scope.explicit()? {
        Some((namespace, profile)) => client.get_all_in_scope(namespace, profile).await,
        None => client.get_all_default().await,
    }
    .context("failed to list keys")?;
    for line in render_entries(&entries) {
        println!("{}", line);
    }
    Ok(())
}

/// `key=value` lines sorted by key.
fn render_entries(entries: &HashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("{}={}", key, entries[key]))
        .collect()
}
