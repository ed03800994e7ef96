//! Stoo - StooKV command-line client.
//!
//! Usage:
//!   stoo --endpoint localhost:50051 get -n my-app -p prod database.username
//!   stoo --config stoo.toml set database.username root
//!   stoo --tls --ca-cert ca.pem --server-name stookv.example.com get-all -n my-app -p prod

use anyhow::Result;
use clap::Parser;
use stoo::cli::commands::run;
use stoo::cli::{init_tracing, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());
    run(cli).await
}
