#![forbid(unsafe_code)]

mod config;
mod entry;
mod logging;
mod permissions;
mod server;
mod support;
mod tools;

pub(crate) use support::*;

use clap::Parser;
use permissions::Permissions;
use termorder_core::{OrderResolver, SiblingPager};
use termorder_storage::SqliteStore;

// Protocol negotiation: clients that send no protocolVersion get this baseline echoed back.
const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "termorder-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) struct McpServer {
    initialized: bool,
    store: SqliteStore,
    pager: SiblingPager,
    permissions: Permissions,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::parse();
    logging::init_tracing(&config.log_filter)?;

    let store = SqliteStore::open(&config.storage_dir)?;
    let pager = SiblingPager::new(OrderResolver::new(config.resolver_config()));
    let permissions = Permissions::new(config.read_only);
    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        batch_limit = pager.resolver().config().batch_limit,
        read_only = config.read_only,
        "termorder mcp server starting"
    );

    let mut server = McpServer::new(store, pager, permissions);
    entry::run_stdio(&mut server)?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}
