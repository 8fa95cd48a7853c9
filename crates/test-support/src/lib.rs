//! Shared helpers for the adapter's tests: a recording stand-in for the RestCSV API and a
//! minimal MCP client that drives the server binary over stdio.

mod mock_api;
mod stdio;

use anyhow::Context as _;
use std::net::TcpListener;

pub use mock_api::{MISSING_ID, MockApi, RecordedRequest};
pub use stdio::StdioMcpSession;

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process to bind it
/// before you do. Tests use it to get an address nothing is listening on.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
/// local address cannot be read.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}
