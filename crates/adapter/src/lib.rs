//! RestCSV MCP adapter.
//!
//! Serves the RestCSV API as MCP tools over stdio. Each tool call is validated, forwarded as
//! one HTTP request, and answered with the response body as text.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod settings;
pub mod validate;

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::server::RestCsvServer;
use restcsv_http_tools::runtime::HttpToolSource;

/// Build the server from validated configuration.
///
/// # Errors
///
/// Returns an error if the catalog or the tool source cannot be built.
pub fn build_server(config: &AdapterConfig) -> Result<RestCsvServer> {
    let source = HttpToolSource::new(
        catalog::SOURCE_NAME,
        catalog::server_config(config)?,
        config.timeout,
    )?;
    RestCsvServer::new(source)
}
