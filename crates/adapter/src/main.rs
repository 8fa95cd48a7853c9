use anyhow::Context as _;
use clap::Parser;
use restcsv_mcp::config::{AdapterConfig, Cli};
use rmcp::ServiceExt as _;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    restcsv_mcp::logging::init(&cli.log_level, cli.log_format)?;

    let config = match AdapterConfig::from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "refusing to start");
            return Err(e.into());
        }
    };

    let server = restcsv_mcp::build_server(&config)?;
    info!(
        base_url = %config.base_url,
        tools = server.tools().len(),
        "starting RestCSV MCP server on stdio"
    );

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("initialize MCP session over stdio")?;
    let reason = service.waiting().await.context("MCP service task")?;
    info!(?reason, "MCP session ended");

    Ok(())
}
