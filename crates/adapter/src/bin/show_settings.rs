//! Print an MCP client configuration snippet for `restcsv-mcp`.

use clap::Parser;
use restcsv_mcp::settings;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "restcsv-show-settings",
    about = "Print the mcpServers snippet for restcsv-mcp"
)]
struct Args {
    /// Source files to scan for environment variables
    #[arg(long = "source", default_value = "crates/adapter/src/config.rs")]
    sources: Vec<PathBuf>,

    /// Path to the built server binary
    #[arg(long, default_value = "target/release/restcsv-mcp")]
    binary: PathBuf,

    /// Server name used as the key under `mcpServers`
    #[arg(long, default_value = "restcsv")]
    name: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = settings::client_config(&args.name, &args.binary, &args.sources)?;
    println!("Copy/Paste into your MCP client:");
    println!("{}", settings::render(&config)?);
    Ok(())
}
