use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rustyhttp::config::ServerConfig;
use rustyhttp::handler::endpoints::default_router;
use rustyhttp::handler::storage::DirectoryStorage;
use rustyhttp::net::server::Server;

#[derive(Debug, Parser)]
#[command(name = "rustyhttp", about = "Minimal HTTP/1.1 server")]
struct Args {
    /// Directory served by the /files endpoints
    #[arg(long)]
    directory: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    address: Option<IpAddr>,

    #[arg(long)]
    port: Option<u16>,
}

#[async_std::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path),
        None => ServerConfig::default(),
    };
    if let Some(directory) = args.directory {
        config.files_directory = directory;
    }
    if let Some(address) = args.address {
        config.address = address;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let storage = DirectoryStorage::new(config.files_directory.clone());
    let server = Server::bind(&config, default_router(Arc::new(storage))).await?;
    server.run().await
}
