use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "astrolabe",
    version,
    about = "Multi-provider AI gateway with priority fallback"
)]
pub struct Cli {
    /// Path to the gateway configuration file
    #[arg(long)]
    pub config: Option<String>,
    /// Address the REST server listens on
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub rest_addr: SocketAddr,
}
