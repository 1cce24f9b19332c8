use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Static web assets directory (mounted at /assets if it exists).
    #[arg(long, default_value = "web/dist")]
    pub web_dir: PathBuf,
}
