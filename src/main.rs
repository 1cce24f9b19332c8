use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    multiview::logging::init().context("init logging")?;

    let args = multiview::cli::ServeArgs::parse();
    tracing::debug!(?args, "parsed cli");

    multiview::server::run(args).await.context("serve")?;

    Ok(())
}
