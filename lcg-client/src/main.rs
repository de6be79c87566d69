use anyhow::{Context, Result};
use clap::Parser;
use lcg_client::confirm::StdinConfirm;
use lcg_client::render::TextReport;
use lcg_client::{execute, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("LCG client starting...");

    let report = execute(&cli.command, &mut StdinConfirm).context("Run failed")?;

    if cli.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        print!("{}", TextReport(&report));
    }

    Ok(())
}
