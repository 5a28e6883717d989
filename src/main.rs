use anyhow::{Context, Result};
use bizproj::config::Drivers;
use bizproj::manager::Manager;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the baseline parameter snapshot.
    Init,

    /// Project the horizon and write the output tables.
    Run {
        #[arg(long, default_value_t = 7)]
        years: u32,

        #[arg(long, default_value_t = 50)]
        attendees_per_event: u64,

        #[arg(long, default_value_t = 2)]
        events_per_company: u64,

        #[arg(long, default_value_t = 0)]
        external_signups: u64,
    },

    /// Log the headline figures of the last projection.
    Summary,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.project_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Init => mgr.init_params()?,
        Command::Run {
            years,
            attendees_per_event,
            events_per_company,
            external_signups,
        } => mgr.run_projection(Drivers {
            years,
            attendees_per_event,
            events_per_company_per_month: events_per_company,
            external_signups_per_month: external_signups,
        })?,
        Command::Summary => mgr.show_summary()?,
    }

    Ok(())
}
