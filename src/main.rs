use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use courseflow::assemble::{ExportOutcome, Exporter};
use courseflow::cli::{Cli, Command};
use courseflow::config::ExportConfig;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    courseflow::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Export(args) => {
            let config = ExportConfig::from_args(&args).context("load config")?;
            let exporter = Exporter::from_config(&config)?;
            match exporter.export_all().context("export")? {
                ExportOutcome::Exported(count) => tracing::info!(courses = count, "export finished"),
                ExportOutcome::NothingToExport => tracing::info!("nothing to export"),
            }
        }
        Command::Course(args) => {
            let config = ExportConfig::from_args(&args.export).context("load config")?;
            let exporter = Exporter::from_config(&config)?;
            exporter
                .build_course_documents(&args.slug)
                .with_context(|| format!("export course {}", args.slug))?;
        }
        Command::Flow(args) => {
            let config = ExportConfig::from_args(&args.export).context("load config")?;
            let exporter = Exporter::from_config(&config)?;
            exporter
                .build_flow(&args.chapter, args.ordinal)
                .with_context(|| format!("export chapter {}", args.chapter))?;
        }
    }

    Ok(())
}
