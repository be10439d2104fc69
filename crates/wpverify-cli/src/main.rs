//! wpverify CLI - Command-line utility for verifying the integrity of
//! WordPress installations.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose);

    let Some(search_root) = cli.path.as_deref() else {
        cli::Cli::command().print_help()?;
        return Ok(());
    };

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.json && !cli.quiet && progress::ScanProgress::should_show();

    if let Err(e) = commands::audit::execute(&cli.audit, search_root, &*formatter, show_progress) {
        formatter.format_error(&e);
        std::process::exit(1);
    }
    Ok(())
}
