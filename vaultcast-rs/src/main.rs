//! Vaultcast CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vaultcast::cli::args::{Cli, Commands, IndexCommands};
use vaultcast::cli::output::Output;
use vaultcast::cli::{categories, index, publish, sync, Session};
use vaultcast::config::Config;
use vaultcast::error::{ExitCode as SyncExitCode, SyncError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
                if let Some(hint) = e.hint() {
                    eprintln!("{}", hint);
                }
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. RUST_LOG wins over -v/-q.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultcast={}", cli.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<SyncExitCode, SyncError> {
    let config = Config::load(cli.config.as_deref())?;
    let session = Session::new(config, cli);

    // Create output helper
    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::Sync(args) => sync::run(&session, args, &output),
        Commands::Publish(args) => publish::run(&session, args, &output),
        Commands::NoteInfo(args) => {
            index::note_info(&session.open_index()?, &args.title, &output)
        }
        Commands::Index(args) => match &args.command {
            IndexCommands::List => index::list(&session.open_index()?, &output),
        },
        Commands::Categories => {
            let (client, _) = session.connect()?;
            categories::run(&client, &output)
        }
    }
}
