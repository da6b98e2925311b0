// TermLink - Serial and TCP line terminal
use anyhow::Context;
use clap::Parser;
use termlink::cli::args::{Args, Command};
use termlink::cli::output::ConsoleWriter;
use termlink::cli::{execute_command, load_config, OutputWriter};
use termlink::infrastructure::logging::{default_log_file, init_logging, LogTarget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (config_manager, config) = load_config(&args).context("Failed to load configuration")?;

    // The terminal UI owns the screen, so its logs go to a file.
    let runs_tui = matches!(args.command, None | Some(Command::Tui));
    if runs_tui {
        let log_file = config.global.log_file.clone().unwrap_or_else(default_log_file);
        init_logging(&config.global.log_level, args.verbose, &LogTarget::File(log_file))
            .context("Failed to initialize logging")?;
    } else if !args.quiet {
        init_logging(&config.global.log_level, args.verbose, &LogTarget::Stderr)
            .context("Failed to initialize logging")?;
    }

    let writer = ConsoleWriter::new(args.output.clone());
    if let Err(e) = execute_command(args, config, config_manager).await {
        if writer.write_error(&e.to_string()).is_err() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}
