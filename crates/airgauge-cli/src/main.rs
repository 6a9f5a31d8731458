use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use airgauge_cli::cli::{Cli, Commands, RunArgs};
use airgauge_cli::commands::{cmd_config, cmd_history, cmd_run};
use airgauge_cli::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "airgauge", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::path);
    let config = Config::load(&config_path);
    let output = cli.output.as_ref();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => cmd_run(&config, &args, cli.quiet, output).await,
        Commands::History { location, format } => {
            cmd_history(&config, location.as_deref(), format, output)
        }
        Commands::Config { action } => cmd_config(&action, &config_path, &config, output),
        Commands::Completions { .. } => unreachable!("handled before tracing init"),
    }
}
