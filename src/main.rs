use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use character_browser::cli::{Cli, Commands};
use character_browser::client::ApiClient;
use character_browser::commands;
use character_browser::config::Config;
use character_browser::error::Result;
use character_browser::{logging, output};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);
    output::set_json_output(cli.json);
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "chars", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let client = ApiClient::new(&config.client_settings(cli.timeout))?;
            let accumulator = config.accumulator_config(cli.endpoint.as_deref(), cli.merge_rule);
            log::debug!(
                "endpoint {} (merge rule {:?})",
                accumulator.endpoint,
                accumulator.merge_rule
            );

            match command {
                Commands::List(args) => {
                    commands::list::run(client, accumulator, args).await?;
                }
                Commands::Search(args) => {
                    commands::search::run(client, accumulator, args).await?;
                }
                Commands::Browse => {
                    commands::browse::run(client, accumulator).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
