mod config;
mod constants;
mod core_cli;
mod core_ftp;
mod core_log;
mod core_session;
mod core_shell;

use crate::config::{log_config, Config};
use crate::core_cli::Cli;
use crate::core_ftp::FtpClient;
use crate::core_log::logger::init_logger;
use crate::core_session::{Session, TransferSettings};
use crate::core_shell::{Shell, ShellCommand};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::io::{stdin, stdout, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    init_logger(args.verbose);

    let config = Config::resolve(args.config.as_deref())?;
    info!("Configuration:");
    log_config(&config);

    let client = FtpClient::new(config.client.port);
    let session = Session::new(client, TransferSettings::from_config(&config.client));
    let mut shell = Shell::new(session, config.client.server.clone());
    let mut out = stdout();

    // Connect and log in from the command line before going interactive
    if let Some(server) = args.server {
        shell
            .execute(ShellCommand::Open(Some(server)), &mut out)
            .await
            .context("Failed to write to stdout")?;
        if let Some(user) = args.user {
            shell
                .execute(
                    ShellCommand::Login {
                        user,
                        password: args.password.unwrap_or_default(),
                    },
                    &mut out,
                )
                .await
                .context("Failed to write to stdout")?;
        }
    }

    shell
        .run(BufReader::new(stdin()), &mut out)
        .await
        .context("Failed to run the interactive shell")?;

    info!("Session closed");
    Ok(())
}
