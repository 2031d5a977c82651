use std::{io, process::ExitCode};

use clap::Parser;
use deploy_scripts::{
    cli::Cli,
    utils::{report, setup_logging},
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    setup_logging();

    let outcome = cli.run().await;
    ExitCode::from(report(outcome, &mut io::stdout(), &mut io::stderr()))
}
