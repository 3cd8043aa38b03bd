mod cli;
mod settings;
mod snapshot;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    snapshot::run(cli::parse()).await
}
