//! Suna dev launcher - demo mock services and local environment bootstrap

use clap::Parser;

use suna_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
