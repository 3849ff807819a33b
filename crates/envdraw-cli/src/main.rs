//! Envdraw CLI - Replay program traces as environment diagrams

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialized inside run() once the flags are known
    let mut app = cli::EnvdrawApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
