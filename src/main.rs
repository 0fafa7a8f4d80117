use clap::Parser;
use log::debug;
use std::process::ExitCode;
use typegate::cli;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    cli::init_logging(&args);
    debug!("Starting typegate v{}", env!("CARGO_PKG_VERSION"));

    match cli::run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
