use clap::Parser;
use std::process::ExitCode;
use tidymeta::cli::{Cli, run_cli};
use tidymeta::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
