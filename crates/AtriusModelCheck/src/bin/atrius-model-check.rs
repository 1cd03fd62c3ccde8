//! Model check executable. See the cli module documentation for usage.

use std::io;
use std::process::ExitCode;

use atrius_model_check::cli::{init_tracing, run, Args, Outcome};
use clap::Parser;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let stdout = io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(Outcome::Passed) => ExitCode::SUCCESS,
        Ok(Outcome::Failed) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
