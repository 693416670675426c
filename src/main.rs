use clap::Parser;
use fnosignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
