//! Figura - command-line tool for composing avatar draw definitions

use std::process::ExitCode;

use figura::cli;

fn main() -> ExitCode {
    env_logger::init();
    cli::run()
}
