use std::process::ExitCode;

fn main() -> ExitCode {
    shopassist_cli::run()
}
