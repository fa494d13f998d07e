use std::process::ExitCode;

fn main() -> ExitCode {
    barkeep_cli::run()
}
