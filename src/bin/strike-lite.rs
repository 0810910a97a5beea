use std::process::ExitCode;

fn main() -> ExitCode {
    strike::entry::run_lite()
}
