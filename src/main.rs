use std::io;
use std::process::ExitCode;

use clap::Parser;

use qr_outline::app::{self, EXIT_FAILURE};
use qr_outline::{Cli, RqrrDetector};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Nothing left to report to if the terminal is gone
            let _ = e.print();
            // --help and --version are not failures; usage errors exit 1, not clap's 2
            return if e.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter = if cli.verbose { "qr_outline=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let code = app::run(
        &cli,
        &RqrrDetector,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}
