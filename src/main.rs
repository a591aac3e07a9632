use raidplan::engine::Navigator;
use raidplan::shell::command::parse_command;
use raidplan::shell::protocol::{handle_command, Flow};
use std::io::{self, BufRead};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut navigator = Navigator::new();

    for line in stdin.lock().lines() {
        let input = match line {
            Ok(input) => input,
            Err(err) => {
                error!(%err, "failed to read stdin");
                return ExitCode::FAILURE;
            }
        };

        if let Some(cmd) = parse_command(&input) {
            match handle_command(&cmd, &mut navigator, &mut stdout) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => {
                    eprintln!("error: {:#}", err);
                    if navigator.options.strict_mode {
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
    }

    ExitCode::SUCCESS
}
