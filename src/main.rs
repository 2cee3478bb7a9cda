mod cli;
mod config;
mod constants;
mod entity;
mod errors;
mod fsmanager;
mod fstab;
mod linux;
mod logging;
mod plugins;
mod prompt;
mod run;
mod sshtrust;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use errors::SysprovError;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logging::init(args.verbose);

    match run::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("error: {err}").red());

            if let SysprovError::StepFailed {
                action_failed,
                actions_performed,
                ..
            } = &err
            {
                eprintln!("{}", format!("failed action: {action_failed:?}").red());

                if !actions_performed.is_empty() {
                    eprintln!("{}", "actions performed before the failure:".red());
                    for action in actions_performed {
                        eprintln!("{}", format!("  {action:?}").red());
                    }
                }
            }

            ExitCode::FAILURE
        }
    }
}
