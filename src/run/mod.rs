use colored::Colorize;

use crate::cli;
use crate::config::Config;
use crate::entity::report::Report;
use crate::errors::SysprovError;
use crate::utils::host::{
    DryRun,
    Host,
    LinuxHost,
};
use crate::{
    fsmanager,
    linux,
    plugins,
    prompt,
    sshtrust,
};

pub fn run(cli_args: cli::Cli) -> Result<(), SysprovError> {
    let config = Config::from_cli(&cli_args);

    match config.dry_run {
        true => dispatch(&DryRun(LinuxHost), &config, cli_args.commands),
        false => dispatch(&LinuxHost, &config, cli_args.commands),
    }
}

fn dispatch(
    host: &dyn Host,
    config: &Config,
    command: Option<cli::Commands>,
) -> Result<(), SysprovError> {
    match command {
        // Plugins run unprivileged under the monitoring agent
        Some(cli::Commands::Plugin(args)) => plugins::run_plugin(host, config, args.plugin),

        // Default is the interactive manager
        None | Some(cli::Commands::FsManager) => {
            warn_non_root();
            fsmanager::run(host, &mut prompt::Stdin, config)
        }

        Some(cli::Commands::DeployPlugins) => {
            warn_non_root();

            let start = std::time::Instant::now();
            let exe = std::env::current_exe().map_err(|err| {
                SysprovError::FileError(err, "failed to locate sysprov executable".to_string())
            })?;

            let actions = plugins::deploy(host, config, &exe.to_string_lossy())?;
            print_report("deploy-plugins", actions, start);

            Ok(())
        }

        Some(cli::Commands::BootstrapSsh(args)) => {
            warn_non_root();

            let start = std::time::Instant::now();
            let actions = sshtrust::bootstrap(
                host,
                &mut prompt::Stdin,
                config,
                &args.user,
                args.pubkey.as_deref(),
            )?;

            print_report("bootstrap-ssh", actions, start);

            Ok(())
        }
    }
}

fn warn_non_root() {
    if !linux::user::is_root() {
        println!("{}", "WARN: running as non-root user".yellow())
    }
}

fn print_report(
    step: &'static str,
    actions: Vec<crate::entity::action::Action>,
    start: std::time::Instant,
) {
    let report = Report {
        step,
        actions,
        duration: start.elapsed(),
    };

    tracing::info!("{report}");
}
