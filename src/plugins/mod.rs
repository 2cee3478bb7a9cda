mod logins;
mod passwd_expiry;

use colored::Colorize;

use crate::cli::PluginKind;
use crate::config::Config;
use crate::constants::{
    PLUGIN_LOGIN_COUNT,
    PLUGIN_PASSWORD_EXPIRY,
};
use crate::entity::action::{
    Action,
    Progress,
};
use crate::errors::SysprovError;
use crate::utils::host::Host;

const PLUGINS: [(&str, &str); 2] = [
    (PLUGIN_LOGIN_COUNT, "login-count"),
    (PLUGIN_PASSWORD_EXPIRY, "password-expiry"),
];

/// Writes executable plugin wrappers calling `exe plugin <name>`
/// into the agent's plugin directory. Existing copies are replaced.
pub fn deploy(host: &dyn Host, config: &Config, exe: &str) -> Result<Vec<Action>, SysprovError> {
    let mut progress = Progress::new();

    host.create_dir_all(&config.plugin_dir)?;

    for (file, subcommand) in PLUGINS {
        let path = config.plugin_dir.join(file);
        let script = wrapper_script(exe, subcommand);

        let result = host
            .write(&path, &script)
            .and_then(|_| host.set_mode(&path, 0o755));

        progress.record(Action::DeployPlugin(path.display().to_string()), result)?;
        println!("{}", format!("Deployed plugin {}", path.display()).green());
    }

    Ok(progress.into_actions())
}

fn wrapper_script(exe: &str, subcommand: &str) -> String {
    let exe = shlex::try_quote(exe)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| exe.to_string());

    format!("#!/bin/sh\nexec {exe} plugin {subcommand}\n")
}

/// Prints the plugin's section to stdout
pub fn run_plugin(host: &dyn Host, config: &Config, kind: PluginKind) -> Result<(), SysprovError> {
    let section = match kind {
        PluginKind::LoginCount => logins::login_count(host)?,
        PluginKind::PasswordExpiry => {
            let today = chrono::Local::now().date_naive();
            passwd_expiry::password_expiry(host, config, today)?
        }
    };

    print!("{section}");

    Ok(())
}
