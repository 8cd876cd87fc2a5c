//! Config subcommand handlers.

use kemp_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, ConfigInitArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Copy of the config with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, profile)| {
            let mut profile = profile.clone();
            if profile.password.is_some() {
                profile.password = Some(REDACTED.into());
            }
            (name.clone(), profile)
        })
        .collect();

    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: cfg.defaults.clone(),
        profiles,
    }
}

fn init(args: ConfigInitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let endpoint = global.endpoint.clone().ok_or_else(|| CliError::Validation {
        field: "endpoint".into(),
        reason: "pass --endpoint (or set KEMP_ENDPOINT)".into(),
    })?;
    let username = global.username.clone().ok_or_else(|| CliError::Validation {
        field: "username".into(),
        reason: "pass --username".into(),
    })?;
    kemp_config::parse_endpoint(&endpoint)?;

    let path = kemp_config::config_path();
    let mut cfg = kemp_config::load_config_from(&path)?;

    // A password given on the command line is only persisted when no
    // env var was named for it.
    let password = if args.password_env.is_none() {
        global.password.clone()
    } else {
        None
    };

    let profile = Profile {
        endpoint,
        username: Some(username),
        password,
        password_env: args.password_env,
        insecure: args.verify_tls.then_some(false),
        ..Profile::default()
    };

    if args.set_default || cfg.profiles.is_empty() {
        cfg.default_profile = Some(args.name.clone());
    }
    cfg.profiles.insert(args.name.clone(), profile);
    kemp_config::save_config_to(&cfg, &path)?;

    if !global.quiet {
        eprintln!("Profile '{}' saved to {}", args.name, path.display());
    }
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&kemp_config::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Show => {
            let loaded = kemp_config::load_config()?;
            let format = config::output_format(global, &loaded)?;
            let cfg = redacted(&loaded);
            let out = match format {
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to serialize config: {e}"),
                    })?
                }
                _ => output::render_single(&format, &cfg, |_| String::new(), |_| {
                    String::new()
                })?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init(init_args) => init(init_args, global),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn show_masks_plaintext_passwords() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "lab".to_owned(),
            Profile {
                endpoint: "https://10.0.0.5/access/".into(),
                password: Some("hunter2".into()),
                password_env: Some("LAB_PW".into()),
                ..Profile::default()
            },
        );
        let cfg = Config {
            profiles,
            ..Config::default()
        };

        let masked = redacted(&cfg);
        let lab = &masked.profiles["lab"];
        assert_eq!(lab.password.as_deref(), Some(REDACTED));
        assert_eq!(lab.password_env.as_deref(), Some("LAB_PW"));
    }
}
