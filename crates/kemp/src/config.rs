//! Flag-aware profile resolution.
//!
//! `kemp-config` owns the TOML file; this module layers the global CLI
//! flags on top and produces the `ClientConfig` the commands run against.

use clap::ValueEnum;
use secrecy::SecretString;

use kemp_api::{ClientConfig, Credentials};
use kemp_config::{Config, Profile};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Profile selected by `--profile`, then `default_profile`, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// `--output` / `KEMP_OUTPUT`, then `[defaults].output`.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(ref format) = global.output {
        return Ok(format.clone());
    }
    OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!("unknown output format '{}'", cfg.defaults.output),
    })
}

/// Build a `ClientConfig` from the loaded config, the active profile, and
/// CLI overrides. Flags win over the profile, the profile over `[defaults]`.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let name = active_profile_name(global, cfg);

    let mut profile = if let Some(profile) = cfg.profiles.get(&name) {
        profile.clone()
    } else if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    } else {
        // No profile: flags and env vars alone must be enough.
        let endpoint = global.endpoint.clone().ok_or_else(|| CliError::NoConfig {
            path: kemp_config::config_path().display().to_string(),
        })?;
        Profile {
            endpoint,
            ..Profile::default()
        }
    };

    apply_overrides(&mut profile, global);

    let credentials = match global.password {
        Some(ref pw) => Credentials::new(
            kemp_config::resolve_username(&profile, &name)?,
            SecretString::from(pw.clone()),
        ),
        None => kemp_config::resolve_credentials(&profile, &name)?,
    };

    Ok(kemp_config::profile_to_client_config(
        &profile,
        &cfg.defaults,
        credentials,
    )?)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.strict_tls {
        profile.insecure = Some(false);
    } else if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.debug {
        profile.debug = Some(true);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use clap::Parser;
    use kemp_api::TlsMode;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["kemp"];
        argv.extend_from_slice(args);
        argv.push("stats");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_config() -> Config {
        let mut profiles = HashMap::new();
        profiles.insert(
            "lab".to_owned(),
            Profile {
                endpoint: "https://10.0.0.5/access/".into(),
                username: Some("bal".into()),
                password: Some("plain".into()),
                insecure: Some(false),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        Config {
            default_profile: Some("lab".into()),
            profiles,
            ..Config::default()
        }
    }

    #[test]
    fn flags_override_profile() {
        let opts = global(&[
            "--endpoint",
            "https://10.9.9.9/access/",
            "--password",
            "flagpw",
            "--timeout",
            "3",
            "--insecure",
        ]);
        let resolved = resolve_client_config(&opts, &lab_config()).unwrap();
        assert_eq!(resolved.endpoint.as_str(), "https://10.9.9.9/access/");
        assert_eq!(resolved.credentials.username(), "bal");
        assert_eq!(resolved.transport.timeout, Duration::from_secs(3));
        assert!(matches!(
            resolved.transport.tls,
            TlsMode::DangerAcceptInvalid
        ));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let resolved = resolve_client_config(&global(&[]), &lab_config()).unwrap();
        assert_eq!(resolved.endpoint.as_str(), "https://10.0.0.5/access/");
        assert_eq!(resolved.transport.timeout, Duration::from_secs(10));
        assert!(matches!(resolved.transport.tls, TlsMode::System));
    }

    #[test]
    fn strict_tls_beats_the_insecure_default() {
        let cfg = Config::default();
        let opts = global(&[
            "--endpoint",
            "https://lb/access/",
            "--username",
            "bal",
            "--password",
            "x",
            "--strict-tls",
        ]);
        let resolved = resolve_client_config(&opts, &cfg).unwrap();
        assert!(matches!(resolved.transport.tls, TlsMode::System));
    }

    #[test]
    fn flags_alone_default_to_insecure() {
        let opts = global(&[
            "--endpoint",
            "https://lb/access/",
            "--username",
            "bal",
            "--password",
            "x",
        ]);
        let resolved = resolve_client_config(&opts, &Config::default()).unwrap();
        assert!(matches!(
            resolved.transport.tls,
            TlsMode::DangerAcceptInvalid
        ));
        assert_eq!(resolved.transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_profile_lists_alternatives() {
        let err = resolve_client_config(&global(&["--profile", "prod"]), &lab_config()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nothing_configured_is_no_config() {
        let err = resolve_client_config(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn output_falls_back_to_config_defaults() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json-compact".into();
        let format = output_format(&global(&[]), &cfg).unwrap();
        assert!(matches!(format, OutputFormat::JsonCompact));

        let format = output_format(&global(&["--output", "yaml"]), &cfg).unwrap();
        assert!(matches!(format, OutputFormat::Yaml));
    }

    #[test]
    fn unknown_default_output_is_rejected() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();
        let err = output_format(&global(&[]), &cfg).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "defaults.output"));
    }
}
