//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::config::schema::UpdaterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value '{}' for environment variable {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<UpdaterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load the optional TOML file, overlay the process environment, validate.
///
/// The environment is read exactly once, here.
pub fn load_config(path: Option<&Path>) -> Result<UpdaterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => UpdaterConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay deployment variables onto `config`.
///
/// `lookup` resolves a variable name; unset variables leave the field alone.
/// `RLBU_ENVIRONMENT` wins over `CI_ENVIRONMENT_SLUG` when both are set.
pub fn apply_env_overrides<F>(config: &mut UpdaterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cp = &mut config.control_plane;
    set_string(&mut cp.base_url, lookup("RANCHER_URL"));
    set_string(&mut cp.access_key, lookup("RANCHER_ACCESS_KEY"));
    set_string(&mut cp.secret_key, lookup("RANCHER_SECRET_KEY"));
    set_string(&mut cp.load_balancer_id, lookup("RANCHER_LB_ID"));
    set_string(&mut cp.project_id, lookup("RANCHER_ENVIRONMENT"));

    let rule = &mut config.rule;
    set_string(&mut rule.protocol, lookup("RANCHER_LB_PROTOCOL"));
    set_string(&mut rule.rule_type, lookup("RANCHER_LB_TYPE"));
    set_string(&mut rule.project_slug, lookup("CI_PROJECT_PATH_SLUG"));
    set_string(&mut rule.environment_slug, lookup("CI_ENVIRONMENT_SLUG"));
    set_string(&mut rule.environment_slug, lookup("RLBU_ENVIRONMENT"));
    set_string(&mut rule.domain, lookup("ENV_DOMAIN"));
    set_parsed(&mut rule.external_port, "EXTERNAL_PORT", lookup("EXTERNAL_PORT"))?;
    set_parsed(&mut rule.internal_port, "INTERNAL_PORT", lookup("INTERNAL_PORT"))?;

    if let Some(value) = lookup("RLBU_PORT") {
        let port: u16 = parse_env("RLBU_PORT", value)?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    Ok(())
}

fn set_string(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn set_parsed<T: FromStr>(
    field: &mut T,
    var: &'static str,
    value: Option<String>,
) -> Result<(), ConfigError> {
    if let Some(value) = value {
        *field = parse_env(var, value)?;
    }
    Ok(())
}

fn parse_env<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_fill_config() {
        let mut config = UpdaterConfig::default();
        let lookup = lookup_from(&[
            ("RANCHER_URL", "http://rancher.local:8080"),
            ("RANCHER_ACCESS_KEY", "ak"),
            ("RANCHER_SECRET_KEY", "sk"),
            ("RANCHER_LB_ID", "1s9"),
            ("RANCHER_ENVIRONMENT", "1a5"),
            ("CI_PROJECT_PATH_SLUG", "group-app"),
            ("CI_ENVIRONMENT_SLUG", "review-x"),
            ("ENV_DOMAIN", "apps.example.com"),
            ("EXTERNAL_PORT", "8000"),
            ("INTERNAL_PORT", " 3000 "),
            ("RLBU_PORT", "8081"),
        ]);
        apply_env_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.control_plane.base_url, "http://rancher.local:8080");
        assert_eq!(config.control_plane.project_id, "1a5");
        assert_eq!(config.rule.environment_slug, "review-x");
        assert_eq!(config.rule.protocol, "http");
        assert_eq!(config.rule.external_port, 8000);
        assert_eq!(config.rule.internal_port, 3000);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rlbu_environment_takes_precedence() {
        let mut config = UpdaterConfig::default();
        let lookup = lookup_from(&[
            ("CI_ENVIRONMENT_SLUG", "review-x"),
            ("RLBU_ENVIRONMENT", "staging"),
        ]);
        apply_env_overrides(&mut config, lookup).unwrap();
        assert_eq!(config.rule.environment_slug, "staging");
    }

    #[test]
    fn test_unset_env_keeps_defaults() {
        let mut config = UpdaterConfig::default();
        apply_env_overrides(&mut config, |_| None).unwrap();
        assert_eq!(config, UpdaterConfig::default());
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let mut config = UpdaterConfig::default();
        let err = apply_env_overrides(&mut config, lookup_from(&[("EXTERNAL_PORT", "eighty")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'eighty' for environment variable EXTERNAL_PORT"
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_config_file(Path::new("/nonexistent/lb-updater.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
