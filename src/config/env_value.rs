// ABOUTME: Fixture environment values with interpolation support.
// ABOUTME: Handles literal values and references to the caller's environment.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
        }
    }
}

/// Resolve every entry, keeping the name order stable for the run command.
pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(k, v)| v.resolve().map(|resolved| (k.clone(), resolved)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        let value = EnvValue::Literal("postgres".to_string());
        assert_eq!(value.resolve().unwrap(), "postgres");
    }

    #[test]
    fn env_reference_reads_variable() {
        let value = EnvValue::FromEnv {
            var: "DOCKFIX_ENV_VALUE_TEST".to_string(),
            default: None,
        };
        temp_env::with_var("DOCKFIX_ENV_VALUE_TEST", Some("from-env"), || {
            assert_eq!(value.resolve().unwrap(), "from-env");
        });
    }

    #[test]
    fn missing_variable_uses_default_or_fails() {
        temp_env::with_var_unset("DOCKFIX_ENV_VALUE_MISSING", || {
            let with_default = EnvValue::FromEnv {
                var: "DOCKFIX_ENV_VALUE_MISSING".to_string(),
                default: Some("fallback".to_string()),
            };
            assert_eq!(with_default.resolve().unwrap(), "fallback");

            let without_default = EnvValue::FromEnv {
                var: "DOCKFIX_ENV_VALUE_MISSING".to_string(),
                default: None,
            };
            assert!(matches!(
                without_default.resolve(),
                Err(Error::MissingEnvVar(var)) if var == "DOCKFIX_ENV_VALUE_MISSING"
            ));
        });
    }
}
