//! Runtime configuration read from the environment.

use crate::{
    error::{Result, TaskifyError},
    session::{FailurePolicy, SessionOptions},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "TASKIFY_DATA_DIR";
pub const FAILURE_POLICY_VAR: &str = "TASKIFY_FAILURE_POLICY";
pub const PERSIST_SOURCE_LIST_VAR: &str = "TASKIFY_PERSIST_SOURCE_LIST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root under which file storage keeps its `.taskify` directory
    pub data_dir: PathBuf,
    pub failure_policy: FailurePolicy,
    /// Also persist the source list's renumbered cards on cross-list moves
    pub persist_source_list: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            failure_policy: FailurePolicy::default(),
            persist_source_list: false,
        }
    }
}

impl Config {
    /// Reads configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(policy) = lookup(FAILURE_POLICY_VAR) {
            config.failure_policy = policy.parse()?;
        }
        if let Some(flag) = lookup(PERSIST_SOURCE_LIST_VAR) {
            config.persist_source_list = parse_bool(PERSIST_SOURCE_LIST_VAR, &flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(TaskifyError::ConfigError(format!(
                "{} must not be empty",
                DATA_DIR_VAR
            )));
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            failure_policy: self.failure_policy,
            persist_source_list: self.persist_source_list,
        }
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(TaskifyError::ConfigError(format!(
            "{} must be true or false, got '{}'",
            var, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.failure_policy, FailurePolicy::Refetch);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/taskify"),
            (FAILURE_POLICY_VAR, "keep-local"),
            (PERSIST_SOURCE_LIST_VAR, "true"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/taskify"));
        assert_eq!(config.failure_policy, FailurePolicy::KeepLocal);
        assert!(config.persist_source_list);

        let options = config.session_options();
        assert!(options.persist_source_list);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(FAILURE_POLICY_VAR, "rollback")])),
            Err(TaskifyError::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(PERSIST_SOURCE_LIST_VAR, "maybe")])),
            Err(TaskifyError::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(DATA_DIR_VAR, "")])),
            Err(TaskifyError::ConfigError(_))
        ));
    }
}
