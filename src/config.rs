use log::debug;
use thiserror::Error;

use std::env;

use crate::ledger::{AccountId, PrivateKey};

const OPERATOR_ID_VAR: &str = "OPERATOR_ID";
const OPERATOR_KEY_VAR: &str = "OPERATOR_KEY";

/// Errors that can occur while loading the operator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid {variable}: {reason}")]
    InvalidVariable {
        variable: &'static str,
        reason: String,
    },

    #[error("Unreadable .env file: {0}")]
    UnreadableEnvFile(String),
}

/// The operator identity loaded from the environment
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    /// The operator's account on the ledger
    pub account_id: AccountId,

    /// The key that signs and pays for the operator's transactions
    pub private_key: PrivateKey,
}

impl OperatorConfig {
    /// Loads the operator identity from a `.env` file and the process
    /// environment
    ///
    /// A missing `.env` file is tolerated since the variables may already be
    /// set; a file that exists but cannot be read or parsed is fatal, as is
    /// a missing or malformed variable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_env_file(dotenvy::dotenv().map(|path| {
            debug!("Loaded environment from {}", path.display());
        }))?;

        Self::from_env()
    }

    fn load_env_file(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.not_found() => {
                debug!("No .env file found");
                Ok(())
            }
            Err(err) => Err(ConfigError::UnreadableEnvFile(err.to_string())),
        }
    }

    /// Reads the operator identity from the process environment only
    pub fn from_env() -> Result<Self, ConfigError> {
        let id = env::var(OPERATOR_ID_VAR)
            .map_err(|_| ConfigError::MissingVariable(OPERATOR_ID_VAR))?;
        let key = env::var(OPERATOR_KEY_VAR)
            .map_err(|_| ConfigError::MissingVariable(OPERATOR_KEY_VAR))?;

        Self::parse(&id, &key)
    }

    fn parse(id: &str, key: &str) -> Result<Self, ConfigError> {
        let account_id = id
            .parse::<AccountId>()
            .map_err(|e| ConfigError::InvalidVariable {
                variable: OPERATOR_ID_VAR,
                reason: e.to_string(),
            })?;

        let private_key = key
            .parse::<PrivateKey>()
            .map_err(|e| ConfigError::InvalidVariable {
                variable: OPERATOR_KEY_VAR,
                reason: e.to_string(),
            })?;

        Ok(OperatorConfig {
            account_id,
            private_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_configuration() {
        let key = PrivateKey::generate();
        let config = OperatorConfig::parse("0.0.2", &key.to_string()).unwrap();

        assert_eq!(config.account_id, AccountId::new(0, 0, 2));
        assert_eq!(config.private_key.to_bytes(), key.to_bytes());
    }

    #[test]
    fn test_parse_rejects_malformed_account_id() {
        let key = PrivateKey::generate();
        let result = OperatorConfig::parse("not-an-id", &key.to_string());

        assert!(matches!(
            result,
            Err(ConfigError::InvalidVariable {
                variable: "OPERATOR_ID",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_key() {
        let result = OperatorConfig::parse("0.0.2", "zzzz");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidVariable {
                variable: "OPERATOR_KEY",
                ..
            })
        ));
    }

    #[test]
    fn test_unreadable_env_file_is_fatal() {
        let path = env::temp_dir().join(format!("tinybar-env-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, "THIS IS NOT == a valid ; env file\n%%%\n").unwrap();

        let result = OperatorConfig::load_env_file(dotenvy::from_path(&path));
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::UnreadableEnvFile(_))));
    }

    #[test]
    fn test_missing_env_file_is_tolerated() {
        let path = env::temp_dir().join(format!("tinybar-env-{}", uuid::Uuid::new_v4()));
        assert!(OperatorConfig::load_env_file(dotenvy::from_path(&path)).is_ok());
    }

    // The only test that touches these process-wide variables, so it cannot
    // race with other tests in the same binary.
    #[test]
    fn test_missing_variables_are_fatal() {
        env::remove_var(OPERATOR_ID_VAR);
        env::remove_var(OPERATOR_KEY_VAR);

        assert!(matches!(
            OperatorConfig::from_env(),
            Err(ConfigError::MissingVariable("OPERATOR_ID"))
        ));
    }
}
