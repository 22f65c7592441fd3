use std::borrow::Borrow;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::services::cluster::DatabaseError;

pub const USERNAME_KEY: &str = "MONGO_DB_USERNAME";
pub const PASSWORD_KEY: &str = "MONGO_DB_PASSWORD";
pub const DATABASE_NAME_KEY: &str = "DATABASE_NAME";

/// Key/value lookup for the secrets the bootstrapper needs.
pub trait SecretSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads secrets from the process environment. Empty values count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl<K, V, S> SecretSource for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|value| value.as_ref().to_string())
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub database_name: String,
}

impl Credentials {
    pub fn load(secrets: &impl SecretSource) -> Result<Self, DatabaseError> {
        Ok(Self {
            username: require(secrets, USERNAME_KEY)?,
            password: require(secrets, PASSWORD_KEY)?,
            database_name: require(secrets, DATABASE_NAME_KEY)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database_name", &self.database_name)
            .finish()
    }
}

fn require(secrets: &impl SecretSource, key: &str) -> Result<String, DatabaseError> {
    secrets
        .get(key)
        .ok_or_else(|| DatabaseError::MissingCredential(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_secrets() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (USERNAME_KEY, "alice"),
            (PASSWORD_KEY, "pw1"),
            (DATABASE_NAME_KEY, "movies"),
        ])
    }

    #[test]
    fn test_load_credentials() {
        let creds = Credentials::load(&full_secrets()).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pw1");
        assert_eq!(creds.database_name, "movies");
    }

    #[test]
    fn test_missing_password_names_the_key() {
        let mut secrets = full_secrets();
        secrets.remove(PASSWORD_KEY);

        match Credentials::load(&secrets) {
            Err(DatabaseError::MissingCredential(key)) => assert_eq!(key, PASSWORD_KEY),
            other => panic!("expected MissingCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_map_source_keeps_empty_values() {
        let mut secrets = full_secrets();
        secrets.insert(DATABASE_NAME_KEY, "");

        let creds = Credentials::load(&secrets).unwrap();
        assert_eq!(creds.database_name, "");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::load(&full_secrets()).unwrap();
        let printed = format!("{:?}", creds);
        assert!(printed.contains("alice"));
        assert!(!printed.contains("pw1"));
    }

    #[test]
    fn test_env_secrets() {
        temp_env::with_vars(
            [
                (USERNAME_KEY, Some("bob")),
                (PASSWORD_KEY, Some("hunter2")),
                (DATABASE_NAME_KEY, Some("watchlist")),
            ],
            || {
                let creds = Credentials::load(&EnvSecrets).unwrap();
                assert_eq!(creds.username, "bob");
                assert_eq!(creds.database_name, "watchlist");
            },
        );
    }

    #[test]
    fn test_env_secrets_empty_value_is_missing() {
        temp_env::with_vars(
            [
                (USERNAME_KEY, Some("")),
                (PASSWORD_KEY, Some("hunter2")),
                (DATABASE_NAME_KEY, Some("watchlist")),
            ],
            || {
                let result = Credentials::load(&EnvSecrets);
                assert!(matches!(result, Err(DatabaseError::MissingCredential(_))));
            },
        );
    }
}
