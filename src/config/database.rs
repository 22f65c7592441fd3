use std::fmt;
use std::time::Duration;

use mongodb::options::ServerApiVersion;
use tokio::time::timeout;
use tracing::{error, info};

use crate::config::secrets::{Credentials, EnvSecrets, SecretSource};
use crate::services::cluster::{Connector, DatabaseError, MongoConnector};
use crate::services::database::DatabaseHandle;

pub const CLUSTER_HOST: &str = "movielist.3cizhk9.mongodb.net";
pub const SCHEME: &str = "mongodb+srv";
pub const URI_OPTIONS: &str = "retryWrites=true&w=majority";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection string for the cluster. Credentials are percent-encoded so
/// reserved characters cannot break the authority section.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionUri(String);

impl ConnectionUri {
    pub fn new(host: &str, username: &str, password: &str) -> Self {
        Self(format!(
            "{}://{}:{}@{}/?{}",
            SCHEME,
            urlencoding::encode(username),
            urlencoding::encode(password),
            host,
            URI_OPTIONS
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URI with the password masked, safe to log.
    pub fn redacted(&self) -> String {
        match (self.0.find("://"), self.0.rfind('@')) {
            (Some(scheme_end), Some(at)) => {
                let authority = &self.0[scheme_end + 3..at];
                match authority.find(':') {
                    Some(colon) => format!(
                        "{}:****{}",
                        &self.0[..scheme_end + 3 + colon],
                        &self.0[at..]
                    ),
                    None => self.0.clone(),
                }
            }
            _ => self.0.clone(),
        }
    }
}

impl fmt::Debug for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionUri").field(&self.redacted()).finish()
    }
}

/// Everything a connector needs for one connection attempt.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub uri: ConnectionUri,
    pub server_api_version: ServerApiVersion,
    pub timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            uri: ConnectionUri::new(CLUSTER_HOST, &credentials.username, &credentials.password),
            server_api_version: ServerApiVersion::V1,
            timeout: CONNECT_TIMEOUT,
        }
    }
}

/// Reads credentials, connects to the cluster under [`CONNECT_TIMEOUT`] and
/// returns the configured database.
///
/// Every call performs its own connection attempt. A handle is only returned
/// once the connector has confirmed the connection; no network call is made
/// if a credential is missing.
pub async fn acquire_database_handle(
    secrets: &impl SecretSource,
    connector: &impl Connector,
) -> Result<DatabaseHandle, DatabaseError> {
    let credentials = Credentials::load(secrets)?;
    let config = ConnectionConfig::new(&credentials);

    info!(uri = %config.uri.redacted(), "Connecting to MongoDB");

    let client = match timeout(config.timeout, connector.connect(&config)).await {
        Ok(Ok(client)) => client,
        Ok(Err(e)) => {
            let err = DatabaseError::from(e);
            error!(error = %err, "MongoDB connection failed");
            return Err(err);
        }
        Err(_) => {
            error!(timeout = ?config.timeout, "MongoDB connection timed out");
            return Err(DatabaseError::ConnectionTimeout(config.timeout));
        }
    };

    let handle = DatabaseHandle::new(client.database(&credentials.database_name));
    info!(database = %handle.name(), "Connected to MongoDB");

    Ok(handle)
}

/// Connects using the process environment and the production connector.
pub async fn connect() -> Result<DatabaseHandle, DatabaseError> {
    acquire_database_handle(&EnvSecrets, &MongoConnector).await
}
