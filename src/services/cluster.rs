use std::future::Future;
use std::time::Duration;

use bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, ServerApi};
use mongodb::Client;
use thiserror::Error;

use crate::config::database::ConnectionConfig;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("Connection attempt timed out after {0:?}")]
    ConnectionTimeout(Duration),
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(#[source] mongodb::error::Error),
    #[error("Cluster unreachable: {0}")]
    NetworkUnreachable(#[source] mongodb::error::Error),
    #[error("MongoDB driver error: {0}")]
    DriverInternal(#[source] mongodb::error::Error),
}

impl From<mongodb::error::Error> for DatabaseError {
    fn from(err: mongodb::error::Error) -> Self {
        if matches!(*err.kind, ErrorKind::Authentication { .. }) {
            return Self::AuthenticationFailure(err);
        }
        if matches!(
            *err.kind,
            ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } | ErrorKind::ServerSelection { .. }
        ) {
            return Self::NetworkUnreachable(err);
        }
        Self::DriverInternal(err)
    }
}

/// Turns a [`ConnectionConfig`] into a client whose connection has been confirmed.
pub trait Connector {
    fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> impl Future<Output = Result<Client, mongodb::error::Error>> + Send;
}

/// Production connector: resolves the SRV record, pins the server API and
/// pings `admin` before handing the client back.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

impl Connector for MongoConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Client, mongodb::error::Error> {
        let mut options = ClientOptions::parse(config.uri.as_str()).await?;

        options.server_api = Some(
            ServerApi::builder()
                .version(config.server_api_version.clone())
                .build(),
        );
        options.connect_timeout = Some(config.timeout);
        options.server_selection_timeout = Some(config.timeout);

        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        Ok(client)
    }
}
