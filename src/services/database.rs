use std::ops::Deref;
use std::time::Instant;

use bson::doc;
use mongodb::Database;

/// Result of a liveness probe.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Driver error message when the probe failed.
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// A named database reachable through a confirmed client connection.
///
/// The handle does not own the connection's lifetime: if the client is shut
/// down or the cluster becomes unreachable, [`DatabaseHandle::is_alive`]
/// reports it.
#[derive(Debug, Clone)]
pub struct DatabaseHandle {
    database: Database,
}

impl DatabaseHandle {
    /// Wraps a database without confirming its connection. Application code
    /// should obtain handles from
    /// [`acquire_database_handle`](crate::config::database::acquire_database_handle),
    /// which only returns once the cluster has answered a ping.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn name(&self) -> &str {
        self.database.name()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub async fn is_alive(&self) -> bool {
        self.database.run_command(doc! { "ping": 1 }).await.is_ok()
    }

    pub async fn check_health(&self) -> HealthStatus {
        let start = Instant::now();
        let result = self.database.run_command(doc! { "ping": 1 }).await;
        let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthStatus {
                healthy: true,
                message: None,
                response_time_ms,
            },
            Err(e) => HealthStatus {
                healthy: false,
                message: Some(e.to_string()),
                response_time_ms,
            },
        }
    }
}

impl Deref for DatabaseHandle {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.database
    }
}
