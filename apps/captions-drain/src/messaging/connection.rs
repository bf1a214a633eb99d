use lapin::{Connection, ConnectionProperties};
use tracing::{error, info};

pub struct RabbitMqConnection {
    connection: Connection,
    // Credentials stripped, for logging only.
    display_url: String,
}

impl RabbitMqConnection {
    pub async fn connect(url: &str) -> Result<Self, ConnectionError> {
        let display_url = redact_credentials(url);
        info!(url = %display_url, "Connecting to RabbitMQ");

        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| {
                error!(error = %e, url = %display_url, "Failed to connect to RabbitMQ");
                ConnectionError::ConnectionFailed(e.to_string())
            })?;

        info!(url = %display_url, "Successfully connected to RabbitMQ");

        Ok(Self {
            connection,
            display_url,
        })
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub async fn shutdown(self) -> Result<(), ConnectionError> {
        info!(url = %self.display_url, "Shutting down RabbitMQ connection");

        self.connection
            .close(200, "Normal shutdown")
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to close RabbitMQ connection gracefully");
                ConnectionError::ShutdownFailed(e.to_string())
            })?;

        info!("RabbitMQ connection closed successfully");
        Ok(())
    }
}

fn redact_credentials(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => url.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Failed to connect to RabbitMQ: {0}")]
    ConnectionFailed(String),

    #[error("Failed to shutdown connection gracefully: {0}")]
    ShutdownFailed(String),
}
