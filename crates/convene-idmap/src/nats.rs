//! NATS transport for the live mapper.

use async_nats::{Client, ConnectOptions, RequestErrorKind};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::info;

use crate::config::{IdMapConfig, DEFAULT_TIMEOUT};
use crate::error::{IdMapError, IdMapResult};
use crate::messaging::{MessagingIdMapper, RequestReply};

/// Request/reply over a NATS connection.
#[derive(Clone)]
pub struct NatsTransport {
    client: Client,
    request_timeout: Duration,
}

impl NatsTransport {
    /// Wrap an existing connection.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Connect using the bridge configuration.
    pub async fn connect(config: &IdMapConfig) -> IdMapResult<Self> {
        let url = config
            .nats_url
            .clone()
            .ok_or_else(|| IdMapError::ConfigMissing {
                var: "NATS_URL".to_string(),
            })?;

        let client = ConnectOptions::new()
            .name("convene-idmap")
            .request_timeout(Some(config.timeout))
            .connect(url.as_str())
            .await
            .map_err(|e| IdMapError::ConnectionFailed {
                url: url.clone(),
                cause: e.to_string(),
            })?;

        info!(url = %url, "Connected to identifier lookup service");

        Ok(Self {
            client,
            request_timeout: config.timeout,
        })
    }
}

#[async_trait]
impl RequestReply for NatsTransport {
    async fn request(&self, subject: String, payload: Bytes) -> IdMapResult<Bytes> {
        match self.client.request(subject.clone(), payload).await {
            Ok(message) => Ok(message.payload),
            Err(e) => Err(match e.kind() {
                RequestErrorKind::TimedOut => IdMapError::Timeout {
                    subject,
                    timeout_ms: u64::try_from(self.request_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                },
                RequestErrorKind::NoResponders => IdMapError::Unavailable {
                    subject,
                    cause: e.to_string(),
                },
                _ => IdMapError::Transport {
                    subject,
                    cause: e.to_string(),
                },
            }),
        }
    }
}

/// Connect and build the live mapper described by `config`.
pub async fn connect_mapper(
    config: &IdMapConfig,
) -> IdMapResult<MessagingIdMapper<NatsTransport>> {
    let transport = NatsTransport::connect(config).await?;
    Ok(MessagingIdMapper::new(transport)
        .with_subject_prefix(config.subject_prefix.clone())
        .with_timeout(config.timeout))
}
