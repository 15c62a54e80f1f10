//! Live mapper over an asynchronous request/reply channel.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::{DEFAULT_SUBJECT_PREFIX, DEFAULT_TIMEOUT};
use crate::error::{IdMapError, IdMapResult};
use crate::mapper::{IdMapper, IdNamespace};

/// Reply payload meaning "no mapping exists".
pub const NOT_FOUND_REPLY: &str = "not_found";

/// Reply prefix the lookup service uses to report its own failures.
pub const ERROR_REPLY_PREFIX: &str = "error:";

/// One request/reply round trip on a messaging subject.
///
/// Implementations should not apply their own retry; the mapper bounds the
/// whole round trip with its timeout.
#[async_trait]
pub trait RequestReply: Send + Sync {
    async fn request(&self, subject: String, payload: Bytes) -> IdMapResult<Bytes>;
}

/// Mapper that asks the lookup service on `{prefix}.{namespace}`.
pub struct MessagingIdMapper<T> {
    transport: T,
    subject_prefix: String,
    timeout: Duration,
}

impl<T> std::fmt::Debug for MessagingIdMapper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingIdMapper")
            .field("subject_prefix", &self.subject_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<T: RequestReply> MessagingIdMapper<T> {
    /// Create a mapper with the default subject prefix and timeout.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the subject prefix.
    #[must_use]
    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = prefix.into();
        self
    }

    /// Set the round-trip timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full subject for a namespace.
    #[must_use]
    pub fn subject(&self, namespace: IdNamespace) -> String {
        format!("{}.{}", self.subject_prefix, namespace.as_str())
    }
}

/// Interpret a lookup reply.
fn decode_reply(subject: &str, payload: &[u8]) -> IdMapResult<Option<String>> {
    let text = std::str::from_utf8(payload).map_err(|e| IdMapError::InvalidResponse {
        subject: subject.to_string(),
        reason: format!("reply is not UTF-8: {e}"),
    })?;
    let text = text.trim();

    if text.is_empty() || text == NOT_FOUND_REPLY {
        return Ok(None);
    }
    if let Some(reason) = text.strip_prefix(ERROR_REPLY_PREFIX) {
        return Err(IdMapError::InvalidResponse {
            subject: subject.to_string(),
            reason: reason.trim().to_string(),
        });
    }

    Ok(Some(text.to_string()))
}

#[async_trait]
impl<T: RequestReply> IdMapper for MessagingIdMapper<T> {
    fn name(&self) -> &'static str {
        "messaging"
    }

    #[instrument(skip(self), fields(subject))]
    async fn resolve(
        &self,
        namespace: IdNamespace,
        source_id: &str,
    ) -> IdMapResult<Option<String>> {
        if source_id.is_empty() {
            return Ok(None);
        }

        let subject = self.subject(namespace);
        tracing::Span::current().record("subject", subject.as_str());

        let request = self
            .transport
            .request(subject.clone(), Bytes::copy_from_slice(source_id.as_bytes()));
        let reply = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| IdMapError::Timeout {
                subject: subject.clone(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        let resolved = decode_reply(&subject, &reply)?;
        debug!(
            source_id = %source_id,
            found = resolved.is_some(),
            "Identifier lookup completed"
        );
        Ok(resolved)
    }
}
