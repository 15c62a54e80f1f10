//! HTTP client for the proxied meeting system.
//!
//! Implements [`InviteeClient`] and [`AttendeeClient`] over the proxy's REST API.

use async_trait::async_trait;
use convene_core::{PastMeetingId, SubResourceKind};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

use crate::config::{ProxyConfig, API_KEY_HEADER};
use crate::error::{ProxyError, ProxyResult};
use crate::models::{
    Attendee, CreateAttendeeRequest, CreateInviteeRequest, Invitee, UpdateAttendeeRequest,
    UpdateInviteeRequest,
};
use crate::retry::RequestSafety;
use crate::traits::{AttendeeClient, InviteeClient};

/// Client for the invitee and attendee endpoints of the proxy.
#[derive(Clone)]
pub struct ProxyClient {
    config: ProxyConfig,
    base_url: Url,
    client: Arc<Client>,
}

impl std::fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyClient")
            .field("config", &self.config)
            .finish()
    }
}

impl ProxyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ProxyConfig) -> ProxyResult<Self> {
        let base_url = config.validate()?;
        let client = Self::build_client(&config)?;

        Ok(Self {
            config,
            base_url,
            client: Arc::new(client),
        })
    }

    /// Build the reqwest client with configuration.
    fn build_client(config: &ProxyConfig) -> ProxyResult<Client> {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ProxyError::InvalidConfiguration {
                message: format!("Failed to build HTTP client: {e}"),
            })
    }

    /// `{base}/past_meetings/{pmid}/{collection}[/{id}]`, percent-encoded.
    fn endpoint(
        &self,
        kind: SubResourceKind,
        past_meeting_id: &PastMeetingId,
        id: Option<&str>,
    ) -> ProxyResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| ProxyError::InvalidConfiguration {
                        message: format!("base_url cannot be a base: {}", self.base_url),
                    })?;
            segments
                .pop_if_empty()
                .push("past_meetings")
                .push(&past_meeting_id.to_string())
                .push(kind.collection());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Build a request with all configured headers.
    fn build_request(&self, method: Method, url: &Url) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, url.clone())
            .header(header::ACCEPT, "application/json");

        if let Some(key) = &self.config.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        builder
    }

    /// Send a request with retry logic.
    ///
    /// Retries transient statuses and network errors with exponential
    /// backoff, honouring `Retry-After` on 429. Creates are only resent after
    /// a 429 or a failed connect, so a timed-out `POST` is never duplicated.
    async fn send_with_retry(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> ProxyResult<Response> {
        let retry_config = &self.config.retry;
        let verbosity = &self.config.log_verbosity;
        let safety = RequestSafety::of(&method);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut request = self.build_request(method.clone(), url);
            if let Some(json_body) = body {
                request = request.json(json_body);
            }

            if verbosity.is_enabled() {
                debug!(url = %url, method = %method, attempt = attempt, "Sending proxy request");
            }
            if verbosity.log_bodies() {
                if let Some(json_body) = body {
                    trace!(body = %json_body, "Request body");
                }
            }

            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if verbosity.is_enabled() {
                        debug!(url = %url, status = %status, attempt = attempt, "Received proxy response");
                    }

                    if retry_config.should_retry_status(safety, status.as_u16())
                        && attempt <= retry_config.max_retries
                    {
                        let retry_after = (status == StatusCode::TOO_MANY_REQUESTS)
                            .then(|| {
                                resp.headers()
                                    .get(header::RETRY_AFTER)
                                    .and_then(|v| v.to_str().ok())
                                    .and_then(|v| v.trim().parse::<u64>().ok())
                                    .map(Duration::from_secs)
                            })
                            .flatten();
                        let wait =
                            retry_after.unwrap_or_else(|| retry_config.calculate_backoff(attempt));

                        warn!(
                            url = %url,
                            status = %status,
                            attempt = attempt,
                            wait_ms = wait.as_millis(),
                            "Transient proxy status, retrying with backoff"
                        );

                        tokio::time::sleep(wait).await;
                        continue;
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    let resendable = safety == RequestSafety::Idempotent || e.is_connect();
                    if resendable && attempt <= retry_config.max_retries {
                        let backoff = retry_config.calculate_backoff(attempt);
                        warn!(
                            url = %url,
                            error = %e,
                            attempt = attempt,
                            wait_ms = backoff.as_millis(),
                            "Proxy request failed, retrying with backoff"
                        );

                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    return Err(ProxyError::request_with_source(
                        format!("{method} {url} failed after {attempt} attempts"),
                        e,
                    ));
                }
            }
        }
    }

    /// Map a non-success response to an error.
    fn handle_response_error(
        kind: SubResourceKind,
        id: &str,
        status: StatusCode,
        body: &str,
    ) -> ProxyError {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .or_else(|| json.get("error"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string());

        match status {
            StatusCode::NOT_FOUND => ProxyError::NotFound {
                kind,
                id: id.to_string(),
            },
            StatusCode::CONFLICT => ProxyError::Conflict { kind, message },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProxyError::Unauthorized {
                status: status.as_u16(),
            },
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => ProxyError::Unavailable {
                status: status.as_u16(),
                message,
            },
            _ => ProxyError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Send and turn non-success statuses into errors.
    async fn execute(
        &self,
        kind: SubResourceKind,
        id: &str,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> ProxyResult<Response> {
        let response = self.send_with_retry(method, url, body).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::handle_response_error(kind, id, status, &body))
    }

    async fn decode<D: DeserializeOwned>(
        kind: SubResourceKind,
        response: Response,
    ) -> ProxyResult<D> {
        response.json::<D>().await.map_err(|e| ProxyError::Decode {
            kind,
            message: e.to_string(),
        })
    }

    fn encode<B: Serialize>(kind: SubResourceKind, body: &B) -> ProxyResult<Value> {
        serde_json::to_value(body).map_err(|e| ProxyError::Decode {
            kind,
            message: format!("failed to encode request: {e}"),
        })
    }

    async fn create_document<B: Serialize + Sync, D: DeserializeOwned>(
        &self,
        kind: SubResourceKind,
        past_meeting_id: &PastMeetingId,
        request: &B,
    ) -> ProxyResult<D> {
        let url = self.endpoint(kind, past_meeting_id, None)?;
        let body = Self::encode(kind, request)?;
        let scope = format!("past meeting {past_meeting_id}");
        let response = self
            .execute(kind, &scope, Method::POST, &url, Some(&body))
            .await?;
        Self::decode(kind, response).await
    }

    async fn get_document<D: DeserializeOwned>(
        &self,
        kind: SubResourceKind,
        past_meeting_id: &PastMeetingId,
        id: &str,
    ) -> ProxyResult<D> {
        let url = self.endpoint(kind, past_meeting_id, Some(id))?;
        let response = self.execute(kind, id, Method::GET, &url, None).await?;
        Self::decode(kind, response).await
    }

    async fn update_document<B: Serialize + Sync, D: DeserializeOwned>(
        &self,
        kind: SubResourceKind,
        past_meeting_id: &PastMeetingId,
        id: &str,
        request: &B,
    ) -> ProxyResult<D> {
        let url = self.endpoint(kind, past_meeting_id, Some(id))?;
        let body = Self::encode(kind, request)?;
        let response = self
            .execute(kind, id, Method::PUT, &url, Some(&body))
            .await?;
        Self::decode(kind, response).await
    }

    async fn delete_document(
        &self,
        kind: SubResourceKind,
        past_meeting_id: &PastMeetingId,
        id: &str,
    ) -> ProxyResult<()> {
        let url = self.endpoint(kind, past_meeting_id, Some(id))?;
        self.execute(kind, id, Method::DELETE, &url, None).await?;
        Ok(())
    }
}

#[async_trait]
impl InviteeClient for ProxyClient {
    #[instrument(skip(self, request), fields(past_meeting_id = %past_meeting_id))]
    async fn create_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        request: &CreateInviteeRequest,
    ) -> ProxyResult<Invitee> {
        let invitee: Invitee = self
            .create_document(SubResourceKind::Invitee, past_meeting_id, request)
            .await?;
        if invitee.uuid.is_empty() {
            return Err(ProxyError::Decode {
                kind: SubResourceKind::Invitee,
                message: "response did not contain an id".to_string(),
            });
        }
        info!(invitee_id = %invitee.uuid, "Invitee created");
        Ok(invitee)
    }

    #[instrument(skip(self), fields(past_meeting_id = %past_meeting_id))]
    async fn get_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        invitee_id: &str,
    ) -> ProxyResult<Invitee> {
        self.get_document(SubResourceKind::Invitee, past_meeting_id, invitee_id)
            .await
    }

    #[instrument(skip(self, request), fields(past_meeting_id = %past_meeting_id))]
    async fn update_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        invitee_id: &str,
        request: &UpdateInviteeRequest,
    ) -> ProxyResult<Invitee> {
        let invitee: Invitee = self
            .update_document(SubResourceKind::Invitee, past_meeting_id, invitee_id, request)
            .await?;
        info!(invitee_id = %invitee_id, "Invitee updated");
        Ok(invitee)
    }

    #[instrument(skip(self), fields(past_meeting_id = %past_meeting_id))]
    async fn delete_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        invitee_id: &str,
    ) -> ProxyResult<()> {
        self.delete_document(SubResourceKind::Invitee, past_meeting_id, invitee_id)
            .await?;
        info!(invitee_id = %invitee_id, "Invitee deleted");
        Ok(())
    }
}

#[async_trait]
impl AttendeeClient for ProxyClient {
    #[instrument(skip(self, request), fields(past_meeting_id = %past_meeting_id))]
    async fn create_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        request: &CreateAttendeeRequest,
    ) -> ProxyResult<Attendee> {
        let attendee: Attendee = self
            .create_document(SubResourceKind::Attendee, past_meeting_id, request)
            .await?;
        if attendee.id.is_empty() {
            return Err(ProxyError::Decode {
                kind: SubResourceKind::Attendee,
                message: "response did not contain an id".to_string(),
            });
        }
        info!(attendee_id = %attendee.id, "Attendee created");
        Ok(attendee)
    }

    #[instrument(skip(self), fields(past_meeting_id = %past_meeting_id))]
    async fn get_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        attendee_id: &str,
    ) -> ProxyResult<Attendee> {
        self.get_document(SubResourceKind::Attendee, past_meeting_id, attendee_id)
            .await
    }

    #[instrument(skip(self, request), fields(past_meeting_id = %past_meeting_id))]
    async fn update_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        attendee_id: &str,
        request: &UpdateAttendeeRequest,
    ) -> ProxyResult<Attendee> {
        let attendee: Attendee = self
            .update_document(SubResourceKind::Attendee, past_meeting_id, attendee_id, request)
            .await?;
        info!(attendee_id = %attendee_id, "Attendee updated");
        Ok(attendee)
    }

    #[instrument(skip(self), fields(past_meeting_id = %past_meeting_id))]
    async fn delete_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        attendee_id: &str,
    ) -> ProxyResult<()> {
        self.delete_document(SubResourceKind::Attendee, past_meeting_id, attendee_id)
            .await?;
        info!(attendee_id = %attendee_id, "Attendee deleted");
        Ok(())
    }
}
