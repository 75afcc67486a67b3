pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{AppError, ErrorResponse};
use crate::models::{NewWatchRequest, RoutineEntry, Session, WatchEntry};

pub const AUTH_HEADER: &str = "x-auth-token";

/// The NotifySeat backend. Every call after login carries the session token.
#[async_trait]
pub trait SeatApi: Send + Sync {
    async fn send_otp(&self, email: &str) -> Result<dto::SendOtpResponse, AppError>;
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<dto::VerifyOtpResponse, AppError>;
    async fn fetch_watches(&self, session: &Session) -> Result<Vec<WatchEntry>, AppError>;
    async fn add_watch(
        &self,
        session: &Session,
        req: &NewWatchRequest,
    ) -> Result<Option<WatchEntry>, AppError>;
    async fn delete_watch(&self, session: &Session, id: &str) -> Result<(), AppError>;
}

/// Read-only class routine snapshot.
#[async_trait]
pub trait RoutineFeed: Send + Sync {
    async fn fetch_routine(&self) -> Result<Vec<RoutineEntry>, AppError>;
}

fn build_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))
}

/// Body of a 2xx response; anything else becomes `AppError::Api`.
async fn read_body(response: Response) -> Result<String, AppError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        warn!("API error {}: {}", status, body);
        return Err(AppError::Api { status, message });
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let body = read_body(response).await?;
    serde_json::from_str::<T>(&body).map_err(|e| {
        tracing::error!("Failed to parse: {}", e);
        AppError::Decode(e.to_string())
    })
}

pub struct HttpSeatApi {
    client: Client,
    base_url: String,
}

impl HttpSeatApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = build_client(timeout)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `path` followed by one percent-encoded segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| AppError::Config(format!("Invalid API base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API base url cannot have a path: {}", self.base_url)))?
            .push(segment);
        Ok(url)
    }
}

#[async_trait]
impl SeatApi for HttpSeatApi {
    async fn send_otp(&self, email: &str) -> Result<dto::SendOtpResponse, AppError> {
        debug!("Sending OTP to {}", email);
        let response = self
            .client
            .post(self.url("send-otp"))
            .json(&dto::SendOtpRequest { email })
            .send()
            .await?;
        read_json(response).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<dto::VerifyOtpResponse, AppError> {
        debug!("Verifying OTP for {}", email);
        let response = self
            .client
            .post(self.url("verify-otp"))
            .json(&dto::VerifyOtpRequest { email, otp })
            .send()
            .await?;
        read_json(response).await
    }

    async fn fetch_watches(&self, session: &Session) -> Result<Vec<WatchEntry>, AppError> {
        let response = self
            .client
            .post(self.url("get-student"))
            .header(AUTH_HEADER, &session.token)
            .json(&dto::GetWatchesRequest { email: &session.email })
            .send()
            .await?;
        let body: dto::GetWatchesResponse = read_json(response).await?;
        Ok(body.user_data.unwrap_or_default())
    }

    async fn add_watch(
        &self,
        session: &Session,
        req: &NewWatchRequest,
    ) -> Result<Option<WatchEntry>, AppError> {
        let response = self
            .client
            .post(self.url("add-student"))
            .header(AUTH_HEADER, &session.token)
            .json(req)
            .send()
            .await?;
        // Only an echoed entry with an `_id` is kept; message-only bodies are fine too.
        let body = read_body(response).await?;
        Ok(serde_json::from_str::<WatchEntry>(&body).ok())
    }

    async fn delete_watch(&self, session: &Session, id: &str) -> Result<(), AppError> {
        let url = self.url_with_segment("delete-student", id)?;
        let response = self
            .client
            .delete(url)
            .header(AUTH_HEADER, &session.token)
            .send()
            .await?;
        let body = read_body(response).await?;
        let message = serde_json::from_str::<dto::MessageResponse>(&body)
            .ok()
            .and_then(|m| m.message);
        debug!("Deleted watch {}: {:?}", id, message);
        Ok(())
    }
}

pub struct HttpRoutineFeed {
    client: Client,
    url: String,
}

impl HttpRoutineFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = build_client(timeout)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RoutineFeed for HttpRoutineFeed {
    async fn fetch_routine(&self) -> Result<Vec<RoutineEntry>, AppError> {
        let response = self.client.get(&self.url).send().await?;
        read_json(response).await
    }
}

/// Stands in for the routine feed when none is configured.
pub struct MissingRoutineFeed;

#[async_trait]
impl RoutineFeed for MissingRoutineFeed {
    async fn fetch_routine(&self) -> Result<Vec<RoutineEntry>, AppError> {
        Err(AppError::Config(
            "NOTIFYSEAT_ROUTINE_URL is not set".to_string(),
        ))
    }
}
