use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{info, warn};

use crate::api::SeatApi;
use crate::error::AppError;
use crate::models::Navigation;
use crate::storage::TokenStore;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    EnterEmail,
    EnterOtp,
    Verified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginMessage {
    pub text: String,
    pub is_error: bool,
}

impl LoginMessage {
    fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_error: true,
        }
    }

    fn success(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_error: false,
        }
    }
}

/// Email + OTP login screen.
pub struct LoginFlow {
    api: Arc<dyn SeatApi>,
    store: Arc<dyn TokenStore>,
    email: String,
    step: LoginStep,
    message: Option<LoginMessage>,
}

impl LoginFlow {
    pub fn new(api: Arc<dyn SeatApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            email: String::new(),
            step: LoginStep::EnterEmail,
            message: None,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> Option<&LoginMessage> {
        self.message.as_ref()
    }

    /// Typing into either input clears whatever message is showing.
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub async fn send_otp(&mut self, email: &str) -> LoginStep {
        let email = email.trim();
        self.email = email.to_string();

        if email.is_empty() {
            self.message = Some(LoginMessage::error("Email is required."));
            return self.step;
        }
        if !is_valid_email(email) {
            self.message = Some(LoginMessage::error("Invalid email format."));
            return self.step;
        }

        info!("Sending OTP to {}", email);
        match self.api.send_otp(email).await {
            Ok(resp) if resp.is_sent() => {
                self.step = LoginStep::EnterOtp;
                self.message = Some(LoginMessage::success("OTP sent to your email."));
            }
            Ok(resp) => {
                warn!("Unexpected send-otp response: {:?}", resp.message);
                self.message = Some(LoginMessage::error("Failed to send OTP."));
            }
            Err(e) => {
                warn!("Send OTP failed: {}", e);
                self.message = Some(LoginMessage::error("Failed to send OTP."));
            }
        }
        self.step
    }

    /// On success the token is persisted and the caller should navigate home.
    pub async fn verify_otp(&mut self, otp: &str) -> Result<Option<Navigation>, AppError> {
        let otp = otp.trim();
        if self.step != LoginStep::EnterOtp {
            self.message = Some(LoginMessage::error("Request an OTP first."));
            return Ok(None);
        }
        if otp.is_empty() {
            self.message = Some(LoginMessage::error("OTP is required."));
            return Ok(None);
        }

        info!("Verifying OTP for {}", self.email);
        let token = match self.api.verify_otp(&self.email, otp).await {
            Ok(resp) => resp.verified_token(),
            Err(e) => {
                warn!("Verify OTP failed: {}", e);
                None
            }
        };

        let Some(token) = token else {
            self.message = Some(LoginMessage::error("Failed to verify OTP."));
            return Ok(None);
        };

        self.store.save(&token).await?;
        self.step = LoginStep::Verified;
        self.message = Some(LoginMessage::success(
            "OTP verified successfully. You are now logged in.",
        ));
        Ok(Some(Navigation::Home))
    }
}
