use serde::{Deserialize, Serialize};

use crate::models::WatchEntry;

pub const OTP_SENT_MESSAGE: &str = "OTP sent successfully";
pub const OTP_VERIFIED_MESSAGE: &str = "OTP verified successfully";

#[derive(Debug, Serialize)]
pub struct SendOtpRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SendOtpResponse {
    #[serde(default)]
    pub message: String,
}

impl SendOtpResponse {
    pub fn is_sent(&self) -> bool {
        self.message == OTP_SENT_MESSAGE
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl VerifyOtpResponse {
    /// The token, only when the backend confirmed verification.
    pub fn verified_token(self) -> Option<String> {
        if self.message == OTP_VERIFIED_MESSAGE {
            self.token.filter(|t| !t.is_empty())
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetWatchesRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GetWatchesResponse {
    #[serde(rename = "userData", default)]
    pub user_data: Option<Vec<WatchEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
