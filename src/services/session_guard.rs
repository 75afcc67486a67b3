use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{Navigation, Session, TokenClaims};
use crate::storage::TokenStore;

/// Turns the stored bearer token into a `Session`, or sends the user to login.
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub async fn establish(&self) -> Result<Session, AppError> {
        let token = self.store.load().await?.ok_or(AppError::Unauthenticated)?;

        match decode_email(&token) {
            Ok(email) => {
                info!("Session established for {}", email);
                Ok(Session { token, email })
            }
            Err(e) => {
                warn!("Discarding stored token: {}", e);
                if let Err(remove_err) = self.store.remove().await {
                    warn!("Failed to clear stored token: {}", remove_err);
                }
                Err(e)
            }
        }
    }

    /// Logout is local only; the backend keeps no session.
    pub async fn end(&self) -> Result<Navigation, AppError> {
        self.store.remove().await?;
        info!("Session ended");
        Ok(Navigation::Login)
    }
}

/// Reads the `email` claim from a JWT without verifying its signature.
pub fn decode_email(token: &str) -> Result<String, AppError> {
    let claims = decode_claims(token)?;

    if let Some(exp) = claims.exp {
        if exp <= Utc::now().timestamp() {
            return Err(AppError::InvalidToken("token expired".to_string()));
        }
    }

    claims
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::InvalidToken("missing email claim".to_string()))
}

pub fn decode_claims(token: &str) -> Result<TokenClaims, AppError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::InvalidToken("missing payload segment".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::InvalidToken(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice::<TokenClaims>(&bytes)
        .map_err(|e| AppError::InvalidToken(format!("payload is not valid JSON: {}", e)))
}
