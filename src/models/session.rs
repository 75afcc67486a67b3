use serde::Deserialize;

/// Authenticated identity for the lifetime of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
}

/// Claims we read out of the bearer token payload.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Where the front end should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Home,
}
