//! The emailed-code login flow.
//!
//! Logging in takes three calls: [`AuthApiClient::request_login`] makes the
//! server email a one-time code and returns a pending login token;
//! [`AuthApiClient::authorize`] marks that token authorized once the user
//! supplies the code; [`AuthApiClient::exchange`] trades the authorized
//! login token for a long-lived bearer token. Each step is a plain
//! request/response call.

use appetit_core::config::ClientConfig;
use appetit_core::error::{AppetitError, Result};
use appetit_core::user::Token;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Client for the login endpoints.
#[derive(Clone)]
pub struct AuthApiClient {
    client: Client,
    base_url: String,
}

impl AuthApiClient {
    /// Creates a client from connection settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Asks the server to email a one-time code to `email`.
    ///
    /// Returns the pending login token the code will authorize.
    pub async fn request_login(&self, email: &str) -> Result<Token> {
        debug!(%email, "requesting login code");
        let url = format!("{}/user/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("email", email)])
            .send()
            .await?;
        let response = check_auth_status(response, "login request").await?;
        Ok(response.json().await?)
    }

    /// Submits the emailed one-time code, authorizing the pending login.
    pub async fn authorize(&self, code: &str) -> Result<()> {
        let url = format!("{}/user/authorize-login", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("code", code)])
            .send()
            .await?;
        check_auth_status(response, "code verification").await?;
        Ok(())
    }

    /// Exchanges an authorized login token for a bearer token.
    pub async fn exchange(&self, login_token: &str) -> Result<Token> {
        let url = format!("{}/user/login-authorized", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("login_token", login_token)])
            .send()
            .await?;
        let response = check_auth_status(response, "token exchange").await?;
        Ok(response.json().await?)
    }
}

/// Maps a non-success login response to an [`AppetitError::Auth`].
async fn check_auth_status(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(AppetitError::auth(format!(
        "{} rejected ({}): {}",
        operation, status, body
    )))
}
