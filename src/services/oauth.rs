// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! OAuth provider clients for GitHub and Google.
//!
//! Both providers reduce to the same two calls per login: exchange the
//! authorization code for an access token, then fetch the user's profile
//! and email. Everything past that shape is provider-specific plumbing.

use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::Provider;

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_API_URL: &str = "https://api.github.com";
const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Profile data a provider hands back after a successful login.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Provider-scoped user id
    pub id: String,
    pub email: Option<String>,
    /// Whether the provider vouches for the email
    pub verified: bool,
    pub name: Option<String>,
}

/// OAuth client for the configured providers.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    github_client_id: String,
    github_client_secret: String,
    google_client_id: String,
    google_client_secret: String,
}

impl OAuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            github_client_id: config.github_client_id.clone(),
            github_client_secret: config.github_client_secret.clone(),
            google_client_id: config.google_client_id.clone(),
            google_client_secret: config.google_client_secret.clone(),
        }
    }

    /// Provider authorization URL to redirect the browser to.
    pub fn authorize_url(&self, provider: Provider, callback_url: &str, state: &str) -> String {
        match provider {
            Provider::Github => format!(
                "{}?client_id={}&redirect_uri={}&scope=user:email&state={}",
                GITHUB_AUTHORIZE_URL,
                self.github_client_id,
                urlencoding::encode(callback_url),
                state
            ),
            Provider::Google => format!(
                "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
                GOOGLE_AUTHORIZE_URL,
                self.google_client_id,
                urlencoding::encode(callback_url),
                urlencoding::encode("openid email profile"),
                state
            ),
        }
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
        callback_url: &str,
    ) -> Result<String, AppError> {
        let response = match provider {
            Provider::Github => {
                self.http
                    .post(GITHUB_TOKEN_URL)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .form(&[
                        ("client_id", self.github_client_id.as_str()),
                        ("client_secret", self.github_client_secret.as_str()),
                        ("code", code),
                    ])
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await
            }
            Provider::Google => {
                self.http
                    .post(GOOGLE_TOKEN_URL)
                    .form(&[
                        ("client_id", self.google_client_id.as_str()),
                        ("client_secret", self.google_client_secret.as_str()),
                        ("code", code),
                        ("grant_type", "authorization_code"),
                        ("redirect_uri", callback_url),
                    ])
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await
            }
        }
        .map_err(|e| AppError::UpstreamProvider(format!("token exchange failed: {}", e)))?;

        let token: TokenResponse = check_response_json(response).await?;
        Ok(token.access_token)
    }

    /// Fetch the logged-in user's profile and primary email.
    pub async fn fetch_profile(
        &self,
        provider: Provider,
        access_token: &str,
    ) -> Result<ProviderProfile, AppError> {
        match provider {
            Provider::Github => self.fetch_github_profile(access_token).await,
            Provider::Google => self.fetch_google_profile(access_token).await,
        }
    }

    async fn fetch_github_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .http
            .get(format!("{}/user", GITHUB_API_URL))
            .bearer_auth(access_token)
            // GitHub rejects requests without a User-Agent
            .header(reqwest::header::USER_AGENT, "hud-docs-api")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::UpstreamProvider(format!("profile fetch failed: {}", e)))?;

        let user: GithubUser = check_response_json(response).await?;

        // The public profile email may be absent or private; the emails
        // endpoint has the authoritative primary + verified flags.
        let (email, verified) = match self.fetch_github_primary_email(access_token).await? {
            Some(entry) => (Some(entry.email), entry.verified),
            None => (user.email, true),
        };

        Ok(ProviderProfile {
            id: user.id.to_string(),
            email,
            verified,
            name: user.name,
        })
    }

    async fn fetch_github_primary_email(
        &self,
        access_token: &str,
    ) -> Result<Option<GithubEmail>, AppError> {
        let response = self
            .http
            .get(format!("{}/user/emails", GITHUB_API_URL))
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, "hud-docs-api")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::UpstreamProvider(format!("email fetch failed: {}", e)))?;

        let emails: Vec<GithubEmail> = check_response_json(response).await?;
        Ok(emails.into_iter().find(|e| e.primary))
    }

    async fn fetch_google_profile(&self, access_token: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::UpstreamProvider(format!("profile fetch failed: {}", e)))?;

        let info: GoogleUserinfo = check_response_json(response).await?;

        Ok(ProviderProfile {
            id: info.sub,
            email: info.email,
            verified: info.email_verified,
            name: info.name,
        })
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::UpstreamProvider(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::UpstreamProvider(format!("JSON parse error: {}", e)))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GithubUser {
    id: u64,
    email: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

#[derive(Deserialize)]
struct GoogleUserinfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}
