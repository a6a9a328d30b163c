// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Authentication routes: OAuth login/callback and password accounts.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{Identity, Provider};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login/{provider}", get(oauth_start))
        .route("/auth/callback/{provider}", get(oauth_callback))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(password_login))
        .route("/auth/logout", post(logout))
}

/// Identity summary returned by the password flows.
#[derive(Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

impl From<&Identity> for AuthResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.id,
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            email_verified: identity.email_verified,
        }
    }
}

/// Start an OAuth flow: issue a signed state and redirect to the provider.
async fn oauth_start(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let provider = parse_provider(&provider)?;
    let oauth_state = state.oauth_state.issue()?;
    let callback_url = callback_url(&headers, provider);

    let auth_url = state
        .oauth
        .authorize_url(provider, &callback_url, &oauth_state);

    tracing::info!(provider = %provider, "Starting OAuth flow, redirecting to provider");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    code: String,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback: verify state, exchange the code, resolve the identity,
/// and hand the browser a session cookie.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let provider = parse_provider(&provider)?;

    // A forged or expired state means the callback is not the completion of
    // a flow we started; reject before any side effects.
    if !state.oauth_state.verify(&params.state) {
        tracing::warn!(provider = %provider, "Rejecting callback with invalid state");
        return Err(AppError::InvalidState);
    }

    if let Some(error) = params.error {
        tracing::warn!(provider = %provider, error = %error, "OAuth error from provider");
        let redirect = format!(
            "{}?error={}",
            state.config.frontend_url,
            urlencoding::encode(&error)
        );
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let callback_url = callback_url(&headers, provider);
    let access_token = state
        .oauth
        .exchange_code(provider, &params.code, &callback_url)
        .await?;
    let profile = state.oauth.fetch_profile(provider, &access_token).await?;

    let identity = state.identity.resolve_oauth(provider, &profile).await?;

    tracing::info!(
        user_id = %identity.id,
        provider = %provider,
        "OAuth login successful"
    );

    let token = state.sessions.mint(&identity)?;
    let jar = jar.add(state.sessions.session_cookie(token));

    Ok((jar, Redirect::temporary(&state.config.frontend_url)))
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub display_name: Option<String>,
}

/// Create a password-backed account and log it in.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let identity = state
        .identity
        .create_password_identity(&req.email, &req.password, req.display_name)
        .await?;

    let token = state.sessions.mint(&identity)?;
    let jar = jar.add(state.sessions.session_cookie(token));

    Ok((StatusCode::CREATED, jar, Json(AuthResponse::from(&identity))))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Email/password login.
async fn password_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let identity = state
        .identity
        .resolve_password(&req.email, &req.password)
        .await?;

    tracing::info!(user_id = %identity.id, "Password login successful");

    let token = state.sessions.mint(&identity)?;
    let jar = jar.add(state.sessions.session_cookie(token));

    Ok((jar, Json(AuthResponse::from(&identity))))
}

/// Logout: expire the session cookie. The token itself stays valid until
/// its expiry; there is no server-side session to revoke.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let jar = jar.add(state.sessions.removal_cookie());
    (StatusCode::NO_CONTENT, jar)
}

fn parse_provider(raw: &str) -> Result<Provider> {
    Provider::parse(raw).ok_or_else(|| AppError::BadRequest(format!("unknown provider: {}", raw)))
}

/// Callback URL for the current deployment, derived from the Host header.
fn callback_url(headers: &HeaderMap, provider: Provider) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/callback/{}", scheme, host, provider)
}
