// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Signed session tokens and their transport.

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Identity;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_token";

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Tenant the session is scoped to
    pub tid: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// The identity a validated session resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
}

/// Mints and validates session tokens and builds their cookie carrier.
#[derive(Clone)]
pub struct SessionCodec {
    signing_key: Vec<u8>,
    ttl_secs: u64,
    cookie_secure: bool,
}

impl SessionCodec {
    pub fn new(signing_key: &[u8], ttl_secs: u64, cookie_secure: bool) -> Self {
        Self {
            signing_key: signing_key.to_vec(),
            ttl_secs,
            cookie_secure,
        }
    }

    /// Mint a signed session token for an identity.
    pub fn mint(&self, identity: &Identity) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("system time error: {}", e)))?
            .as_secs() as usize;

        let claims = Claims {
            sub: identity.id.to_string(),
            tid: identity.tenant_id.to_string(),
            iat: now,
            exp: now + self.ttl_secs as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("session token creation failed: {}", e)))
    }

    /// Validate a token and recover the session identity.
    ///
    /// Every failure (expired, bad signature, missing claims, malformed ids)
    /// collapses to `None`; callers cannot distinguish them.
    pub fn validate(&self, token: &str) -> Option<SessionIdentity> {
        let key = DecodingKey::from_secret(&self.signing_key);
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &key, &validation).ok()?;
        let user_id = data.claims.sub.parse().ok()?;
        let tenant_id = data.claims.tid.parse().ok()?;

        Some(SessionIdentity { user_id, tenant_id })
    }

    /// Pull the session token out of a request. The cookie wins over the
    /// `Authorization` header; this ordering is a fixed contract.
    pub fn extract_credential(&self, jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            return Some(cookie.value().to_string());
        }

        let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        auth_header
            .strip_prefix("Bearer ")
            .map(|token| token.to_string())
    }

    /// Session cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(time::Duration::seconds(self.ttl_secs as i64))
            .build()
    }

    /// Expired session cookie used to clear browser state on logout.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(time::Duration::ZERO)
            .build()
    }
}
