// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Session authentication middleware.

use crate::auth::SessionIdentity;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = state
        .sessions
        .extract_credential(&jar, request.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let SessionIdentity { user_id, tenant_id } = state
        .sessions
        .validate(&token)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(AuthUser { user_id, tenant_id });

    Ok(next.run(request).await)
}
