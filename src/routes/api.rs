// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! API routes for authenticated users.

use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Identity, ProfileUpdate, UserProfile};
use crate::AppState;

/// API routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", get(get_profile).put(update_profile))
}

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Get the current user.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let identity = load_identity(&state, user).await?;

    Ok(Json(UserResponse {
        user_id: identity.id,
        email: identity.email,
        display_name: identity.display_name,
        email_verified: identity.email_verified,
        created_at: identity.created_at,
    }))
}

/// Get the current user's profile fields.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let identity = load_identity(&state, user).await?;
    Ok(Json(identity.profile))
}

/// Merge-update the current user's profile. Only supplied fields change.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    let mut identity = load_identity(&state, user).await?;

    identity.profile.merge(update);
    identity.updated_at = Utc::now();
    state.store.update_identity(&identity).await?;

    tracing::info!(user_id = %identity.id, "Profile updated");

    Ok(Json(identity.profile))
}

/// A session can outlive its account; treat that as unauthenticated rather
/// than a missing resource.
async fn load_identity(state: &AppState, user: AuthUser) -> Result<Identity> {
    state
        .store
        .get_identity(user.user_id)
        .await?
        .ok_or(AppError::InvalidSession)
}
