// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Content-transformation routes backed by the generation collaborator.

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::ContentVariant;
use crate::services::TransformRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ai/summarize", post(summarize))
        .route("/api/ai/translate", post(translate))
        .route("/api/ai/personalize", post(personalize))
}

#[derive(Deserialize)]
pub struct TransformBody {
    /// Canonical URL of the lesson; drives the cache key
    pub lesson_url: String,
    /// Lesson text to transform
    pub content: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Serialize)]
pub struct TransformResponse {
    pub output: String,
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<TransformBody>,
) -> Result<Json<TransformResponse>> {
    transform(&state, user, ContentVariant::Summary, body).await
}

async fn translate(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<TransformBody>,
) -> Result<Json<TransformResponse>> {
    transform(&state, user, ContentVariant::Translation, body).await
}

async fn personalize(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<TransformBody>,
) -> Result<Json<TransformResponse>> {
    transform(&state, user, ContentVariant::Personalization, body).await
}

async fn transform(
    state: &AppState,
    user: AuthUser,
    variant: ContentVariant,
    body: TransformBody,
) -> Result<Json<TransformResponse>> {
    if body.lesson_url.is_empty() {
        return Err(AppError::BadRequest("lesson_url must not be empty".to_string()));
    }

    // The live profile decides cache validity, so fetch the full identity.
    let identity = state
        .store
        .get_identity(user.user_id)
        .await?
        .ok_or(AppError::InvalidSession)?;

    let output = state
        .personalize
        .get_or_generate(
            &identity,
            variant,
            TransformRequest {
                lesson_url: &body.lesson_url,
                content: &body.content,
                context: body.context.as_deref(),
                target_language: body.target_language.as_deref(),
            },
        )
        .await?;

    Ok(Json(TransformResponse { output }))
}
