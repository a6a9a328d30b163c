// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

use chrono::Utc;
use hud_docs_api::config::Config;
use hud_docs_api::models::{Identity, UserProfile};
use hud_docs_api::routes::create_router;
use hud_docs_api::store::Store;
use hud_docs_api::AppState;
use std::sync::Arc;
use uuid::Uuid;

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store = Store::in_memory();
    let state = Arc::new(AppState::new(config, store));

    (create_router(state.clone()), state)
}

/// Build an identity directly, bypassing the broker.
#[allow(dead_code)]
pub fn test_identity(email: &str) -> Identity {
    let now = Utc::now();
    Identity {
        id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        email: email.to_string(),
        hashed_password: None,
        github_id: Some("test-github-id".to_string()),
        google_id: None,
        email_verified: true,
        display_name: Some("Test User".to_string()),
        profile: UserProfile::default(),
        created_at: now,
        updated_at: now,
    }
}
