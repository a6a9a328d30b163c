// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Identity resolution tests: OAuth creation/linking and password flows.

use hud_docs_api::error::AppError;
use hud_docs_api::models::Provider;
use hud_docs_api::services::{IdentityBroker, ProviderProfile};
use hud_docs_api::store::Store;

fn github_profile(id: &str, email: &str, name: Option<&str>) -> ProviderProfile {
    ProviderProfile {
        id: id.to_string(),
        email: Some(email.to_string()),
        verified: true,
        name: name.map(str::to_string),
    }
}

#[tokio::test]
async fn test_resolve_oauth_creates_identity() {
    let broker = IdentityBroker::new(Store::in_memory());
    let profile = github_profile("gh-1", "new@example.com", Some("New User"));

    let identity = broker
        .resolve_oauth(Provider::Github, &profile)
        .await
        .unwrap();

    assert_eq!(identity.email, "new@example.com");
    assert_eq!(identity.github_id.as_deref(), Some("gh-1"));
    assert_eq!(identity.display_name.as_deref(), Some("New User"));
    assert!(identity.email_verified, "OAuth emails are trusted");
    assert!(identity.hashed_password.is_none());
}

#[tokio::test]
async fn test_resolve_oauth_is_idempotent() {
    let store = Store::in_memory();
    let broker = IdentityBroker::new(store.clone());
    let profile = github_profile("gh-2", "repeat@example.com", Some("Repeat"));

    let first = broker
        .resolve_oauth(Provider::Github, &profile)
        .await
        .unwrap();
    let second = broker
        .resolve_oauth(Provider::Github, &profile)
        .await
        .unwrap();

    assert_eq!(first.id, second.id, "same provider data, same identity");
    assert_eq!(first.tenant_id, second.tenant_id);

    // Exactly one record behind both lookups
    let by_email = store
        .find_identity_by_email("repeat@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, first.id);
}

#[tokio::test]
async fn test_resolve_oauth_links_to_password_account_by_email() {
    let store = Store::in_memory();
    let broker = IdentityBroker::new(store.clone());

    let created = broker
        .create_password_identity("shared@example.com", "password123", None)
        .await
        .unwrap();
    assert!(!created.email_verified);

    let profile = github_profile("gh-3", "shared@example.com", Some("Linked"));
    let linked = broker
        .resolve_oauth(Provider::Github, &profile)
        .await
        .unwrap();

    assert_eq!(linked.id, created.id, "login lands on the existing account");
    assert_eq!(linked.tenant_id, created.tenant_id, "tenant never changes");
    assert_eq!(linked.github_id.as_deref(), Some("gh-3"));
    assert_eq!(linked.display_name.as_deref(), Some("Linked"));
    assert!(linked.email_verified, "provider vouches for the email");

    // Password login still works after linking
    let resolved = broker
        .resolve_password("shared@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(resolved.id, created.id);
}

#[tokio::test]
async fn test_backfill_does_not_overwrite_chosen_display_name() {
    let broker = IdentityBroker::new(Store::in_memory());

    broker
        .create_password_identity("named@example.com", "password123", Some("Chosen".to_string()))
        .await
        .unwrap();

    let profile = github_profile("gh-4", "named@example.com", Some("Provider Name"));
    let linked = broker
        .resolve_oauth(Provider::Github, &profile)
        .await
        .unwrap();

    assert_eq!(linked.display_name.as_deref(), Some("Chosen"));
}

#[tokio::test]
async fn test_resolve_oauth_requires_verified_email() {
    let broker = IdentityBroker::new(Store::in_memory());

    let unverified = ProviderProfile {
        id: "gh-5".to_string(),
        email: Some("unverified@example.com".to_string()),
        verified: false,
        name: None,
    };
    assert!(matches!(
        broker.resolve_oauth(Provider::Github, &unverified).await,
        Err(AppError::MissingVerifiedEmail)
    ));

    let missing = ProviderProfile {
        id: "gh-6".to_string(),
        email: None,
        verified: true,
        name: None,
    };
    assert!(matches!(
        broker.resolve_oauth(Provider::Github, &missing).await,
        Err(AppError::MissingVerifiedEmail)
    ));
}

#[tokio::test]
async fn test_signup_rejects_existing_email() {
    let broker = IdentityBroker::new(Store::in_memory());

    broker
        .create_password_identity("taken@example.com", "password123", None)
        .await
        .unwrap();

    assert!(matches!(
        broker
            .create_password_identity("taken@example.com", "different1", None)
            .await,
        Err(AppError::EmailTaken)
    ));
}

#[tokio::test]
async fn test_password_failures_are_indistinguishable() {
    let broker = IdentityBroker::new(Store::in_memory());

    broker
        .create_password_identity("a@x.com", "p1p1p1p1", None)
        .await
        .unwrap();

    // Correct credentials succeed
    let ok = broker.resolve_password("a@x.com", "p1p1p1p1").await.unwrap();
    assert_eq!(ok.email, "a@x.com");

    // Wrong password and unknown user fail with the same message
    let wrong_password = broker.resolve_password("a@x.com", "wrong").await.unwrap_err();
    let unknown_user = broker.resolve_password("b@x.com", "p1p1p1p1").await.unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_user, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn test_provider_only_account_rejects_password_login() {
    let broker = IdentityBroker::new(Store::in_memory());

    let profile = github_profile("gh-7", "oauth-only@example.com", None);
    broker
        .resolve_oauth(Provider::Github, &profile)
        .await
        .unwrap();

    let err = broker
        .resolve_password("oauth-only@example.com", "anything!")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_cross_provider_linking_by_email() {
    let broker = IdentityBroker::new(Store::in_memory());

    let github = github_profile("gh-8", "both@example.com", Some("Both"));
    let first = broker.resolve_oauth(Provider::Github, &github).await.unwrap();

    let google = ProviderProfile {
        id: "goog-8".to_string(),
        email: Some("both@example.com".to_string()),
        verified: true,
        name: Some("Both".to_string()),
    };
    let second = broker.resolve_oauth(Provider::Google, &google).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.github_id.as_deref(), Some("gh-8"));
    assert_eq!(second.google_id.as_deref(), Some("goog-8"));
}
