// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Identity resolution: OAuth login/linking and password accounts.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use password_hash::{PasswordHash, SaltString};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Identity, Provider, UserProfile};
use crate::services::oauth::ProviderProfile;
use crate::store::Store;

/// Resolves external credentials to internal identities.
#[derive(Clone)]
pub struct IdentityBroker {
    store: Store,
}

impl IdentityBroker {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Resolve an OAuth login to an identity, creating or linking records.
    ///
    /// Lookup order is provider id, then email, so a provider login lands on
    /// an existing account sharing the email instead of duplicating it.
    /// Calling twice with identical provider data yields the same identity.
    pub async fn resolve_oauth(
        &self,
        provider: Provider,
        profile: &ProviderProfile,
    ) -> Result<Identity> {
        let email = profile
            .email
            .as_deref()
            .filter(|_| profile.verified)
            .ok_or(AppError::MissingVerifiedEmail)?;

        if let Some(existing) = self
            .store
            .find_identity_by_provider(provider, &profile.id)
            .await?
        {
            return self.backfill(existing, provider, profile).await;
        }

        if let Some(existing) = self.store.find_identity_by_email(email).await? {
            tracing::info!(
                user_id = %existing.id,
                provider = %provider,
                "Linking provider login to existing account"
            );
            return self.backfill(existing, provider, profile).await;
        }

        let now = Utc::now();
        let mut identity = Identity {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: None,
            github_id: None,
            google_id: None,
            // OAuth emails are trusted
            email_verified: true,
            display_name: profile.name.clone(),
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        };
        identity.set_provider_id(provider, profile.id.clone());

        self.store.insert_identity(&identity).await?;

        tracing::info!(user_id = %identity.id, provider = %provider, "Created identity");
        Ok(identity)
    }

    /// Fill in missing provider id, display name, and verified flag without
    /// overwriting anything the user already chose.
    async fn backfill(
        &self,
        mut identity: Identity,
        provider: Provider,
        profile: &ProviderProfile,
    ) -> Result<Identity> {
        let mut changed = false;

        if identity.provider_id(provider).is_none() {
            identity.set_provider_id(provider, profile.id.clone());
            changed = true;
        }
        if identity.display_name.is_none() {
            if let Some(name) = &profile.name {
                identity.display_name = Some(name.clone());
                changed = true;
            }
        }
        if !identity.email_verified {
            identity.email_verified = true;
            changed = true;
        }

        if changed {
            identity.updated_at = Utc::now();
            self.store.update_identity(&identity).await?;
        }

        Ok(identity)
    }

    /// Resolve an email/password login.
    ///
    /// Unknown email, provider-only account, and wrong password all fail
    /// with the same `InvalidCredentials` error.
    pub async fn resolve_password(&self, email: &str, password: &str) -> Result<Identity> {
        let identity = self
            .store
            .find_identity_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let hash = identity
            .hashed_password
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(hash, password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(identity)
    }

    /// Create a password-backed identity. The email starts unverified.
    pub async fn create_password_identity(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<Identity> {
        if self.store.find_identity_by_email(email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: Some(hash_password(password)?),
            github_id: None,
            google_id: None,
            email_verified: false,
            display_name,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_identity(&identity).await?;

        tracing::info!(user_id = %identity.id, "Created password identity");
        Ok(identity)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("salt generation failed: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("salt encoding failed: {}", e)))?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))?
        .to_string();
    Ok(phc)
}

fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}
