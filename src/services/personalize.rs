// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Cached content transformations keyed by user and lesson.
//!
//! Each `(user, lesson[, language])` key moves through a small lifecycle:
//! absent, then cached after a generation, then invalidated when the user's
//! profile drifts away from the snapshot taken at write time, then absent
//! again. Caching is an optimization only; a store failure never blocks
//! returning freshly generated content.

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CacheEntry, ContentVariant, Identity, ProfileSnapshot, UserProfile};
use crate::services::generation::Generator;
use crate::store::Store;

/// Language used when a translation request does not name one.
pub const DEFAULT_TARGET_LANGUAGE: &str = "urdu";

const FALLBACK_CONTEXT: &str = "General Engineering";

/// Returned to the caller when the collaborator fails; never cached.
const GENERATION_UNAVAILABLE: &str =
    "System error: content generation is currently unavailable. Please try again later.";

/// Derive the stable key for a lesson from its canonical URL.
///
/// UUIDv5 in the URL namespace: the same URL always maps to the same key,
/// across restarts and deploys.
pub fn lesson_key(lesson_url: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, lesson_url.as_bytes())
}

/// One transformation request from a route handler.
#[derive(Debug, Clone, Copy)]
pub struct TransformRequest<'a> {
    /// Canonical URL of the lesson being transformed
    pub lesson_url: &'a str,
    /// Lesson text to transform
    pub content: &'a str,
    /// Caller-supplied personalization context, if any
    pub context: Option<&'a str>,
    /// Target language for translations
    pub target_language: Option<&'a str>,
}

/// Serves cached generated content and decides when to regenerate.
#[derive(Clone)]
pub struct PersonalizeService<G> {
    store: Store,
    generator: G,
}

impl<G: Generator> PersonalizeService<G> {
    pub fn new(store: Store, generator: G) -> Self {
        Self { store, generator }
    }

    /// Return content for `(user, lesson, variant)`, generating on demand.
    ///
    /// Personalization entries are only served while their stored profile
    /// snapshot still equals the user's live profile; a drifted entry is
    /// deleted and regenerated. Summary and translation entries are
    /// profile-independent and served unconditionally.
    pub async fn get_or_generate(
        &self,
        user: &Identity,
        variant: ContentVariant,
        request: TransformRequest<'_>,
    ) -> Result<String> {
        let key = lesson_key(request.lesson_url);
        let language = match variant {
            ContentVariant::Translation => {
                Some(request.target_language.unwrap_or(DEFAULT_TARGET_LANGUAGE))
            }
            _ => None,
        };

        if let Some(entry) = self
            .store
            .get_cache_entry(user.id, key, variant, language)
            .await?
        {
            if variant != ContentVariant::Personalization {
                tracing::debug!(user_id = %user.id, lesson_key = %key, variant = variant.as_str(), "Serving cached content");
                return Ok(entry.content);
            }

            let live = ProfileSnapshot::from(&user.profile);
            if entry.profile_snapshot.as_ref() == Some(&live) {
                tracing::debug!(user_id = %user.id, lesson_key = %key, "Serving cached personalization");
                return Ok(entry.content);
            }

            tracing::info!(
                user_id = %user.id,
                lesson_key = %key,
                "Profile drift detected, invalidating cached personalization"
            );
            self.store
                .delete_cache_entry(user.id, key, variant, language)
                .await?;
        }

        let context = effective_context(variant, &user.profile, &request, language);
        let skill = skill_for(variant);

        let generated = match self
            .generator
            .generate(skill, request.content, context.as_deref())
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, skill, user_id = %user.id, "Generation failed");
                return Ok(GENERATION_UNAVAILABLE.to_string());
            }
        };

        let entry = CacheEntry {
            user_id: user.id,
            tenant_id: user.tenant_id,
            lesson_key: key,
            variant,
            content: generated.clone(),
            profile_snapshot: (variant == ContentVariant::Personalization)
                .then(|| ProfileSnapshot::from(&user.profile)),
            target_language: language.map(str::to_string),
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.upsert_cache_entry(&entry).await {
            tracing::warn!(
                error = %e,
                user_id = %user.id,
                lesson_key = %key,
                "Failed to persist generated content, serving uncached"
            );
        }

        Ok(generated)
    }
}

fn skill_for(variant: ContentVariant) -> &'static str {
    match variant {
        ContentVariant::Personalization => "content-personalizer",
        ContentVariant::Summary => "lesson-summarizer",
        ContentVariant::Translation => "lesson-translator",
    }
}

/// Context string handed to the generator alongside the skill prompt.
fn effective_context(
    variant: ContentVariant,
    profile: &UserProfile,
    request: &TransformRequest<'_>,
    language: Option<&str>,
) -> Option<String> {
    match variant {
        ContentVariant::Summary => None,
        ContentVariant::Translation => language.map(|l| format!("Target language: {}", l)),
        ContentVariant::Personalization => profile_context(profile)
            .or_else(|| request.context.map(str::to_string))
            .or_else(|| Some(FALLBACK_CONTEXT.to_string())),
    }
}

fn profile_context(profile: &UserProfile) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(v) = &profile.programming_proficiency {
        parts.push(format!("Programming proficiency: {}", v));
    }
    if let Some(v) = &profile.ai_proficiency {
        parts.push(format!("AI proficiency: {}", v));
    }
    if let Some(v) = &profile.hardware_info {
        parts.push(format!("Hardware: {}", v));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(". "))
    }
}
