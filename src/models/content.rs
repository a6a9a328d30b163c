//! Generated-content cache models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identity::UserProfile;

/// Kind of generated content stored per lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentVariant {
    Personalization,
    Summary,
    Translation,
}

impl ContentVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentVariant::Personalization => "personalization",
            ContentVariant::Summary => "summary",
            ContentVariant::Translation => "translation",
        }
    }
}

/// Profile fields captured when a personalization entry is written.
///
/// The entry stays valid only while these equal the live profile; any
/// divergence marks it stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub programming_proficiency: Option<String>,
    pub ai_proficiency: Option<String>,
    pub hardware_info: Option<String>,
}

impl From<&UserProfile> for ProfileSnapshot {
    fn from(profile: &UserProfile) -> Self {
        Self {
            programming_proficiency: profile.programming_proficiency.clone(),
            ai_proficiency: profile.ai_proficiency.clone(),
            hardware_info: profile.hardware_info.clone(),
        }
    }
}

/// One cached transformation of a lesson for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    /// Stable key derived from the lesson's canonical URL
    pub lesson_key: Uuid,
    pub variant: ContentVariant,
    pub content: String,
    /// Set for personalization entries only
    pub profile_snapshot: Option<ProfileSnapshot>,
    /// Set for translation entries only
    pub target_language: Option<String>,
    pub created_at: DateTime<Utc>,
}
