//! Identity and profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// OAuth providers accepted for login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Github,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Github => "github",
            Provider::Google => "google",
        }
    }

    /// Parse a provider from a URL path segment.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "github" => Some(Provider::Github),
            "google" => Some(Provider::Google),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account.
///
/// `tenant_id` is assigned once at creation and never changes. At least one
/// of `hashed_password` or a provider id is always set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    /// Isolation boundary for this account's records
    pub tenant_id: Uuid,
    /// Unique email address
    pub email: String,
    /// Argon2 PHC string; `None` for provider-only accounts
    pub hashed_password: Option<String>,
    pub github_id: Option<String>,
    pub google_id: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn provider_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Github => self.github_id.as_deref(),
            Provider::Google => self.google_id.as_deref(),
        }
    }

    pub fn set_provider_id(&mut self, provider: Provider, id: String) {
        match provider {
            Provider::Github => self.github_id = Some(id),
            Provider::Google => self.google_id = Some(id),
        }
    }
}

/// Profile fields used to steer personalized content.
///
/// Created empty at signup; updated only through [`UserProfile::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub programming_proficiency: Option<String>,
    pub ai_proficiency: Option<String>,
    pub hardware_info: Option<String>,
}

impl UserProfile {
    /// Apply a partial update. Only supplied fields overwrite, so repeating
    /// the same update is a no-op.
    pub fn merge(&mut self, update: ProfileUpdate) {
        if let Some(v) = update.programming_proficiency {
            self.programming_proficiency = Some(v);
        }
        if let Some(v) = update.ai_proficiency {
            self.ai_proficiency = Some(v);
        }
        if let Some(v) = update.hardware_info {
            self.hardware_info = Some(v);
        }
    }
}

/// Partial profile update accepted at the API boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub programming_proficiency: Option<String>,
    pub ai_proficiency: Option<String>,
    pub hardware_info: Option<String>,
}
