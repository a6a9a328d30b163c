//! Application configuration loaded from environment variables.
//!
//! A single `SECRET_KEY` is expanded into the OAuth-state MAC key and the
//! session signing key via HKDF, so rotating one env var rotates both.

use hkdf::Hkdf;
use sha2::Sha256;
use std::env;

/// Default session lifetime: 30 days.
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,

    // --- OAuth providers ---
    pub github_client_id: String,
    pub github_client_secret: String,
    pub google_client_id: String,
    pub google_client_secret: String,

    // --- Derived keys (never logged) ---
    /// MAC key for the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
    /// Signing key for session tokens
    pub session_signing_key: Vec<u8>,

    /// Session token lifetime in seconds
    pub session_ttl_secs: u64,

    // --- Generation collaborator ---
    /// API key for the generation service; empty disables generation
    pub generation_api_key: String,
    pub generation_base_url: String,
    pub generation_model: String,
    /// Directory holding `<skill>/SKILL.md` definitions
    pub skills_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key =
            env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            github_client_id: env::var("GITHUB_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GITHUB_CLIENT_ID"))?,
            github_client_secret: env::var("GITHUB_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GITHUB_CLIENT_SECRET"))?,
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,

            oauth_state_key: derive_key(secret_key.as_bytes(), b"oauth-state"),
            session_signing_key: derive_key(secret_key.as_bytes(), b"session-token"),

            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),

            generation_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            generation_base_url: env::var("GENERATION_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
            }),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            skills_dir: env::var("SKILLS_DIR").unwrap_or_else(|_| "skills".to_string()),
        })
    }

    /// Whether session cookies need the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            github_client_id: "test_github_id".to_string(),
            github_client_secret: "test_github_secret".to_string(),
            google_client_id: "test_google_id".to_string(),
            google_client_secret: "test_google_secret".to_string(),
            oauth_state_key: derive_key(b"test_secret_key_32_bytes_minimum!", b"oauth-state"),
            session_signing_key: derive_key(
                b"test_secret_key_32_bytes_minimum!",
                b"session-token",
            ),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            generation_api_key: String::new(),
            generation_base_url: "http://localhost:9999".to_string(),
            generation_model: "test-model".to_string(),
            skills_dir: "skills".to_string(),
        }
    }
}

/// Expand the master secret into a 32-byte purpose-bound key.
fn derive_key(secret: &[u8], label: &[u8]) -> Vec<u8> {
    let hk = Hkdf::<Sha256>::new(None, secret);
    let mut okm = [0u8; 32];
    hk.expand(label, &mut okm)
        .expect("32 bytes is a valid HKDF-SHA256 output length");
    okm.to_vec()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
