// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Text-generation collaborator client.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. Which
//! transformation runs is decided by a skill definition: a `SKILL.md` file
//! whose body (frontmatter stripped) becomes the system prompt.

use serde::Deserialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can produce generated text for a skill.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        skill: &str,
        content: &str,
        context: Option<&str>,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Client for the remote generation service.
#[derive(Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    skills_dir: PathBuf,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Self {
        if config.generation_api_key.is_empty() {
            tracing::warn!("Generation API key is not set; generation requests will fail");
        }

        Self {
            http: reqwest::Client::new(),
            api_key: config.generation_api_key.clone(),
            base_url: config.generation_base_url.trim_end_matches('/').to_string(),
            model: config.generation_model.clone(),
            skills_dir: PathBuf::from(&config.skills_dir),
        }
    }
}

impl Generator for GenerationClient {
    async fn generate(
        &self,
        skill: &str,
        content: &str,
        context: Option<&str>,
    ) -> Result<String, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::UpstreamProvider(
                "generation service is not configured".to_string(),
            ));
        }

        let mut instructions = load_skill_instructions(&self.skills_dir, skill)?;
        if let Some(context) = context {
            instructions.push_str("\n\n**Context/User Preference**: ");
            instructions.push_str(context);
        }

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": instructions },
                { "role": "user", "content": content },
            ],
        });

        tracing::info!(skill, "Requesting generation");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::UpstreamProvider(format!("generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamProvider(format!(
                "generation HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamProvider(format!("JSON parse error: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::UpstreamProvider("generation returned no choices".to_string())
            })
    }
}

/// Load a skill's system prompt from `<skills_dir>/<skill>/SKILL.md`,
/// stripping the frontmatter block if present.
pub fn load_skill_instructions(skills_dir: &Path, skill: &str) -> Result<String, AppError> {
    let path = skills_dir.join(skill).join("SKILL.md");

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "skill '{}' is not defined at {}: {}",
            skill,
            path.display(),
            e
        ))
    })?;

    // Frontmatter is delimited by "---"; the prompt is whatever follows.
    let parts: Vec<&str> = raw.splitn(3, "---").collect();
    let instructions = if parts.len() >= 3 { parts[2] } else { &raw };

    Ok(instructions.trim().to_string())
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(dir: &Path, skill: &str, content: &str) {
        let skill_dir = dir.join(skill);
        std::fs::create_dir_all(&skill_dir).unwrap();
        std::fs::write(skill_dir.join("SKILL.md"), content).unwrap();
    }

    #[test]
    fn test_load_skill_strips_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write_skill(
            dir.path(),
            "lesson-summarizer",
            "---\nname: lesson-summarizer\n---\nSummarize the lesson.",
        );

        let instructions =
            load_skill_instructions(dir.path(), "lesson-summarizer").unwrap();
        assert_eq!(instructions, "Summarize the lesson.");
    }

    #[test]
    fn test_load_skill_without_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write_skill(dir.path(), "content-personalizer", "Adapt to the reader.\n");

        let instructions =
            load_skill_instructions(dir.path(), "content-personalizer").unwrap();
        assert_eq!(instructions, "Adapt to the reader.");
    }

    #[test]
    fn test_load_missing_skill_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_skill_instructions(dir.path(), "no-such-skill").is_err());
    }
}
