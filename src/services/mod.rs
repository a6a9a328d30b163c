// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Services module - business logic layer.

pub mod generation;
pub mod identity;
pub mod oauth;
pub mod personalize;

pub use generation::{GenerationClient, Generator};
pub use identity::IdentityBroker;
pub use oauth::{OAuthClient, ProviderProfile};
pub use personalize::{lesson_key, PersonalizeService, TransformRequest};
