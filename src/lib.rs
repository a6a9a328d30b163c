// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Backend API for the documentation platform.
//!
//! This crate provides account management (OAuth and password login),
//! signed session tokens, and on-demand content transformations
//! (summarize, translate, personalize) served through a per-user cache
//! that tracks profile drift.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use auth::{SessionCodec, StateCodec};
use config::Config;
use services::{GenerationClient, IdentityBroker, OAuthClient, PersonalizeService};
use store::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub oauth_state: StateCodec,
    pub sessions: SessionCodec,
    pub oauth: OAuthClient,
    pub identity: IdentityBroker,
    pub personalize: PersonalizeService<GenerationClient>,
}

impl AppState {
    /// Wire up all handles from configuration and a store. Everything is
    /// constructed here and injected; nothing is process-global.
    pub fn new(config: Config, store: Store) -> Self {
        let oauth_state = StateCodec::new(&config.oauth_state_key);
        let sessions = SessionCodec::new(
            &config.session_signing_key,
            config.session_ttl_secs,
            config.cookie_secure(),
        );
        let oauth = OAuthClient::new(&config);
        let identity = IdentityBroker::new(store.clone());
        let personalize = PersonalizeService::new(store.clone(), GenerationClient::new(&config));

        Self {
            config,
            store,
            oauth_state,
            sessions,
            oauth,
            identity,
            personalize,
        }
    }
}
