// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Stateless, signed CSRF state for the OAuth redirect flow.
//!
//! The `state` query parameter is `base64url(timestamp.nonce.signature)`
//! where the signature is an HMAC-SHA256 over `timestamp.nonce` keyed with
//! a server secret. Verification is purely cryptographic, so no server-side
//! session store is needed and no session affinity is required. A verified
//! state stays accepted for its whole TTL window; replay within that window
//! requires possession of a token that only ever travels the redirect chain.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of an issued state token.
pub const STATE_TTL_SECS: u64 = 600;

const NONCE_LEN: usize = 16;

/// Issues and verifies the OAuth `state` parameter.
#[derive(Clone)]
pub struct StateCodec {
    key: Vec<u8>,
    rng: SystemRandom,
}

impl StateCodec {
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: key.to_vec(),
            rng: SystemRandom::new(),
        }
    }

    /// Issue a fresh signed state. No server-side record is kept.
    pub fn issue(&self) -> Result<String> {
        let timestamp = unix_now()?;

        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;

        self.issue_at(timestamp, &nonce)
    }

    fn issue_at(&self, timestamp: u64, nonce: &[u8]) -> Result<String> {
        let payload = format!("{}.{}", timestamp, hex::encode(nonce));
        let signature = hex::encode(self.sign(payload.as_bytes())?);
        Ok(URL_SAFE_NO_PAD.encode(format!("{}.{}", payload, signature)))
    }

    /// Verify a state parameter. Fails closed: malformed input, wrong field
    /// count, expiry, and signature mismatch all return `false`.
    pub fn verify(&self, state: &str) -> bool {
        match unix_now() {
            Ok(now) => self.verify_at(state, now),
            Err(_) => false,
        }
    }

    fn verify_at(&self, state: &str, now: u64) -> bool {
        let Ok(bytes) = URL_SAFE_NO_PAD.decode(state) else {
            return false;
        };
        let Ok(raw) = String::from_utf8(bytes) else {
            return false;
        };

        // Format is "timestamp.nonce_hex.signature_hex"
        let parts: Vec<&str> = raw.splitn(3, '.').collect();
        if parts.len() != 3 {
            return false;
        }

        let Ok(timestamp) = parts[0].parse::<u64>() else {
            return false;
        };
        if now.saturating_sub(timestamp) > STATE_TTL_SECS {
            return false;
        }

        let payload = format!("{}.{}", parts[0], parts[1]);
        let Ok(expected) = self.sign(payload.as_bytes()) else {
            return false;
        };
        let Ok(supplied) = hex::decode(parts[2]) else {
            return false;
        };

        bool::from(expected.as_slice().ct_eq(supplied.as_slice()))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("system time error: {}", e)))?
        .as_secs())
}
