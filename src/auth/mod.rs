// SPDX-License-Identifier: MIT
// Copyright 2026 HUD Docs Platform Authors

//! Session and OAuth-state token handling.

pub mod session;
pub mod state;

pub use session::{SessionCodec, SessionIdentity, SESSION_COOKIE};
pub use state::StateCodec;
