// src/server/auth.rs

//! HTTP Basic credential check for the trigger endpoint.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};
use crate::models::AuthConfig;

/// Username/password pair decoded from an `Authorization: Basic` header.
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode the `Authorization` header, if it carries Basic credentials.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Compare two byte strings in time independent of where they differ.
///
/// Both sides are hashed first so the comparison also hides their lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let a = Sha256::digest(a);
    let b = Sha256::digest(b);
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Accept the request only if it carries the configured credentials.
pub fn verify(headers: &HeaderMap, expected: &AuthConfig) -> Result<()> {
    let Some(credentials) = BasicCredentials::from_headers(headers) else {
        tracing::warn!("Trigger request without Basic credentials");
        return Err(AppError::Unauthorized);
    };

    // Evaluate both before deciding.
    let username_ok = constant_time_eq(
        credentials.username.as_bytes(),
        expected.username.as_bytes(),
    );
    let password_ok = constant_time_eq(
        credentials.password.as_bytes(),
        expected.password.as_bytes(),
    );

    if username_ok & password_ok {
        Ok(())
    } else {
        tracing::warn!("Trigger request with wrong credentials");
        Err(AppError::Unauthorized)
    }
}
