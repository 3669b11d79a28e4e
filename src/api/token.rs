//! Credential issuer: short-lived HS256 tokens for the `FEEDMOB-TOKEN` header.
//!
//! A token is minted for every outgoing request and never cached. Its payload
//! carries the literal key identifier and an expiry date seven days after the
//! minting date (`YYYY-MM-DD`, no time component).

use crate::types::{Error, Result};
use chrono::{Days, NaiveDate, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token lifetime in days.
pub const TOKEN_TTL_DAYS: u64 = 7;

/// Date format of the `expired_at` claim.
pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Credentials
// =============================================================================

/// Key identifier and signing secret. Immutable for the process lifetime.
#[derive(Clone)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Both halves must be non-empty; anything else is a fatal startup error.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let secret = secret.into();
        if key.trim().is_empty() {
            return Err(Error::config("FEEDMOB_KEY must be set"));
        }
        if secret.trim().is_empty() {
            return Err(Error::config("FEEDMOB_SECRET must be set"));
        }
        Ok(Self { key, secret })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Claims
// =============================================================================

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub key: String,
    pub expired_at: String,
    /// Per-token nonce so two tokens minted on the same day differ.
    pub jti: String,
}

/// A signed token ready for the `FEEDMOB-TOKEN` header.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignedToken(<redacted>)")
    }
}

// =============================================================================
// Issuer
// =============================================================================

/// Mints tokens bound to one credential pair.
#[derive(Clone)]
pub struct TokenIssuer {
    credentials: Credentials,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(credentials: Credentials) -> Self {
        let encoding_key = EncodingKey::from_secret(credentials.secret.as_bytes());
        Self {
            credentials,
            encoding_key,
        }
    }

    pub fn key(&self) -> &str {
        self.credentials.key()
    }

    /// Mint a fresh token expiring seven days from today (UTC).
    pub fn mint(&self) -> Result<SignedToken> {
        self.mint_on(Utc::now().date_naive())
    }

    /// Mint a token as if issued on `issued_on`.
    pub fn mint_on(&self, issued_on: NaiveDate) -> Result<SignedToken> {
        let claims = TokenClaims {
            key: self.credentials.key.clone(),
            expired_at: expiry_date(issued_on)?,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SignedToken)
            .map_err(|e| Error::config(format!("failed to sign request token: {e}")))
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// `issued_on + 7 days`, formatted `YYYY-MM-DD`.
pub fn expiry_date(issued_on: NaiveDate) -> Result<String> {
    issued_on
        .checked_add_days(Days::new(TOKEN_TTL_DAYS))
        .map(|d| d.format(EXPIRY_DATE_FORMAT).to_string())
        .ok_or_else(|| Error::config(format!("token expiry overflows calendar from {issued_on}")))
}
