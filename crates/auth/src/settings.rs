//! Codec configuration sourced from the environment.

use thiserror::Error;

pub const SECRET_VAR: &str = "MAPLOG_JWT_SECRET";
pub const VALIDITY_VAR: &str = "MAPLOG_JWT_VALIDITY_MS";
pub const LEEWAY_VAR: &str = "MAPLOG_JWT_LEEWAY_SECS";

/// Upper bound on tolerated clock skew. Anything larger would make `exp`
/// meaningless.
pub const MAX_LEEWAY_SECS: u64 = 3600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Inputs needed to build a [`crate::TokenCodec`].
///
/// Secret and validity window are both required; there are no defaults for
/// either.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSettings {
    /// Base64-encoded signing secret.
    pub secret: String,
    /// Validity window of each issued pair, in milliseconds.
    pub validity_ms: u64,
    /// Clock skew tolerated when checking expiry, in seconds.
    pub leeway_secs: u64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, validity_ms: u64) -> Self {
        Self {
            secret: secret.into(),
            validity_ms,
            leeway_secs: 0,
        }
    }

    pub fn with_leeway_secs(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR)
            .filter(|s| !s.trim().is_empty())
            .ok_or(SettingsError::Missing(SECRET_VAR))?;

        let validity_ms = lookup(VALIDITY_VAR).ok_or(SettingsError::Missing(VALIDITY_VAR))?;
        let validity_ms = parse_u64(VALIDITY_VAR, &validity_ms)?;
        if validity_ms == 0 {
            return Err(SettingsError::Invalid {
                var: VALIDITY_VAR,
                reason: "must be greater than zero".to_string(),
            });
        }

        let leeway_secs = match lookup(LEEWAY_VAR) {
            Some(raw) => parse_u64(LEEWAY_VAR, &raw)?,
            None => 0,
        };
        if leeway_secs > MAX_LEEWAY_SECS {
            return Err(SettingsError::Invalid {
                var: LEEWAY_VAR,
                reason: format!("must be at most {MAX_LEEWAY_SECS} seconds"),
            });
        }

        Ok(Self {
            secret,
            validity_ms,
            leeway_secs,
        })
    }
}

fn parse_u64(var: &'static str, raw: &str) -> Result<u64, SettingsError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| SettingsError::Invalid {
        var,
        reason: e.to_string(),
    })
}

impl core::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("validity_ms", &self.validity_ms)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}
