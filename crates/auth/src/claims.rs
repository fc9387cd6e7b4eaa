use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::authority::join_authorities;
use crate::{PrincipalDescriptor, TokenError};

/// Claims carried by both halves of a token pair.
///
/// Access tokens set `sub` and `auth`; refresh tokens carry only `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject / principal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Comma-joined authorities.
    #[serde(rename = "auth", default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<String>,

    /// Expiration, epoch seconds.
    pub exp: i64,
}

impl TokenClaims {
    pub fn access(principal: &PrincipalDescriptor, exp: i64) -> Self {
        Self {
            sub: Some(principal.subject.clone()),
            authorities: Some(join_authorities(&principal.authorities)),
            exp,
        }
    }

    pub fn refresh(exp: i64) -> Self {
        Self {
            sub: None,
            authorities: None,
            exp,
        }
    }

    pub fn expires_at_millis(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }
}

/// Validate decoded claims against `now`.
///
/// The signature must already have been verified; an `Expired` result means
/// the token is authentic but stale.
pub fn validate_claims(
    claims: &TokenClaims,
    now: DateTime<Utc>,
    leeway: Duration,
) -> Result<(), TokenError> {
    match (&claims.sub, &claims.authorities) {
        (Some(sub), _) if sub.is_empty() => return Err(TokenError::InvalidClaims),
        (None, Some(_)) => return Err(TokenError::InvalidClaims),
        _ => {}
    }

    let deadline = claims
        .expires_at_millis()
        .saturating_add(leeway.num_milliseconds());
    if now.timestamp_millis() > deadline {
        return Err(TokenError::Expired);
    }
    Ok(())
}
