//! Issue and verify signed access/refresh token pairs.
//!
//! Tokens are compact JWS strings signed with HS512 under a single process
//! key. Nothing is stored server-side: every verification is evaluated fresh
//! from the token's own signature and `exp` claim.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::authority::split_authorities;
use crate::claims::{TokenClaims, validate_claims};
use crate::clock::{Clock, SystemClock};
use crate::settings::{MAX_LEEWAY_SECS, TokenSettings};
use crate::{Authentication, IssueError, KeyError, PrincipalDescriptor, TokenError};

/// The only signing algorithm this codec produces or accepts.
pub const ALGORITHM: Algorithm = Algorithm::HS512;

/// HS512 needs a key at least as long as its 512-bit output.
pub const MIN_KEY_BYTES: usize = 64;

/// Grant type reported with every pair.
pub const GRANT_TYPE: &str = "bearer";

/// An access/refresh pair minted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub grant_type: String,
    pub access_token: String,
    pub refresh_token: String,

    /// Shared expiration of both tokens, epoch milliseconds.
    #[serde(rename = "tokenValidityMilliseconds")]
    pub expires_at: i64,
}

/// Verification outcome without claim extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    Expired,
    Invalid(TokenError),
}

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
    typ: Option<String>,
}

/// Stateless token codec.
///
/// Immutable after construction and safe to share across threads.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: Duration,
    leeway: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec from a base64 secret and a validity window in milliseconds.
    pub fn new(secret: &str, validity_ms: u64) -> Result<Self, KeyError> {
        let key = decode_secret(secret)?;
        let validity = i64::try_from(validity_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .and_then(Duration::try_milliseconds)
            .ok_or(KeyError::InvalidValidity(validity_ms))?;

        // Expiry is checked against the injected clock, not the decoder's.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(&key),
            decoding: DecodingKey::from_secret(&key),
            validation,
            validity,
            leeway: Duration::zero(),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn from_settings(settings: &TokenSettings) -> Result<Self, KeyError> {
        let leeway = Some(settings.leeway_secs)
            .filter(|secs| *secs <= MAX_LEEWAY_SECS)
            .and_then(|secs| Duration::try_seconds(secs as i64))
            .ok_or(KeyError::InvalidLeeway(settings.leeway_secs))?;
        Ok(Self::new(&settings.secret, settings.validity_ms)?.with_leeway(leeway))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Clock skew tolerated past `exp`.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway.max(Duration::zero());
        self
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Mint an access/refresh pair for an authenticated principal.
    pub fn issue(&self, principal: &PrincipalDescriptor) -> Result<TokenPair, IssueError> {
        if principal.subject.is_empty() {
            return Err(IssueError::EmptySubject);
        }
        if let Some(bad) = principal.authorities.iter().find(|a| !a.is_encodable()) {
            return Err(IssueError::InvalidAuthority(bad.to_string()));
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.validity)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        // `exp` has second resolution; the pair reports what the tokens enforce.
        let exp = expires_at.timestamp();

        let header = Header::new(ALGORITHM);
        let access_token = jsonwebtoken::encode(
            &header,
            &TokenClaims::access(principal, exp),
            &self.encoding,
        )?;
        let refresh_token =
            jsonwebtoken::encode(&header, &TokenClaims::refresh(exp), &self.encoding)?;

        tracing::debug!(
            subject = %principal.subject,
            authorities = principal.authorities.len(),
            expires_at = %expires_at,
            "issued token pair"
        );

        Ok(TokenPair {
            grant_type: GRANT_TYPE.to_string(),
            access_token,
            refresh_token,
            expires_at: exp.saturating_mul(1000),
        })
    }

    /// Verify a token and recover the principal it was issued for.
    ///
    /// Refresh tokens verify to an anonymous principal with no authorities.
    pub fn authenticate(&self, token: &str) -> Result<Authentication, TokenError> {
        let claims = self.verify(token)?;

        let principal = PrincipalDescriptor {
            authorities: split_authorities(claims.authorities.as_deref()),
            subject: claims.sub.unwrap_or_default(),
        };

        Ok(Authentication {
            expires_at: claims.exp.saturating_mul(1000),
            principal,
            token: token.to_string(),
        })
    }

    /// Signature and expiry check only. Never fails; the cause of a `false`
    /// is logged with its classification.
    pub fn is_valid(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(kind = err.kind(), "token failed validation");
                false
            }
        }
    }

    pub fn state(&self, token: &str) -> TokenState {
        match self.verify(token) {
            Ok(_) => TokenState::Valid,
            Err(TokenError::Expired) => TokenState::Expired,
            Err(err) => TokenState::Invalid(err),
        }
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        check_header(token)?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                let kind = TokenError::from_jwt(&e);
                tracing::warn!(kind = kind.kind(), detail = %e, "rejected token");
                kind
            })?;

        validate_claims(&data.claims, self.clock.now(), self.leeway).map_err(|kind| {
            tracing::warn!(kind = kind.kind(), exp = data.claims.exp, "rejected token claims");
            kind
        })?;

        Ok(data.claims)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("validity", &self.validity)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, KeyError> {
    let key = STANDARD
        .decode(secret.trim())
        .map_err(|_| KeyError::InvalidEncoding)?;
    if key.len() < MIN_KEY_BYTES {
        return Err(KeyError::TooShort {
            actual: key.len(),
            min: MIN_KEY_BYTES,
        });
    }
    Ok(key)
}

/// Structural and algorithm checks ahead of signature verification, so a
/// foreign algorithm is reported as such rather than as a decode failure.
fn check_header(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, _, _] = segments.as_slice() else {
        tracing::warn!(kind = "malformed", segments = segments.len(), "rejected token");
        return Err(TokenError::Malformed);
    };

    let raw: RawHeader = URL_SAFE_NO_PAD
        .decode(header)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| {
            tracing::warn!(kind = "malformed", "token header is not base64url JSON");
            TokenError::Malformed
        })?;

    let expected = format!("{ALGORITHM:?}");
    if raw.alg.as_deref() != Some(expected.as_str()) {
        tracing::warn!(kind = "unsupported_format", alg = ?raw.alg, "rejected token algorithm");
        return Err(TokenError::UnsupportedFormat);
    }
    if let Some(typ) = raw.typ.as_deref() {
        if !typ.eq_ignore_ascii_case("JWT") {
            tracing::warn!(kind = "unsupported_format", typ, "rejected token type");
            return Err(TokenError::UnsupportedFormat);
        }
    }
    Ok(())
}

/// Decoded header and claims of a token, shown without any verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnverifiedToken {
    pub header: serde_json::Value,
    pub claims: serde_json::Value,
}

/// Decode a token for debugging. Nothing returned here is trustworthy.
pub fn inspect_unverified(token: &str) -> Result<UnverifiedToken, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, claims, _] = segments.as_slice() else {
        return Err(TokenError::Malformed);
    };

    let decode_part = |part: &str| -> Result<serde_json::Value, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(part)
            .map_err(|_| TokenError::Malformed)?;
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
    };

    Ok(UnverifiedToken {
        header: decode_part(*header)?,
        claims: decode_part(*claims)?,
    })
}
