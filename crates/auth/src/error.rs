//! Error model for the token codec.

use thiserror::Error;

/// Construction-time failure. A codec is never built from a bad key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing secret is not valid base64")]
    InvalidEncoding,

    #[error("signing key too short: {actual} bytes, HS512 needs at least {min}")]
    TooShort { actual: usize, min: usize },

    #[error("token validity window must be a positive number of milliseconds, got {0}")]
    InvalidValidity(u64),

    #[error("clock leeway of {0} seconds is out of range")]
    InvalidLeeway(u64),
}

/// Failure to mint a token pair.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("principal subject must not be empty")]
    EmptySubject,

    /// Authorities are comma-joined on the wire, so commas and empty names
    /// cannot round-trip.
    #[error("authority '{0}' is empty or contains a comma")]
    InvalidAuthority(String),

    /// The signing primitive itself failed. This is a configuration fault,
    /// not something a caller can retry.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Classified verification failure.
///
/// Variants carry no detail from the underlying decoder; that goes to the
/// log at the point of detection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenError {
    /// Signature did not verify against the process key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Not decodable as a compact JWS.
    #[error("malformed token")]
    Malformed,

    /// Correctly signed, but past its expiration.
    #[error("token has expired")]
    Expired,

    /// Wrong scheme or a signing algorithm other than HS512.
    #[error("unsupported token format")]
    UnsupportedFormat,

    /// Claims are present but violate the expected structure.
    #[error("invalid token claims")]
    InvalidClaims,
}

impl TokenError {
    /// Whether the client should obtain a fresh access token rather than
    /// having the request rejected outright.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::Malformed => "malformed",
            Self::Expired => "expired",
            Self::UnsupportedFormat => "unsupported_format",
            Self::InvalidClaims => "invalid_claims",
        }
    }

    /// Map a decoder error onto the taxonomy.
    pub(crate) fn from_jwt(err: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::Crypto(_) => Self::InvalidSignature,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => Self::Malformed,
            ErrorKind::Json(json) => match json.classify() {
                serde_json::error::Category::Data => Self::InvalidClaims,
                _ => Self::Malformed,
            },
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::RsaFailedSigning => Self::UnsupportedFormat,
            ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature => Self::InvalidClaims,
            _ => Self::Malformed,
        }
    }
}
