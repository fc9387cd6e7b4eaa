//! `maplog-auth`: stateless bearer token issuance and verification.
//!
//! This crate is intentionally decoupled from HTTP and storage: callers hand
//! it an already-authenticated principal and get a signed token pair back, or
//! hand it a raw token (prefix already stripped) and get the principal or a
//! classified failure.

pub mod authority;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod principal;
pub mod settings;

pub use authority::Authority;
pub use claims::{TokenClaims, validate_claims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{
    ALGORITHM, GRANT_TYPE, MIN_KEY_BYTES, TokenCodec, TokenPair, TokenState, UnverifiedToken,
    inspect_unverified,
};
pub use error::{IssueError, KeyError, TokenError};
pub use principal::{Authentication, PrincipalDescriptor, TokenKind};
pub use settings::{MAX_LEEWAY_SECS, SettingsError, TokenSettings};
