use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Separator used to flatten authorities into the `auth` claim.
pub const AUTHORITY_SEPARATOR: char = ',';

/// Authority granted to a principal (role or permission name).
///
/// Authorities are opaque strings at this layer (e.g. `"ROLE_ADMIN"`); richer
/// semantics such as scopes belong to the authorization layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(Cow<'static, str>);

impl Authority {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this authority survives the comma-joined claim encoding.
    pub fn is_encodable(&self) -> bool {
        !self.0.is_empty() && !self.0.contains(AUTHORITY_SEPARATOR)
    }
}

impl core::fmt::Display for Authority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Authority {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Authority {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Join authorities into the single-string claim form, order preserved.
pub fn join_authorities(authorities: &[Authority]) -> String {
    authorities
        .iter()
        .map(Authority::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the claim form back into authorities.
///
/// An absent or empty claim yields no authorities. Empty segments are
/// dropped, so the result never holds an empty authority.
pub fn split_authorities(claim: Option<&str>) -> Vec<Authority> {
    claim
        .unwrap_or_default()
        .split(AUTHORITY_SEPARATOR)
        .filter(|name| !name.is_empty())
        .map(|name| Authority::new(name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_preserves_order_and_duplicates() {
        let authorities = vec![
            Authority::from("ROLE_USER"),
            Authority::from("ROLE_ADMIN"),
            Authority::from("ROLE_USER"),
        ];

        assert_eq!(join_authorities(&authorities), "ROLE_USER,ROLE_ADMIN,ROLE_USER");
    }

    #[test]
    fn absent_and_empty_claims_mean_no_authorities() {
        assert!(split_authorities(None).is_empty());
        assert!(split_authorities(Some("")).is_empty());
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(
            split_authorities(Some("ROLE_A,,ROLE_B")),
            vec![Authority::from("ROLE_A"), Authority::from("ROLE_B")]
        );
        assert_eq!(split_authorities(Some("ROLE_A,")), vec![Authority::from("ROLE_A")]);
        assert!(split_authorities(Some(",")).is_empty());
    }

    #[test]
    fn split_reverses_join() {
        let authorities = vec![Authority::from("a"), Authority::from("b")];
        let joined = join_authorities(&authorities);
        assert_eq!(split_authorities(Some(&joined)), authorities);
    }

    #[test]
    fn commas_and_empty_names_are_not_encodable() {
        assert!(Authority::from("ROLE_USER").is_encodable());
        assert!(!Authority::from("").is_encodable());
        assert!(!Authority::from("a,b").is_encodable());
    }
}
