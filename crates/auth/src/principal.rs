use serde::{Deserialize, Serialize};

use crate::Authority;

/// An authenticated principal as this crate sees it: a subject plus the
/// ordered authorities granted to it.
///
/// Produced by an external authentication step (e.g. password check against
/// a user store) and handed to the codec for issuance, or recovered from a
/// verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalDescriptor {
    pub subject: String,
    #[serde(default)]
    pub authorities: Vec<Authority>,
}

impl PrincipalDescriptor {
    pub fn new<I, A>(subject: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Authority>,
    {
        Self {
            subject: subject.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    /// Refresh tokens carry no identity and authenticate to an anonymous
    /// descriptor.
    pub fn is_anonymous(&self) -> bool {
        self.subject.is_empty()
    }

    pub fn has_authority(&self, name: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == name)
    }
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authentication {
    pub principal: PrincipalDescriptor,

    /// Expiration carried by the token, epoch milliseconds.
    pub expires_at: i64,

    /// The credential exactly as presented.
    #[serde(skip)]
    pub token: String,
}

impl Authentication {
    pub fn subject(&self) -> &str {
        &self.principal.subject
    }

    pub fn authorities(&self) -> &[Authority] {
        &self.principal.authorities
    }

    pub fn kind(&self) -> TokenKind {
        if self.principal.is_anonymous() {
            TokenKind::Refresh
        } else {
            TokenKind::Access
        }
    }
}

/// Which half of a pair a verified token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_keeps_authority_order() {
        let principal = PrincipalDescriptor::new("alice", ["ROLE_USER", "ROLE_ADMIN"]);

        assert_eq!(principal.subject, "alice");
        assert_eq!(
            principal.authorities,
            vec![Authority::from("ROLE_USER"), Authority::from("ROLE_ADMIN")]
        );
        assert!(principal.has_authority("ROLE_ADMIN"));
        assert!(!principal.has_authority("ROLE_ROOT"));
    }

    #[test]
    fn empty_subject_is_anonymous() {
        let principal = PrincipalDescriptor::new("", Vec::<Authority>::new());
        assert!(principal.is_anonymous());
    }
}
