//! `maplog-tokenctl verify` - check a token and report the outcome.

use std::process::ExitCode;

use maplog_auth::{Authentication, TokenCodec, TokenError, TokenKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Valid {
        kind: TokenKind,
        #[serde(flatten)]
        authentication: Authentication,
    },
    Rejected {
        error: &'static str,
        refresh: bool,
    },
}

impl Report {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Valid { .. } => ExitCode::SUCCESS,
            Self::Rejected { refresh: true, .. } => ExitCode::from(2),
            Self::Rejected { .. } => ExitCode::FAILURE,
        }
    }
}

pub fn verify(codec: &TokenCodec, token: &str) -> Report {
    match codec.authenticate(token) {
        Ok(authentication) => Report::Valid {
            kind: authentication.kind(),
            authentication,
        },
        Err(err) => rejected(err),
    }
}

fn rejected(err: TokenError) -> Report {
    Report::Rejected {
        error: err.kind(),
        refresh: err.requires_refresh(),
    }
}

pub fn run(codec: &TokenCodec, token: &str) -> anyhow::Result<ExitCode> {
    let report = verify(codec, token);
    if let Report::Rejected { error, refresh } = &report {
        tracing::info!(error = *error, refresh = *refresh, "token rejected");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use maplog_auth::PrincipalDescriptor;

    fn codec() -> TokenCodec {
        TokenCodec::new(&STANDARD.encode([5u8; 64]), 60_000).unwrap()
    }

    #[test]
    fn valid_access_token_reports_principal() {
        let codec = codec();
        let pair = codec
            .issue(&PrincipalDescriptor::new("alice", ["ROLE_USER"]))
            .unwrap();

        let report = verify(&codec, &pair.access_token);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "valid");
        assert_eq!(json["kind"], "access");
        assert_eq!(json["principal"]["subject"], "alice");
        assert_eq!(json["principal"]["authorities"][0], "ROLE_USER");
        assert_eq!(report.exit_code(), ExitCode::SUCCESS);
    }

    #[test]
    fn malformed_token_reports_classification() {
        let report = verify(&codec(), "not-a-jwt");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "rejected");
        assert_eq!(json["error"], "malformed");
        assert_eq!(json["refresh"], false);
        assert_eq!(report.exit_code(), ExitCode::FAILURE);
    }

    #[test]
    fn run_exits_with_the_rejection_code() {
        let code = run(&codec(), "not-a-jwt").unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn expired_rejection_asks_for_refresh() {
        let report = rejected(TokenError::Expired);
        assert_eq!(report.exit_code(), ExitCode::from(2));
    }
}
