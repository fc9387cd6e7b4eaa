use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use maplog_auth::settings::{LEEWAY_VAR, SECRET_VAR, VALIDITY_VAR};
use maplog_auth::{TokenCodec, TokenSettings};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "maplog-tokenctl", version, about = "Mint and check maplog bearer tokens")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random base64 signing secret.
    Keygen {
        /// Secret length in bytes (at least 64 for HS512).
        #[arg(long, default_value_t = 64)]
        bytes: usize,
    },

    /// Issue an access/refresh pair for a principal and print it as JSON.
    Issue {
        #[command(flatten)]
        key: KeyArgs,

        #[arg(long)]
        subject: String,

        /// Granted authority; repeat for several, order is kept.
        #[arg(long = "authority")]
        authorities: Vec<String>,
    },

    /// Verify a token. Exit code 0 when valid, 2 when expired, 1 otherwise.
    Verify {
        #[command(flatten)]
        key: KeyArgs,

        token: String,
    },

    /// Decode a token's header and claims WITHOUT verifying it.
    Inspect { token: String },
}

/// Codec settings, from flags or the matching environment variables.
#[derive(Args, Debug)]
struct KeyArgs {
    /// Base64 signing secret
    #[arg(long, env = SECRET_VAR, hide_env_values = true)]
    secret: Option<String>,

    /// Validity window in milliseconds
    #[arg(long = "validity-ms", env = VALIDITY_VAR)]
    validity_ms: Option<u64>,

    /// Tolerated clock skew in seconds
    #[arg(long = "leeway-secs", env = LEEWAY_VAR)]
    leeway_secs: Option<u64>,
}

impl KeyArgs {
    fn settings(&self) -> anyhow::Result<TokenSettings> {
        let settings = TokenSettings::from_lookup(|var| match var {
            SECRET_VAR => self.secret.clone(),
            VALIDITY_VAR => self.validity_ms.map(|v| v.to_string()),
            LEEWAY_VAR => self.leeway_secs.map(|v| v.to_string()),
            _ => None,
        })?;
        Ok(settings)
    }

    fn codec(&self) -> anyhow::Result<TokenCodec> {
        Ok(TokenCodec::from_settings(&self.settings()?)?)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    maplog_observability::init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Keygen { bytes } => commands::keygen::run(bytes)?,
        Command::Issue {
            key,
            subject,
            authorities,
        } => commands::issue::run(&key.codec()?, subject, authorities)?,
        Command::Verify { key, token } => return commands::verify::run(&key.codec()?, &token),
        Command::Inspect { token } => commands::inspect::run(&token)?,
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_authorities_in_order() {
        let cli = Cli::try_parse_from([
            "maplog-tokenctl",
            "issue",
            "--subject",
            "alice",
            "--authority",
            "ROLE_USER",
            "--authority",
            "ROLE_ADMIN",
            "--validity-ms",
            "60000",
        ])
        .unwrap();

        match cli.cmd {
            Command::Issue {
                key,
                subject,
                authorities,
            } => {
                assert_eq!(subject, "alice");
                assert_eq!(authorities, vec!["ROLE_USER", "ROLE_ADMIN"]);
                assert_eq!(key.validity_ms, Some(60_000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_feed_settings() {
        let key = KeyArgs {
            secret: Some("c2VjcmV0".to_string()),
            validity_ms: Some(1234),
            leeway_secs: Some(5),
        };

        let settings = key.settings().unwrap();
        assert_eq!(settings.secret, "c2VjcmV0");
        assert_eq!(settings.validity_ms, 1234);
        assert_eq!(settings.leeway_secs, 5);
    }

    #[test]
    fn key_flags_fall_back_to_environment() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let issue = cmd.find_subcommand("issue").unwrap();
        let env_of = |id: &str| {
            issue
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("secret").as_deref(), Some(SECRET_VAR));
        assert_eq!(env_of("validity_ms").as_deref(), Some(VALIDITY_VAR));
        assert_eq!(env_of("leeway_secs").as_deref(), Some(LEEWAY_VAR));
    }

    #[test]
    fn out_of_range_leeway_flag_is_rejected() {
        let key = KeyArgs {
            secret: Some("c2VjcmV0".to_string()),
            validity_ms: Some(1000),
            leeway_secs: Some(u64::MAX),
        };

        assert!(key.settings().is_err());
    }

    #[test]
    fn verify_requires_a_token() {
        assert!(Cli::try_parse_from(["maplog-tokenctl", "verify"]).is_err());
    }
}
