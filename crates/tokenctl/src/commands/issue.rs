//! `maplog-tokenctl issue` - mint a token pair.

use maplog_auth::{PrincipalDescriptor, TokenCodec, TokenPair};

pub fn issue(
    codec: &TokenCodec,
    subject: String,
    authorities: Vec<String>,
) -> anyhow::Result<TokenPair> {
    let principal = PrincipalDescriptor::new(subject, authorities);
    Ok(codec.issue(&principal)?)
}

pub fn run(codec: &TokenCodec, subject: String, authorities: Vec<String>) -> anyhow::Result<()> {
    let pair = issue(codec, subject, authorities)?;
    println!("{}", serde_json::to_string_pretty(&pair)?);
    Ok(())
}
