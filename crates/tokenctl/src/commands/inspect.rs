//! `maplog-tokenctl inspect` - decode a token without verification.

use maplog_auth::inspect_unverified;
use serde_json::json;

pub fn run(token: &str) -> anyhow::Result<()> {
    let inspected = inspect_unverified(token)?;

    tracing::warn!("signature and expiry were NOT checked");
    let out = json!({
        "verified": false,
        "header": inspected.header,
        "claims": inspected.claims,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
