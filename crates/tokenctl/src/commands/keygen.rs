//! `maplog-tokenctl keygen` - generate a signing secret.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use maplog_auth::MIN_KEY_BYTES;
use rand::RngCore;

/// Produce `bytes` random bytes, base64 encoded.
pub fn generate(bytes: usize) -> anyhow::Result<String> {
    anyhow::ensure!(
        bytes >= MIN_KEY_BYTES,
        "secret must be at least {MIN_KEY_BYTES} bytes, got {bytes}"
    );

    let mut key = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut key);
    Ok(STANDARD.encode(key))
}

pub fn run(bytes: usize) -> anyhow::Result<()> {
    let secret = generate(bytes)?;

    tracing::info!(bytes, "generated signing secret; keep it out of version control");
    println!("{secret}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplog_auth::TokenCodec;

    #[test]
    fn generated_secret_builds_a_codec() {
        let secret = generate(64).unwrap();
        assert_eq!(STANDARD.decode(&secret).unwrap().len(), 64);
        assert!(TokenCodec::new(&secret, 1000).is_ok());
    }

    #[test]
    fn secrets_differ_between_runs() {
        assert_ne!(generate(64).unwrap(), generate(64).unwrap());
    }

    #[test]
    fn refuses_short_secrets() {
        assert!(generate(32).is_err());
    }
}
