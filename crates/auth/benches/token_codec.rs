use criterion::{Criterion, black_box, criterion_group, criterion_main};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use maplog_auth::{PrincipalDescriptor, TokenCodec};

fn codec() -> TokenCodec {
    TokenCodec::new(&STANDARD.encode([42u8; 64]), 3_600_000).unwrap()
}

fn bench_issue(c: &mut Criterion) {
    let codec = codec();
    let principal = PrincipalDescriptor::new("alice", ["ROLE_USER", "ROLE_ADMIN"]);

    c.bench_function("issue_pair", |b| {
        b.iter(|| codec.issue(black_box(&principal)).unwrap());
    });
}

fn bench_verify(c: &mut Criterion) {
    let codec = codec();
    let pair = codec
        .issue(&PrincipalDescriptor::new("alice", ["ROLE_USER", "ROLE_ADMIN"]))
        .unwrap();

    let mut group = c.benchmark_group("verify");
    group.bench_function("authenticate_access", |b| {
        b.iter(|| codec.authenticate(black_box(&pair.access_token)).unwrap());
    });
    group.bench_function("is_valid_rejects_malformed", |b| {
        b.iter(|| codec.is_valid(black_box("not-a-jwt")));
    });
    group.finish();
}

criterion_group!(benches, bench_issue, bench_verify);
criterion_main!(benches);
