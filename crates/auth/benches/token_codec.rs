use criterion::{Criterion, black_box, criterion_group, criterion_main};

use chrono::Utc;
use clubhouse_auth::{DEFAULT_TOKEN_TTL, Handle, Hs256TokenCodec, Principal, SecretHash, TokenCodec, TokenConfig};
use clubhouse_core::UserId;

fn codec() -> Hs256TokenCodec {
    let config = TokenConfig::new("bench-secret", "clubhouse", "clubhouse-api", DEFAULT_TOKEN_TTL)
        .expect("valid config");
    Hs256TokenCodec::new(&config)
}

fn principal() -> Principal {
    Principal {
        id: UserId::new(1),
        handle: Handle::parse("alice01").expect("valid handle"),
        secret_hash: SecretHash::new("unused"),
    }
}

fn bench_issue(c: &mut Criterion) {
    let codec = codec();
    let principal = principal();
    c.bench_function("token_issue", |b| {
        b.iter(|| codec.issue(black_box(&principal), Utc::now()).expect("issue"))
    });
}

fn bench_decode(c: &mut Criterion) {
    let codec = codec();
    let now = Utc::now();
    let token = codec.issue(&principal(), now).expect("issue").token;
    c.bench_function("token_decode", |b| {
        b.iter(|| codec.decode(black_box(&token), now).expect("decode"))
    });
}

criterion_group!(benches, bench_issue, bench_decode);
criterion_main!(benches);
