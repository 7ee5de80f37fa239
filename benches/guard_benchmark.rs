use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use criterion::{criterion_group, criterion_main, Criterion};
use noteplan_portal::middleware::edge_guard::evaluate;
use noteplan_portal::services::decode_claims;
use std::hint::black_box;

const NOW: i64 = 1_750_000_000;

fn token(payload: serde_json::Value) -> String {
    format!(
        "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

fn benchmark_guard(c: &mut Criterion) {
    // Realistic backend token: profile claims plus expiry
    let admin = token(serde_json::json!({
        "id": "6650c1e2f1a4",
        "name": "Ana Souza",
        "email": "ana@example.com",
        "role": "ADMIN",
        "iat": NOW - 600,
        "exp": NOW + 3600
    }));
    let member = token(serde_json::json!({"role": "MEMBER", "exp": NOW + 3600}));

    let mut group = c.benchmark_group("edge_guard");

    group.bench_function("decode_claims", |b| {
        b.iter(|| decode_claims(black_box(&admin)))
    });

    group.bench_function("admin_allowed", |b| {
        b.iter(|| evaluate(black_box("/admin/videos"), Some(black_box(admin.as_str())), NOW))
    });

    group.bench_function("member_bounced_from_admin", |b| {
        b.iter(|| evaluate(black_box("/admin"), Some(black_box(member.as_str())), NOW))
    });

    group.bench_function("public_path", |b| {
        b.iter(|| evaluate(black_box("/planner-tutorial"), None, NOW))
    });

    group.finish();
}

criterion_group!(benches, benchmark_guard);
criterion_main!(benches);
