use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;

use hdk_curve::Curve;

fn generator_mul_bench(c: &mut Criterion) {
    let curve = Curve::secp256k1();
    let k = BigUint::parse_bytes(
        b"e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35",
        16,
    )
    .unwrap();

    c.bench_function("secp256k1_generator_mul_256bit", |b| {
        b.iter(|| curve.generator_mul(black_box(&k)))
    });
}

fn point_add_bench(c: &mut Criterion) {
    let curve = Curve::secp256k1();
    let g = curve.generator();
    let two_g = curve.double(&g).unwrap();

    c.bench_function("secp256k1_point_add", |b| {
        b.iter(|| curve.add(black_box(&g), black_box(&two_g)))
    });
}

fn decompress_bench(c: &mut Criterion) {
    let curve = Curve::secp256k1();
    let encoded = curve.encode_compressed(&curve.generator()).unwrap();
    let mut rng = rand::thread_rng();

    c.bench_function("secp256k1_decompress", |b| {
        b.iter(|| curve.decode_point(black_box(&encoded), &mut rng))
    });
}

criterion_group!(benches, generator_mul_bench, point_add_bench, decompress_bench);
criterion_main!(benches);
