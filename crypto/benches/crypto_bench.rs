use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hdk_crypto::{base58, hmac_sha512, pbkdf2_hmac_sha512, HashEngine, MnemonicCodec};

fn sha256_bench(c: &mut Criterion) {
    let engine = HashEngine::standard();
    let data = [0xABu8; 256];

    c.bench_function("sha256_256B", |b| {
        b.iter(|| engine.sha256(black_box(&data)))
    });
}

fn sha512_1kb_bench(c: &mut Criterion) {
    let engine = HashEngine::standard();
    let data = vec![0xCDu8; 1024];

    c.bench_function("sha512_1KB", |b| {
        b.iter(|| engine.sha512(black_box(&data)))
    });
}

fn ripemd160_bench(c: &mut Criterion) {
    let engine = HashEngine::standard();
    let data = [0x02u8; 33];

    c.bench_function("hash160_33B", |b| {
        b.iter(|| engine.hash160(black_box(&data)))
    });
}

fn hmac_sha512_bench(c: &mut Criterion) {
    let engine = HashEngine::standard();
    let chain_code = [7u8; 32];
    let data = [3u8; 37];

    c.bench_function("hmac_sha512_37B", |b| {
        b.iter(|| hmac_sha512(&engine, black_box(&chain_code), black_box(&data)))
    });
}

fn pbkdf2_bench(c: &mut Criterion) {
    let engine = HashEngine::standard();

    c.bench_function("pbkdf2_hmac_sha512_2048", |b| {
        b.iter(|| pbkdf2_hmac_sha512(&engine, black_box(b"password"), b"mnemonic", 2048))
    });
}

fn base58check_bench(c: &mut Criterion) {
    let engine = HashEngine::standard();
    let payload = [0x5Au8; 82];

    c.bench_function("base58check_encode_82B", |b| {
        b.iter(|| base58::encode_check(&engine, black_box(&payload)))
    });
}

fn mnemonic_check_bench(c: &mut Criterion) {
    let codec = MnemonicCodec::new(HashEngine::standard());
    let indices = codec.entropy_to_indices(&[0x42u8; 32]).unwrap();

    c.bench_function("mnemonic_check_24_words", |b| {
        b.iter(|| codec.check_checksum(black_box(&indices)))
    });
}

criterion_group!(
    benches,
    sha256_bench,
    sha512_1kb_bench,
    ripemd160_bench,
    hmac_sha512_bench,
    pbkdf2_bench,
    base58check_bench,
    mnemonic_check_bench,
);
criterion_main!(benches);
