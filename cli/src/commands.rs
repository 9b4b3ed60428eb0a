//! Command implementations. Each returns the text printed on stdout.

use std::fmt::Write as _;

use anyhow::{bail, Context};
use hdk_crypto::HashAlgorithm;
use hdk_hd::{encode_wif, Node};
use hdk_math::random_prime;
use hdk_types::{DerivationPath, Network};
use num_bigint::BigUint;
use rand::RngCore;

use crate::toolkit::Toolkit;

/// Where the seed for `derive` comes from.
pub enum SeedSource<'a> {
    Hex(&'a str),
    Mnemonic {
        phrase: &'a str,
        passphrase: &'a str,
    },
}

pub fn hash(
    tk: &Toolkit,
    algorithms: &[HashAlgorithm],
    message: &[u8],
) -> anyhow::Result<String> {
    if let [single] = algorithms {
        return Ok(hex::encode(tk.hashes.digest(*single, message)));
    }
    let mut out = String::new();
    for &alg in algorithms {
        writeln!(out, "{:<11}{}", alg.as_str(), hex::encode(tk.hashes.digest(alg, message)))?;
    }
    Ok(out.trim_end().to_string())
}

fn seed_bytes(tk: &Toolkit, source: &SeedSource<'_>, iterations: u32) -> anyhow::Result<Vec<u8>> {
    match source {
        SeedSource::Hex(s) => hex::decode(s.trim()).context("seed is not valid hex"),
        SeedSource::Mnemonic { phrase, passphrase } => {
            tk.codec
                .parse_phrase(&tk.wordlist, phrase)
                .context("invalid mnemonic")?;
            let seed = tk.codec.to_seed(phrase, passphrase, iterations)?;
            Ok(seed.as_bytes().to_vec())
        }
    }
}

fn describe(tk: &Toolkit, node: &Node, public_only: bool) -> anyhow::Result<String> {
    let mut out = String::new();
    if let Some(path) = node.path() {
        writeln!(out, "path         {path}")?;
    }
    writeln!(out, "depth        {}", node.depth())?;
    writeln!(out, "child        {}", node.child_index())?;
    writeln!(out, "fingerprint  {}", node.fingerprint())?;
    writeln!(out, "parent       {}", node.parent_fingerprint())?;
    writeln!(out, "network      {}", node.network().as_str())?;
    writeln!(
        out,
        "public key   {}",
        hex::encode(tk.tree.curve().encode_compressed(node.public_key())?)
    )?;
    writeln!(out, "key hash     {}", tk.tree.key_hash(node)?)?;
    writeln!(out, "xpub         {}", tk.tree.serialize(node, true)?)?;
    if let (Some(secret), false) = (node.private_key(), public_only) {
        writeln!(out, "xprv         {}", tk.tree.serialize(node, false)?)?;
        writeln!(
            out,
            "wif          {}",
            encode_wif(&tk.hashes, secret, node.network(), true)
        )?;
    }
    Ok(out.trim_end().to_string())
}

pub fn derive(
    tk: &Toolkit,
    source: &SeedSource<'_>,
    path: &DerivationPath,
    network: Network,
    iterations: u32,
    public_only: bool,
) -> anyhow::Result<String> {
    let seed = seed_bytes(tk, source, iterations)?;
    let node = tk.tree.seed_path_to_node(&seed, path, network)?;
    describe(tk, &node, public_only)
}

/// Decode an extended key and print its fields and derived identifiers.
pub fn inspect<R: RngCore + ?Sized>(tk: &Toolkit, key: &str, rng: &mut R) -> anyhow::Result<String> {
    let fields = tk.tree.parse_extended_key(key)?;
    let node = tk
        .tree
        .import_extended_key(key, rng)
        .context("key data does not describe a usable key")?;
    let mut out = String::new();
    writeln!(
        out,
        "kind         {} ({:#010x})",
        if fields.is_private { "private" } else { "public" },
        fields.version()
    )?;
    writeln!(out, "chain code   {}", fields.chain_code)?;
    out.push_str(&describe(tk, &node, false)?);
    Ok(out)
}

pub fn mnemonic_generate<R: RngCore + ?Sized>(
    tk: &Toolkit,
    words: usize,
    rng: &mut R,
) -> anyhow::Result<String> {
    let indices = tk.codec.generate(words, rng)?;
    Ok(tk.wordlist.indices_to_phrase(&indices)?)
}

pub fn mnemonic_check(tk: &Toolkit, phrase: &str) -> anyhow::Result<String> {
    let indices = tk.wordlist.phrase_to_indices(phrase)?;
    let entropy = tk.codec.indices_to_entropy(&indices)?;
    Ok(format!(
        "valid {}-word mnemonic, entropy {}",
        indices.len(),
        hex::encode(entropy)
    ))
}

pub fn mnemonic_seed(
    tk: &Toolkit,
    phrase: &str,
    passphrase: &str,
    iterations: u32,
) -> anyhow::Result<String> {
    if tk.codec.parse_phrase(&tk.wordlist, phrase).is_err() {
        tracing::warn!("phrase is not a valid mnemonic, stretching it anyway");
    }
    let seed = tk.codec.to_seed(phrase, passphrase, iterations)?;
    Ok(seed.to_hex())
}

pub fn prime_check<R: RngCore + ?Sized>(
    tk: &Toolkit,
    n: &str,
    rounds: usize,
    rng: &mut R,
) -> anyhow::Result<String> {
    let n: BigUint = n
        .trim()
        .parse()
        .with_context(|| format!("'{n}' is not a non-negative decimal integer"))?;
    Ok(if tk.primes.is_probable_prime(&n, rounds, rng) {
        format!("{n} is probably prime")
    } else {
        format!("{n} is composite")
    })
}

pub fn prime_generate<R: RngCore + ?Sized>(
    tk: &Toolkit,
    bits: u64,
    rounds: usize,
    rng: &mut R,
) -> anyhow::Result<String> {
    if bits > 4096 {
        bail!("refusing to search for a {bits}-bit prime");
    }
    Ok(random_prime(bits, rounds, &tk.primes, rng)?.to_string())
}
