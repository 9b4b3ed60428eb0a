//! PBKDF2 (RFC 8018) with HMAC as the pseudorandom function.

use hdk_types::Sha512Digest;
use thiserror::Error;

use crate::hash::{HashEngine, HashFunction, Sha512};
use crate::hmac::Hmac;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KdfError {
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("requested {requested} bytes, at most {max} can be derived")]
    OutputTooLong { requested: u64, max: u64 },
}

/// `T_i = U_1 ⊕ … ⊕ U_c` with `U_1 = PRF(P, S ‖ INT(i))`.
fn block<H: HashFunction>(
    prf: &Hmac<H>,
    salt: &[u8],
    iterations: u32,
    index: u32,
) -> H::Output {
    let mut first = Vec::with_capacity(salt.len() + 4);
    first.extend_from_slice(salt);
    first.extend_from_slice(&index.to_be_bytes());

    let mut u = prf.mac(&first);
    let mut t = u;
    for _ in 1..iterations {
        u = prf.mac(u.as_ref());
        for (acc, x) in t.as_mut().iter_mut().zip(u.as_ref()) {
            *acc ^= x;
        }
    }
    t
}

/// First output block only, i.e. a derived key exactly one digest long.
pub fn pbkdf2<H: HashFunction>(
    hash: H,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<H::Output, KdfError> {
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }
    tracing::trace!(iterations, salt_len = salt.len(), "pbkdf2 single block");
    let prf = Hmac::new(hash, password);
    Ok(block(&prf, salt, iterations, 1))
}

/// A derived key of `dk_len` bytes, concatenating as many blocks as needed.
pub fn pbkdf2_derive<H: HashFunction>(
    hash: H,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    dk_len: usize,
) -> Result<Vec<u8>, KdfError> {
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }
    let max = u64::from(u32::MAX) * H::OUTPUT_LEN as u64;
    if dk_len as u64 > max {
        return Err(KdfError::OutputTooLong {
            requested: dk_len as u64,
            max,
        });
    }

    tracing::trace!(iterations, dk_len, "pbkdf2 derive");
    let prf = Hmac::new(hash, password);
    let mut out = Vec::with_capacity(dk_len);
    let mut index = 1u32;
    while out.len() < dk_len {
        let t = block(&prf, salt, iterations, index);
        let take = (dk_len - out.len()).min(H::OUTPUT_LEN);
        out.extend_from_slice(&t.as_ref()[..take]);
        index = index.wrapping_add(1);
    }
    Ok(out)
}

/// PBKDF2-HMAC-SHA512 producing 64 bytes, as used for BIP-39 seeds.
pub fn pbkdf2_hmac_sha512(
    engine: &HashEngine,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Sha512Digest, KdfError> {
    pbkdf2(Sha512::new(engine), password, salt, iterations)
}
