//! Prime tables and Miller–Rabin primality.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::random::random_range;
use crate::MathError;

/// Size of [`PrimeTable::standard`].
pub const STANDARD_PRIME_COUNT: usize = 500;

/// Deterministic trial division, for table construction and validation.
pub fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// The first primes in ascending order.
///
/// Used to seed the hash round-constant tables and as trial divisors before
/// Miller–Rabin. Serialized as a plain JSON array of integers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct PrimeTable(Vec<u64>);

impl PrimeTable {
    /// The first `count` primes.
    pub fn first(count: usize) -> Self {
        let mut primes = Vec::with_capacity(count);
        let mut candidate = 2u64;
        while primes.len() < count {
            if is_prime_u64(candidate) {
                primes.push(candidate);
            }
            candidate += 1;
        }
        Self(primes)
    }

    /// The first [`STANDARD_PRIME_COUNT`] primes.
    pub fn standard() -> Self {
        Self::first(STANDARD_PRIME_COUNT)
    }

    /// Parse a JSON array of primes, e.g. `[2, 3, 5, 7]`.
    pub fn from_json(s: &str) -> Result<Self, MathError> {
        serde_json::from_str(s).map_err(|e| MathError::InvalidPrimeTable(e.to_string()))
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<u64> {
        self.0.get(i).copied()
    }

    /// Miller–Rabin with `rounds` random bases in `[2, n-2]`.
    ///
    /// `false` is certain; `true` is wrong with probability at most `4^-rounds`.
    /// Members of the table are accepted immediately and multiples of them
    /// rejected before any modular exponentiation.
    pub fn is_probable_prime<R: RngCore + ?Sized>(
        &self,
        n: &BigUint,
        rounds: usize,
        rng: &mut R,
    ) -> bool {
        if let Some(small) = n.to_u64() {
            if small < 2 {
                return false;
            }
            if self.0.binary_search(&small).is_ok() {
                return true;
            }
            if small < 5 {
                return small == 2 || small == 3;
            }
        }
        for &prime in &self.0 {
            if (n % prime).is_zero() {
                return false;
            }
        }
        if n.is_even() {
            return false;
        }

        let one = BigUint::one();
        let n_minus_one = n - &one;
        // n - 1 = d · 2^s with d odd
        let s = n_minus_one.trailing_zeros().unwrap_or(0);
        let d = &n_minus_one >> s;
        let low = BigUint::from(2u32);
        let high = n - 2u32;

        'witness: for round in 0..rounds {
            let a = match random_range(&low, &high, rng) {
                Ok(a) => a,
                Err(_) => return false,
            };
            let mut x = a.modpow(&d, n);
            if x.is_one() || x == n_minus_one {
                continue;
            }
            for _ in 0..s {
                x = (&x * &x) % n;
                if x.is_one() {
                    tracing::trace!(round, "miller-rabin: nontrivial root of unity");
                    return false;
                }
                if x == n_minus_one {
                    continue 'witness;
                }
            }
            tracing::trace!(round, "miller-rabin: witness found");
            return false;
        }
        true
    }
}

impl TryFrom<Vec<u64>> for PrimeTable {
    type Error = MathError;

    fn try_from(primes: Vec<u64>) -> Result<Self, Self::Error> {
        if primes.is_empty() {
            return Err(MathError::InvalidPrimeTable("table is empty".into()));
        }
        if !primes.windows(2).all(|w| w[0] < w[1]) {
            return Err(MathError::InvalidPrimeTable("table is not strictly ascending".into()));
        }
        if let Some(bad) = primes.iter().find(|&&p| !is_prime_u64(p)) {
            return Err(MathError::InvalidPrimeTable(format!("{bad} is not prime")));
        }
        Ok(Self(primes))
    }
}

impl From<PrimeTable> for Vec<u64> {
    fn from(table: PrimeTable) -> Self {
        table.0
    }
}

/// A random probable prime of exactly `bits` bits (top and bottom bit set).
pub fn random_prime<R: RngCore + ?Sized>(
    bits: u64,
    rounds: usize,
    table: &PrimeTable,
    rng: &mut R,
) -> Result<BigUint, MathError> {
    if bits < 2 {
        return Err(MathError::InvalidBitLength(bits));
    }
    let low = BigUint::one() << (bits - 1);
    let high = (BigUint::one() << bits) - 1u32;
    loop {
        let candidate = random_range(&low, &high, rng)? | BigUint::one();
        if table.is_probable_prime(&candidate, rounds, rng) {
            return Ok(candidate);
        }
    }
}
