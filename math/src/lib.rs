//! Arbitrary-precision number theory used by the curve and key-tree crates.
//!
//! - Euclid / extended Euclid, modular inverse
//! - Tonelli–Shanks modular square roots
//! - Miller–Rabin primality with a small-prime table
//! - Uniform sampling of big integers from an injected random source

pub mod error;
pub mod modular;
pub mod primes;
pub mod random;

pub use error::MathError;
pub use modular::{extended_euclid, gcd, lcm, mod_inverse, sqrt_mod, Bezout, SqrtMod};
pub use primes::{is_prime_u64, random_prime, PrimeTable};
pub use random::{random_below, random_range};
