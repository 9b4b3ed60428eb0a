//! Euclid, modular inverses and modular square roots.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::RngCore;

use crate::primes::PrimeTable;
use crate::random::random_range;
use crate::MathError;

/// Miller–Rabin rounds used to confirm the modulus of [`sqrt_mod`].
pub const SQRT_PRIMALITY_ROUNDS: usize = 20;

/// Greatest common divisor by repeated remainder.
pub fn gcd(x: &BigUint, y: &BigUint) -> BigUint {
    let (mut a, mut b) = (x.clone(), y.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple; zero if either input is zero.
pub fn lcm(x: &BigUint, y: &BigUint) -> BigUint {
    if x.is_zero() || y.is_zero() {
        return BigUint::zero();
    }
    (x * y) / gcd(x, y)
}

/// Bézout identity `gcd = s·x + t·y`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bezout {
    pub gcd: BigInt,
    pub s: BigInt,
    pub t: BigInt,
}

/// Extended Euclid over arbitrary integers.
///
/// The returned `gcd` is non-negative. When used for inversion the caller
/// reduces the relevant coefficient modulo `n`.
pub fn extended_euclid(x: &BigInt, y: &BigInt) -> Bezout {
    let (mut r0, mut r1) = (x.clone(), y.clone());
    let (mut s0, mut s1) = (BigInt::one(), BigInt::zero());
    let (mut t0, mut t1) = (BigInt::zero(), BigInt::one());

    while !r1.is_zero() {
        let q = &r0 / &r1;
        let r2 = &r0 - &q * &r1;
        let s2 = &s0 - &q * &s1;
        let t2 = &t0 - &q * &t1;
        r0 = std::mem::replace(&mut r1, r2);
        s0 = std::mem::replace(&mut s1, s2);
        t0 = std::mem::replace(&mut t1, t2);
    }

    if r0 < BigInt::zero() {
        r0 = -r0;
        s0 = -s0;
        t0 = -t0;
    }
    Bezout {
        gcd: r0,
        s: s0,
        t: t0,
    }
}

/// `y` such that `x·y ≡ 1 (mod n)`.
///
/// Fails with [`MathError::NoInverse`] when `gcd(x mod n, n) ≠ 1`.
pub fn mod_inverse(x: &BigUint, n: &BigUint) -> Result<BigUint, MathError> {
    if n.is_zero() {
        return Err(MathError::ZeroModulus);
    }
    let reduced = x % n;
    let modulus = BigInt::from(n.clone());
    let bezout = extended_euclid(&modulus, &BigInt::from(reduced));
    if !bezout.gcd.is_one() {
        return Err(MathError::NoInverse {
            value: x.to_string(),
            modulus: n.to_string(),
        });
    }
    let (_, inverse) = bezout.t.mod_floor(&modulus).into_parts();
    Ok(inverse)
}

/// Outcome of a modular square root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqrtMod {
    /// Two distinct roots `r` and `p - r`, smaller first.
    Roots(BigUint, BigUint),
    /// `n ≡ 0`, whose only root is zero.
    Zero,
    /// `n` is a quadratic non-residue.
    NonResidue,
}

impl SqrtMod {
    /// All roots as a list (empty for a non-residue).
    pub fn roots(&self) -> Vec<BigUint> {
        match self {
            Self::Roots(a, b) => vec![a.clone(), b.clone()],
            Self::Zero => vec![BigUint::zero()],
            Self::NonResidue => Vec::new(),
        }
    }

    pub fn contains(&self, y: &BigUint) -> bool {
        match self {
            Self::Roots(a, b) => y == a || y == b,
            Self::Zero => y.is_zero(),
            Self::NonResidue => false,
        }
    }
}

/// Tonelli–Shanks square root of `n` modulo an odd prime `p`.
///
/// The primality of `p` is confirmed with Miller–Rabin first. The search for
/// a non-residue draws from `rng`, but the roots returned are fully determined
/// by `n` and `p`.
pub fn sqrt_mod<R: RngCore + ?Sized>(
    n: &BigUint,
    p: &BigUint,
    primes: &PrimeTable,
    rng: &mut R,
) -> Result<SqrtMod, MathError> {
    let two = BigUint::from(2u32);
    if p <= &two || p.is_even() || !primes.is_probable_prime(p, SQRT_PRIMALITY_ROUNDS, rng) {
        return Err(MathError::NotOddPrime(p.to_string()));
    }

    let a = n % p;
    if a.is_zero() {
        return Ok(SqrtMod::Zero);
    }

    let one = BigUint::one();
    let p_minus_one = p - &one;
    let euler_exp = &p_minus_one >> 1u32;
    if a.modpow(&euler_exp, p) == p_minus_one {
        return Ok(SqrtMod::NonResidue);
    }

    // p - 1 = q · 2^s with q odd
    let s = p_minus_one.trailing_zeros().unwrap_or(0);
    let q = &p_minus_one >> s;

    let root = if s == 1 {
        let exp: BigUint = (p + &one) >> 2u32;
        a.modpow(&exp, p)
    } else {
        let z = loop {
            let candidate = random_range(&two, &p_minus_one, rng)?;
            if candidate.modpow(&euler_exp, p) == p_minus_one {
                break candidate;
            }
        };

        let mut m = s;
        let mut c = z.modpow(&q, p);
        let mut t = a.modpow(&q, p);
        let mut r = a.modpow(&((&q + &one) >> 1u32), p);

        while !t.is_one() {
            // least i in (0, m) with t^(2^i) = 1
            let mut i = 0u64;
            let mut t2i = t.clone();
            while !t2i.is_one() {
                t2i = (&t2i * &t2i) % p;
                i += 1;
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = (&b * &b) % p;
            }
            m = i;
            c = (&b * &b) % p;
            t = (&t * &c) % p;
            r = (&r * &b) % p;
        }
        r
    };

    let other = p - &root;
    if root <= other {
        Ok(SqrtMod::Roots(root, other))
    } else {
        Ok(SqrtMod::Roots(other, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn gcd_and_lcm() {
        assert_eq!(gcd(&big(48), &big(18)), big(6));
        assert_eq!(gcd(&big(17), &big(5)), big(1));
        assert_eq!(gcd(&big(0), &big(9)), big(9));
        assert_eq!(lcm(&big(4), &big(6)), big(12));
        assert_eq!(lcm(&big(0), &big(6)), big(0));
    }

    #[test]
    fn bezout_identity_holds() {
        let cases = [(240i64, 46i64), (46, 240), (-35, 15), (17, 0), (0, 0), (-8, -12)];
        for (x, y) in cases {
            let (bx, by) = (BigInt::from(x), BigInt::from(y));
            let b = extended_euclid(&bx, &by);
            assert_eq!(&b.s * &bx + &b.t * &by, b.gcd, "x={x} y={y}");
            assert!(b.gcd >= BigInt::zero());
        }
        assert_eq!(extended_euclid(&BigInt::from(240), &BigInt::from(46)).gcd, BigInt::from(2));
    }

    #[test]
    fn inverse_small_modulus() {
        assert_eq!(mod_inverse(&big(3), &big(11)).unwrap(), big(4));
        assert_eq!(mod_inverse(&big(10), &big(17)).unwrap(), big(12));
        // reduced before inversion
        assert_eq!(mod_inverse(&big(14), &big(11)).unwrap(), big(4));
    }

    #[test]
    fn inverse_fails_on_shared_factor() {
        assert!(matches!(
            mod_inverse(&big(6), &big(9)),
            Err(MathError::NoInverse { .. })
        ));
        assert!(matches!(
            mod_inverse(&big(0), &big(7)),
            Err(MathError::NoInverse { .. })
        ));
        assert_eq!(mod_inverse(&big(3), &big(0)), Err(MathError::ZeroModulus));
    }

    #[test]
    fn sqrt_of_zero() {
        let primes = PrimeTable::standard();
        assert_eq!(sqrt_mod(&big(0), &big(13), &primes, &mut rng()).unwrap(), SqrtMod::Zero);
        assert_eq!(sqrt_mod(&big(26), &big(13), &primes, &mut rng()).unwrap(), SqrtMod::Zero);
    }

    #[test]
    fn sqrt_of_non_residue() {
        let primes = PrimeTable::standard();
        assert_eq!(
            sqrt_mod(&big(2), &big(13), &primes, &mut rng()).unwrap(),
            SqrtMod::NonResidue
        );
        assert_eq!(
            sqrt_mod(&big(3), &big(17), &primes, &mut rng()).unwrap(),
            SqrtMod::NonResidue
        );
    }

    #[test]
    fn sqrt_p_three_mod_four() {
        let primes = PrimeTable::standard();
        let roots = sqrt_mod(&big(5), &big(11), &primes, &mut rng()).unwrap();
        assert_eq!(roots, SqrtMod::Roots(big(4), big(7)));
    }

    #[test]
    fn sqrt_p_one_mod_four() {
        let primes = PrimeTable::standard();
        let roots = sqrt_mod(&big(10), &big(13), &primes, &mut rng()).unwrap();
        assert_eq!(roots, SqrtMod::Roots(big(6), big(7)));
    }

    #[test]
    fn sqrt_p_one_mod_eight_exercises_loop() {
        // 17 - 1 = 2^4, the full Tonelli–Shanks loop runs
        let primes = PrimeTable::standard();
        for n in [2u64, 8, 13, 15, 16] {
            match sqrt_mod(&big(n), &big(17), &primes, &mut rng()).unwrap() {
                SqrtMod::Roots(a, b) => {
                    assert_eq!((&a * &a) % big(17), big(n));
                    assert_eq!((&b * &b) % big(17), big(n));
                    assert_eq!(&a + &b, big(17));
                }
                other => panic!("expected roots for {n}, got {other:?}"),
            }
        }
    }

    #[test]
    fn sqrt_result_is_independent_of_rng() {
        let primes = PrimeTable::standard();
        let p = big(1_000_000_009); // ≡ 1 mod 8
        let n = big(123_456_789u64 * 123_456_789u64 % 1_000_000_009);
        let a = sqrt_mod(&n, &p, &primes, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = sqrt_mod(&n, &p, &primes, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
        assert!(a.contains(&big(123_456_789)));
    }

    #[test]
    fn sqrt_rejects_composite_and_even_moduli() {
        let primes = PrimeTable::standard();
        assert!(matches!(
            sqrt_mod(&big(4), &big(15), &primes, &mut rng()),
            Err(MathError::NotOddPrime(_))
        ));
        assert!(matches!(
            sqrt_mod(&big(1), &big(2), &primes, &mut rng()),
            Err(MathError::NotOddPrime(_))
        ));
    }
}
