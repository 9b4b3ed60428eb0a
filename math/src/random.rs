//! Uniform sampling of big integers.
//!
//! The random source is always passed in by the caller so tests can swap a
//! seeded generator for the operating system's.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;

use crate::MathError;

/// Uniform integer in `[0, bound)` by rejection sampling.
pub fn random_below<R: RngCore + ?Sized>(bound: &BigUint, rng: &mut R) -> Result<BigUint, MathError> {
    if bound.is_zero() {
        return Err(MathError::EmptyRange);
    }
    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut buf = vec![0u8; len];
    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= 0xffu8 >> excess;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Uniform integer in the inclusive range `[low, high]`.
pub fn random_range<R: RngCore + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> Result<BigUint, MathError> {
    if low > high {
        return Err(MathError::EmptyRange);
    }
    let span = high - low + 1u32;
    Ok(low + random_below(&span, rng)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let bound = BigUint::from(1000u32);
        for _ in 0..500 {
            assert!(random_below(&bound, &mut rng).unwrap() < bound);
        }
    }

    #[test]
    fn below_one_is_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(random_below(&BigUint::from(1u32), &mut rng).unwrap().is_zero());
    }

    #[test]
    fn range_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(3);
        let (lo, hi) = (BigUint::from(5u32), BigUint::from(7u32));
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = random_range(&lo, &hi, &mut rng).unwrap();
            assert!(v >= lo && v <= hi);
            seen[(v - &lo).to_u32_digits().first().copied().unwrap_or(0) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(random_below(&BigUint::zero(), &mut rng), Err(MathError::EmptyRange));
        assert_eq!(
            random_range(&BigUint::from(3u32), &BigUint::from(2u32), &mut rng),
            Err(MathError::EmptyRange)
        );
    }
}
