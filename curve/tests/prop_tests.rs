use num_bigint::BigUint;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use hdk_curve::{Curve, Point};

fn scalar() -> impl Strategy<Value = BigUint> {
    prop::collection::vec(any::<u8>(), 1..32).prop_map(|b| BigUint::from_bytes_be(&b))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// P + (-P) = ∞ and P + ∞ = P.
    #[test]
    fn inverse_and_identity(k in scalar()) {
        let c = Curve::secp256k1();
        let p = c.generator_mul(&k).unwrap();
        prop_assert_eq!(c.add(&p, &c.negate(&p)).unwrap(), Point::Infinity);
        prop_assert_eq!(c.add(&p, &Point::Infinity).unwrap(), p.clone());
        prop_assert!(c.is_on_curve(&p));
    }

    /// (a + b)·G = a·G + b·G
    #[test]
    fn scalar_mul_distributes(a in scalar(), b in scalar()) {
        let c = Curve::secp256k1();
        let lhs = c.generator_mul(&(&a + &b)).unwrap();
        let rhs = c.add(&c.generator_mul(&a).unwrap(), &c.generator_mul(&b).unwrap()).unwrap();
        prop_assert_eq!(lhs, rhs);
    }

    /// Compressed encoding decodes back to the same point.
    #[test]
    fn compression_roundtrip(k in scalar(), seed in any::<u64>()) {
        let c = Curve::secp256k1();
        let p = c.generator_mul(&k).unwrap();
        prop_assume!(!p.is_infinity());
        let mut rng = StdRng::seed_from_u64(seed);
        let enc = c.encode_compressed(&p).unwrap();
        prop_assert_eq!(enc.len(), 33);
        prop_assert_eq!(c.decode_point(&enc, &mut rng).unwrap(), p);
    }
}
