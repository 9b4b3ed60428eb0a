//! Domain parameters `y² = x³ + ax + b` over `F_p` with generator `G` of order `n`.
//!
//! Parameter files are JSON with hexadecimal strings:
//!
//! ```json
//! { "p": "0x…", "a": "0x0", "b": "0x7", "G": { "x": "0x…", "y": "0x…" }, "n": "0x…" }
//! ```

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::{CurveError, Point};

const SECP256K1_P: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F";
const SECP256K1_GX: &str = "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";
const SECP256K1_GY: &str = "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8";
const SECP256K1_N: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParameters {
    pub p: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
    pub n: BigUint,
}

fn parse_hex(field: &str, s: &str) -> Result<BigUint, CurveError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| CurveError::InvalidParameters(format!("{field}: bad hex {s:?}")))
}

/// Hex literals above are well-formed, so parsing cannot fail.
fn const_hex(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).unwrap_or_default()
}

impl CurveParameters {
    /// The Bitcoin curve.
    pub fn secp256k1() -> Self {
        Self {
            p: const_hex(SECP256K1_P),
            a: BigUint::zero(),
            b: BigUint::from(7u32),
            gx: const_hex(SECP256K1_GX),
            gy: const_hex(SECP256K1_GY),
            n: const_hex(SECP256K1_N),
        }
    }

    /// Build and validate a parameter set.
    pub fn new(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        gx: BigUint,
        gy: BigUint,
        n: BigUint,
    ) -> Result<Self, CurveError> {
        let params = Self { p, a, b, gx, gy, n };
        params.validate()?;
        Ok(params)
    }

    pub fn from_json(s: &str) -> Result<Self, CurveError> {
        let file: ParamsFile =
            serde_json::from_str(s).map_err(|e| CurveError::InvalidParameters(e.to_string()))?;
        Self::new(
            parse_hex("p", &file.p)?,
            parse_hex("a", &file.a)?,
            parse_hex("b", &file.b)?,
            parse_hex("G.x", &file.g.x)?,
            parse_hex("G.y", &file.g.y)?,
            parse_hex("n", &file.n)?,
        )
    }

    pub fn to_json(&self) -> Result<String, CurveError> {
        let hex = |v: &BigUint| format!("0x{:x}", v);
        let file = ParamsFile {
            p: hex(&self.p),
            a: hex(&self.a),
            b: hex(&self.b),
            g: PointFile {
                x: hex(&self.gx),
                y: hex(&self.gy),
            },
            n: hex(&self.n),
        };
        serde_json::to_string_pretty(&file).map_err(|e| CurveError::InvalidParameters(e.to_string()))
    }

    pub fn generator(&self) -> Point {
        Point::affine(self.gx.clone(), self.gy.clone())
    }

    /// Bytes needed for one field element.
    pub fn field_len(&self) -> usize {
        (self.p.bits() as usize).div_ceil(8)
    }

    /// Cheap structural checks; primality of `p` is left to the square-root
    /// routine that depends on it.
    fn validate(&self) -> Result<(), CurveError> {
        let invalid = |msg: &str| Err(CurveError::InvalidParameters(msg.to_string()));
        if self.p < BigUint::from(5u32) {
            return invalid("p must be an odd prime greater than 3");
        }
        if self.a >= self.p || self.b >= self.p {
            return invalid("a and b must be reduced modulo p");
        }
        if self.gx >= self.p || self.gy >= self.p {
            return invalid("generator coordinates must be reduced modulo p");
        }
        if self.n < BigUint::from(2u32) {
            return invalid("group order must be at least 2");
        }
        // 4a³ + 27b² ≢ 0 (mod p)
        let disc = (BigUint::from(4u32) * self.a.modpow(&BigUint::from(3u32), &self.p)
            + BigUint::from(27u32) * (&self.b * &self.b))
            % &self.p;
        if disc.is_zero() {
            return invalid("curve is singular");
        }
        let rhs = (self.gx.modpow(&BigUint::from(3u32), &self.p) + &self.a * &self.gx + &self.b)
            % &self.p;
        if (&self.gy * &self.gy) % &self.p != rhs {
            return invalid("generator is not on the curve");
        }
        Ok(())
    }
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self::secp256k1()
    }
}

#[derive(Serialize, Deserialize)]
struct ParamsFile {
    p: String,
    a: String,
    b: String,
    #[serde(rename = "G")]
    g: PointFile,
    n: String,
}

#[derive(Serialize, Deserialize)]
struct PointFile {
    x: String,
    y: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secp256k1_is_valid() {
        let c = CurveParameters::secp256k1();
        assert!(c.validate().is_ok());
        assert_eq!(c.field_len(), 32);
        assert_eq!(c.b, BigUint::from(7u32));
    }

    #[test]
    fn json_roundtrip() {
        let c = CurveParameters::secp256k1();
        let json = c.to_json().unwrap();
        assert!(json.contains("\"G\""));
        assert_eq!(CurveParameters::from_json(&json).unwrap(), c);
    }

    #[test]
    fn toy_curve_from_json() {
        // y² = x³ + 2x + 3 over F_97, G = (3, 6)
        let json = r#"{"p":"0x61","a":"0x2","b":"0x3","G":{"x":"0x3","y":"0x6"},"n":"0x5"}"#;
        let c = CurveParameters::from_json(json).unwrap();
        assert_eq!(c.p, BigUint::from(97u32));
        assert_eq!(c.generator(), Point::affine(BigUint::from(3u32), BigUint::from(6u32)));
    }

    #[test]
    fn rejects_bad_parameters() {
        let off_curve = r#"{"p":"0x61","a":"0x2","b":"0x3","G":{"x":"0x3","y":"0x7"},"n":"0x5"}"#;
        assert!(matches!(
            CurveParameters::from_json(off_curve),
            Err(CurveError::InvalidParameters(_))
        ));
        // 4·0 + 27·0 = 0
        let singular = r#"{"p":"0x61","a":"0x0","b":"0x0","G":{"x":"0x0","y":"0x0"},"n":"0x5"}"#;
        assert!(CurveParameters::from_json(singular).is_err());
        let bad_hex = r#"{"p":"0xzz","a":"0x2","b":"0x3","G":{"x":"0x3","y":"0x6"},"n":"0x5"}"#;
        assert!(CurveParameters::from_json(bad_hex).is_err());
        assert!(CurveParameters::from_json(r#"{"p":"0x61"}"#).is_err());
    }
}
