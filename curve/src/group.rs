//! Group law, scalar multiplication and point encodings.

use std::sync::Arc;

use hdk_math::{mod_inverse, random_below, sqrt_mod, PrimeTable, SqrtMod};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use rand::RngCore;

use crate::{CurveError, CurveParameters, Point};

const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

/// The group of points of one curve.
///
/// Cheap to clone; parameters and prime table are shared.
#[derive(Clone, Debug)]
pub struct Curve {
    params: Arc<CurveParameters>,
    primes: Arc<PrimeTable>,
}

impl Curve {
    pub fn new(params: CurveParameters, primes: Arc<PrimeTable>) -> Self {
        Self {
            params: Arc::new(params),
            primes,
        }
    }

    pub fn secp256k1() -> Self {
        Self::new(CurveParameters::secp256k1(), Arc::new(PrimeTable::standard()))
    }

    pub fn params(&self) -> &CurveParameters {
        &self.params
    }

    pub fn order(&self) -> &BigUint {
        &self.params.n
    }

    pub fn generator(&self) -> Point {
        self.params.generator()
    }

    fn reduce(&self, v: BigUint) -> BigUint {
        v % &self.params.p
    }

    fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let p = &self.params.p;
        (a + p - (b % p)) % p
    }

    /// `x³ + ax + b mod p`
    fn rhs(&self, x: &BigUint) -> BigUint {
        let p = &self.params.p;
        self.reduce(x * x % p * x + &self.params.a * x + &self.params.b)
    }

    /// True for infinity; for an affine point, true iff both coordinates are
    /// reduced modulo `p` and `y² ≡ x³ + ax + b`.
    pub fn is_on_curve(&self, point: &Point) -> bool {
        match point {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                let p = &self.params.p;
                x < p && y < p && self.reduce(y * y) == self.rhs(x)
            }
        }
    }

    fn ensure_on_curve(&self, point: &Point) -> Result<(), CurveError> {
        if self.is_on_curve(point) {
            Ok(())
        } else {
            Err(CurveError::NotOnCurve)
        }
    }

    /// `P + Q`. Fails if either input is off the curve.
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Result<Point, CurveError> {
        self.ensure_on_curve(lhs)?;
        self.ensure_on_curve(rhs)?;
        self.add_unchecked(lhs, rhs)
    }

    /// `2P`. Fails if `P` is off the curve.
    pub fn double(&self, point: &Point) -> Result<Point, CurveError> {
        self.ensure_on_curve(point)?;
        self.double_unchecked(point)
    }

    fn add_unchecked(&self, lhs: &Point, rhs: &Point) -> Result<Point, CurveError> {
        let ((x1, y1), (x2, y2)) = match (lhs.coordinates(), rhs.coordinates()) {
            (None, _) => return Ok(rhs.clone()),
            (_, None) => return Ok(lhs.clone()),
            (Some(a), Some(b)) => (a, b),
        };
        if x1 == x2 {
            return if y1 == y2 {
                self.double_unchecked(lhs)
            } else {
                Ok(Point::Infinity)
            };
        }

        let p = &self.params.p;
        let slope = self.sub(y2, y1) * mod_inverse(&self.sub(x2, x1), p)? % p;
        let x3 = self.sub(&self.sub(&(&slope * &slope), x1), x2);
        let y3 = self.sub(&(slope * self.sub(x1, &x3)), y1);
        Ok(Point::affine(x3, y3))
    }

    fn double_unchecked(&self, point: &Point) -> Result<Point, CurveError> {
        let (x, y) = match point.coordinates() {
            None => return Ok(Point::Infinity),
            Some(c) => c,
        };
        if y.is_zero() {
            // vertical tangent
            return Ok(Point::Infinity);
        }

        let p = &self.params.p;
        let numerator = self.reduce(BigUint::from(3u32) * x * x + &self.params.a);
        let denominator = self.reduce(BigUint::from(2u32) * y);
        let slope = numerator * mod_inverse(&denominator, p)? % p;
        let x3 = self.sub(&(&slope * &slope), &self.reduce(BigUint::from(2u32) * x));
        let y3 = self.sub(&(slope * self.sub(x, &x3)), y);
        Ok(Point::affine(x3, y3))
    }

    /// `k·P` by left-to-right double-and-add.
    ///
    /// `k` is first reduced modulo the field prime `p`; multiples of the
    /// group order `n` below `p` therefore still map to infinity.
    pub fn scalar_mul(&self, k: &BigUint, point: &Point) -> Result<Point, CurveError> {
        self.ensure_on_curve(point)?;
        let k = k % &self.params.p;
        let mut acc = Point::Infinity;
        for bit in (0..k.bits()).rev() {
            acc = self.double_unchecked(&acc)?;
            if k.bit(bit) {
                acc = self.add_unchecked(&acc, point)?;
            }
        }
        Ok(acc)
    }

    /// `k·G`
    pub fn generator_mul(&self, k: &BigUint) -> Result<Point, CurveError> {
        self.scalar_mul(k, &self.generator())
    }

    pub fn negate(&self, point: &Point) -> Point {
        match point {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::affine(x.clone(), self.sub(&BigUint::zero(), y)),
        }
    }

    /// The ordinates of the curve points with abscissa `x`.
    pub fn y_for_x<R: RngCore + ?Sized>(
        &self,
        x: &BigUint,
        rng: &mut R,
    ) -> Result<SqrtMod, CurveError> {
        let x = x % &self.params.p;
        Ok(sqrt_mod(&self.rhs(&x), &self.params.p, &self.primes, rng)?)
    }

    /// A uniformly random point of the whole curve (not necessarily in the
    /// subgroup generated by `G`).
    pub fn random_point<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<Point, CurveError> {
        loop {
            let x = random_below(&self.params.p, rng)?;
            match self.y_for_x(&x, rng)? {
                SqrtMod::Roots(small, large) => {
                    let y = if rng.next_u32() & 1 == 0 { small } else { large };
                    return Ok(Point::affine(x, y));
                }
                SqrtMod::Zero => return Ok(Point::affine(x, BigUint::zero())),
                SqrtMod::NonResidue => {
                    tracing::trace!(%x, "no point with this x, resampling");
                }
            }
        }
    }

    /// `k·G` for a uniform `k ∈ [0, n)`, possibly infinity.
    pub fn random_subgroup_point<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Point, CurveError> {
        let k = random_below(&self.params.n, rng)?;
        self.generator_mul(&k)
    }

    fn field_bytes(&self, v: &BigUint) -> Vec<u8> {
        let len = self.params.field_len();
        let raw = v.to_bytes_be();
        let mut out = vec![0u8; len.saturating_sub(raw.len())];
        out.extend_from_slice(&raw);
        out
    }

    /// SEC1 compressed form, `02/03 ‖ x`.
    pub fn encode_compressed(&self, point: &Point) -> Result<Vec<u8>, CurveError> {
        let (x, y) = point.coordinates().ok_or(CurveError::PointAtInfinity)?;
        let mut out = Vec::with_capacity(1 + self.params.field_len());
        out.push(if y.is_even() { TAG_EVEN } else { TAG_ODD });
        out.extend_from_slice(&self.field_bytes(x));
        Ok(out)
    }

    /// SEC1 uncompressed form, `04 ‖ x ‖ y`.
    pub fn encode_uncompressed(&self, point: &Point) -> Result<Vec<u8>, CurveError> {
        let (x, y) = point.coordinates().ok_or(CurveError::PointAtInfinity)?;
        let mut out = Vec::with_capacity(1 + 2 * self.params.field_len());
        out.push(TAG_UNCOMPRESSED);
        out.extend_from_slice(&self.field_bytes(x));
        out.extend_from_slice(&self.field_bytes(y));
        Ok(out)
    }

    /// Parse either SEC1 form; the result is always on the curve.
    pub fn decode_point<R: RngCore + ?Sized>(
        &self,
        bytes: &[u8],
        rng: &mut R,
    ) -> Result<Point, CurveError> {
        let len = self.params.field_len();
        let (&tag, body) = bytes
            .split_first()
            .ok_or_else(|| CurveError::InvalidEncoding("empty input".into()))?;

        match tag {
            TAG_EVEN | TAG_ODD if body.len() == len => {
                let x = BigUint::from_bytes_be(body);
                if x >= self.params.p {
                    return Err(CurveError::InvalidEncoding("x not reduced modulo p".into()));
                }
                let want_odd = tag == TAG_ODD;
                let y = match self.y_for_x(&x, rng)? {
                    SqrtMod::Roots(a, b) => {
                        if a.is_odd() == want_odd {
                            a
                        } else {
                            b
                        }
                    }
                    SqrtMod::Zero if !want_odd => BigUint::zero(),
                    SqrtMod::Zero | SqrtMod::NonResidue => {
                        return Err(CurveError::NoPointForX(format!("{:x}", x)))
                    }
                };
                Ok(Point::affine(x, y))
            }
            TAG_UNCOMPRESSED if body.len() == 2 * len => {
                let point = Point::affine(
                    BigUint::from_bytes_be(&body[..len]),
                    BigUint::from_bytes_be(&body[len..]),
                );
                self.ensure_on_curve(&point)?;
                Ok(point)
            }
            TAG_EVEN | TAG_ODD | TAG_UNCOMPRESSED => Err(CurveError::InvalidEncoding(format!(
                "wrong length {} for tag {:#04x}",
                bytes.len(),
                tag
            ))),
            other => Err(CurveError::InvalidEncoding(format!("unknown tag {:#04x}", other))),
        }
    }
}
