use num_bigint::BigUint;
use std::fmt;

/// A point on a short-Weierstrass curve in affine coordinates, or the group
/// identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Point {
    Infinity,
    Affine { x: BigUint, y: BigUint },
}

impl Point {
    pub fn affine(x: BigUint, y: BigUint) -> Self {
        Self::Affine { x, y }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Self::Affine { x, .. } => Some(x),
            Self::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Self::Affine { y, .. } => Some(y),
            Self::Infinity => None,
        }
    }

    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            Self::Affine { x, y } => Some((x, y)),
            Self::Infinity => None,
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinity => f.write_str("Point(∞)"),
            Self::Affine { x, y } => write!(f, "Point({:x}, {:x})", x, y),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
