//! Elliptic curve group `y² = x³ + ax + b` over a prime field.
//!
//! Points are affine with an explicit [`Point::Infinity`] identity. The curve
//! parameters are an immutable value shared by every [`Curve`] clone.

mod error;
mod group;
mod params;
mod point;

pub use error::CurveError;
pub use group::Curve;
pub use params::CurveParameters;
pub use point::Point;
