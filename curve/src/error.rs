use hdk_math::MathError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// An input point does not satisfy the curve equation.
    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("the point at infinity has no affine encoding")]
    PointAtInfinity,

    #[error("no curve point has x = {0}")]
    NoPointForX(String),

    #[error("invalid curve parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid point encoding: {0}")]
    InvalidEncoding(String),

    #[error(transparent)]
    Math(#[from] MathError),
}
