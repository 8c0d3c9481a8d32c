use thiserror::Error;

pub type Result<T> = std::result::Result<T, MathError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("no matching overload for {op}({}); candidates: {}", .types.join(", "), .candidates.join("; "))]
    NoMatchingOverload {
        op: String,
        types: Vec<String>,
        candidates: Vec<String>,
    },
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("invalid signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },
    #[error("parameter {param} contains a unit with undefined value")]
    UndefinedUnitValue { param: &'static str },
    #[error("units do not match: {lhs} vs {rhs}")]
    IncompatibleUnits { lhs: String, rhs: String },
    #[error("size mismatch: {lhs:?} vs {rhs:?}")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
    #[error("parameters in function {op} must be positive integers (got {got})")]
    InvalidSize { op: &'static str, got: String },
    #[error("vector containing two values expected (got {got} values)")]
    InvalidSizeVectorLength { got: usize },
    #[error("index {index:?} out of range for size {size:?}")]
    IndexOutOfBounds { index: Vec<usize>, size: Vec<usize> },
    #[error("invalid decimal '{0}'")]
    InvalidDecimal(String),
}
