use crate::complex::Complex;
use crate::decimal::Decimal;
use crate::matrix::Matrix;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Num(f64),
    Decimal(Decimal),
    Complex(Complex),
    Unit(Unit),
    Str(String),
    Array(Vec<Value>),
    Matrix(Matrix),
}

/// Runtime type of a [`Value`], as seen by dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Number,
    Decimal,
    Complex,
    Unit,
    String,
    Array,
    Matrix,
}

impl TypeTag {
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Number,
        TypeTag::Decimal,
        TypeTag::Complex,
        TypeTag::Unit,
        TypeTag::String,
        TypeTag::Array,
        TypeTag::Matrix,
    ];

    /// Name used in signatures and error messages.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Number => "number",
            TypeTag::Decimal => "Decimal",
            TypeTag::Complex => "Complex",
            TypeTag::Unit => "Unit",
            TypeTag::String => "string",
            TypeTag::Array => "Array",
            TypeTag::Matrix => "Matrix",
        }
    }

    pub fn from_name(name: &str) -> Option<TypeTag> {
        TypeTag::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Num(_) => TypeTag::Number,
            Value::Decimal(_) => TypeTag::Decimal,
            Value::Complex(_) => TypeTag::Complex,
            Value::Unit(_) => TypeTag::Unit,
            Value::Str(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Matrix(_) => TypeTag::Matrix,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Matrix(_))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex::new(re, im))
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Flat array of plain numbers.
    pub fn numbers<const N: usize>(xs: [f64; N]) -> Self {
        Value::Array(xs.into_iter().map(Value::Num).collect())
    }

    /// Shape of a container, read along the first elements for arrays;
    /// empty for scalars.
    pub fn size(&self) -> Vec<usize> {
        match self {
            Value::Matrix(m) => m.size().to_vec(),
            Value::Array(items) => {
                let mut size = vec![items.len()];
                if let Some(first @ Value::Array(_)) = items.first() {
                    size.extend(first.size());
                }
                size
            }
            _ => Vec::new(),
        }
    }

    /// Nested-array view; identity for everything but matrices.
    pub fn value_of(&self) -> Value {
        match self {
            Value::Matrix(m) => m.value_of(),
            other => other.clone(),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Num(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Complex> for Value {
    fn from(z: Complex) -> Self {
        Value::Complex(z)
    }
}

impl From<Unit> for Value {
    fn from(u: Unit) -> Self {
        Value::Unit(u)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Value::Matrix(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::pretty::format_value(self))
    }
}
