pub mod complex;
pub mod decimal;
pub mod error;
pub mod matrix;
pub mod pretty;
pub mod unit;
pub mod value;

pub use complex::Complex;
pub use decimal::{Decimal, DecimalContext};
pub use error::{MathError, Result};
pub use matrix::Matrix;
pub use pretty::format_value;
pub use unit::{BaseDimension, Dimension, Prefix, Unit, UnitDef};
pub use value::{TypeTag, Value};
