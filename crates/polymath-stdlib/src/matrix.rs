//! Identity matrices.
//!
//! `eye()`, `eye(n)`, `eye(m, n)`, `eye([m, n])` and `eye(size_matrix)`.
//! Sizes may be numbers or decimals; a decimal size makes the cells
//! decimals in the same precision context.

use polymath_core::{format_value, Matrix, MathError, Result, Value};
use polymath_runtime::{Dispatcher, MatrixMode};

pub fn register_matrix(d: &mut Dispatcher) -> Result<()> {
    d.register("eye", "", eye_default)?;
    d.register("eye", "number | Decimal", eye_square)?;
    d.register("eye", "number | Decimal, number | Decimal", eye_rect)?;
    d.register("eye", "Array", eye_size_array)?;
    d.register("eye", "Matrix", eye_size_matrix)?;
    Ok(())
}

fn wrap(d: &Dispatcher, m: Matrix) -> Value {
    match d.config().matrix {
        MatrixMode::Matrix => Value::Matrix(m),
        MatrixMode::Array => m.value_of(),
    }
}

fn eye_default(d: &Dispatcher, _: &[Value]) -> Result<Value> {
    let one = Value::Num(1.0);
    Ok(wrap(d, identity(&one, &one)?))
}

fn eye_square(d: &Dispatcher, args: &[Value]) -> Result<Value> {
    Ok(wrap(d, identity(&args[0], &args[0])?))
}

fn eye_rect(d: &Dispatcher, args: &[Value]) -> Result<Value> {
    Ok(wrap(d, identity(&args[0], &args[1])?))
}

fn eye_size_array(d: &Dispatcher, args: &[Value]) -> Result<Value> {
    let (rows, cols) = size_vector(&args[0])?;
    Ok(wrap(d, identity(rows, cols)?))
}

fn eye_size_matrix(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    let size = args[0].value_of();
    let (rows, cols) = size_vector(&size)?;
    Ok(Value::Matrix(identity(rows, cols)?))
}

fn size_vector(v: &Value) -> Result<(&Value, &Value)> {
    match v {
        Value::Array(items) if items.len() == 2 => Ok((&items[0], &items[1])),
        Value::Array(items) => Err(MathError::InvalidSizeVectorLength { got: items.len() }),
        other => Err(MathError::InvalidSizeVectorLength { got: other.size().first().copied().unwrap_or(1) }),
    }
}

/// Converts a size argument to a positive integer.
fn dimension(v: &Value) -> Result<usize> {
    let invalid = || MathError::InvalidSize { op: "eye", got: format_value(v) };
    let x = match v {
        Value::Num(x) => *x,
        Value::Decimal(d) if d.is_integer() && !d.is_negative() => d.to_f64(),
        _ => return Err(invalid()),
    };
    if !x.is_finite() || x.fract() != 0.0 || x < 1.0 || x >= usize::MAX as f64 {
        return Err(invalid());
    }
    Ok(x as usize)
}

/// `rows x cols` matrix with ones on the main diagonal.
pub fn identity(rows: &Value, cols: &Value) -> Result<Matrix> {
    let ctx = match (rows, cols) {
        (Value::Decimal(r), _) => Some(r.context()),
        (_, Value::Decimal(c)) => Some(c.context()),
        _ => None,
    };
    let r = dimension(rows)?;
    let c = dimension(cols)?;
    let (zero, one) = match ctx {
        Some(ctx) => (Value::Decimal(ctx.zero()), Value::Decimal(ctx.one())),
        None => (Value::Num(0.0), Value::Num(1.0)),
    };

    let mut matrix = Matrix::new();
    matrix.resize(&[r, c], zero)?;
    for k in 0..r.min(c) {
        matrix.set(&[k, k], one.clone())?;
    }
    Ok(matrix)
}
