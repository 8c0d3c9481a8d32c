//! Element-wise application of scalar operations over nested containers.
//!
//! Both functions are pure: containers are rebuilt, never mutated. Arrays
//! stay arrays and matrices stay matrices. When an `Array` meets a `Matrix`
//! the result takes the kind of the left operand.

use polymath_core::{Matrix, MathError, Result, Value};

/// Applies `f` to every leaf of `x`.
pub fn deep_map<F>(x: &Value, f: &mut F) -> Result<Value>
where
    F: FnMut(&Value) -> Result<Value>,
{
    match x {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(deep_map(item, f)?);
            }
            Ok(Value::Array(out))
        }
        Value::Matrix(m) => Ok(Value::Matrix(m.map(|cell| deep_map(cell, f))?)),
        leaf => f(leaf),
    }
}

/// Applies `f` pairwise over two operands, broadcasting a non-container
/// operand over every element of the other.
pub fn deep_map2<F>(x: &Value, y: &Value, f: &mut F) -> Result<Value>
where
    F: FnMut(&Value, &Value) -> Result<Value>,
{
    match (x, y) {
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Err(MathError::ShapeMismatch { lhs: x.size(), rhs: y.size() });
            }
            let mut out = Vec::with_capacity(a.len());
            for (l, r) in a.iter().zip(b) {
                out.push(deep_map2(l, r, f)?);
            }
            Ok(Value::Array(out))
        }
        (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.zip_map(b, |l, r| deep_map2(l, r, f))?)),
        (Value::Matrix(a), Value::Array(_)) => match deep_map2(&a.value_of(), y, f)? {
            Value::Array(items) => Ok(Value::Matrix(Matrix::from_nested(items)?)),
            other => Ok(other),
        },
        (Value::Array(_), Value::Matrix(b)) => deep_map2(x, &b.value_of(), f),
        (Value::Array(a), scalar) => {
            let mut out = Vec::with_capacity(a.len());
            for item in a {
                out.push(deep_map2(item, scalar, f)?);
            }
            Ok(Value::Array(out))
        }
        (scalar, Value::Array(b)) => {
            let mut out = Vec::with_capacity(b.len());
            for item in b {
                out.push(deep_map2(scalar, item, f)?);
            }
            Ok(Value::Array(out))
        }
        (Value::Matrix(a), scalar) => Ok(Value::Matrix(a.map(|cell| deep_map2(cell, scalar, f))?)),
        (scalar, Value::Matrix(b)) => Ok(Value::Matrix(b.map(|cell| deep_map2(scalar, cell, f))?)),
        (l, r) => f(l, r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plus(a: &Value, b: &Value) -> Result<Value> {
        match (a, b) {
            (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x + y)),
            _ => Err(MathError::UnknownFunction("plus".into())),
        }
    }

    fn matrix(rows: Vec<Value>) -> Value {
        Value::Matrix(Matrix::from_nested(rows).unwrap())
    }

    #[test]
    fn deep_map_keeps_kind_and_shape() {
        let mut double = |v: &Value| -> Result<Value> {
            match v {
                Value::Num(x) => Ok(Value::Num(x * 2.0)),
                other => Ok(other.clone()),
            }
        };
        let ragged = Value::array([Value::Num(1.0), Value::numbers([2.0, 3.0])]);
        assert_eq!(
            deep_map(&ragged, &mut double).unwrap(),
            Value::array([Value::Num(2.0), Value::numbers([4.0, 6.0])])
        );
        let m = matrix(vec![Value::numbers([1.0, 2.0])]);
        assert_eq!(deep_map(&m, &mut double).unwrap(), matrix(vec![Value::numbers([2.0, 4.0])]));
        assert_eq!(deep_map(&Value::Num(4.0), &mut double).unwrap(), Value::Num(8.0));
    }

    #[test]
    fn deep_map_propagates_errors() {
        let mut fail = |_: &Value| -> Result<Value> { Err(MathError::UnknownFunction("boom".into())) };
        assert!(deep_map(&Value::numbers([1.0]), &mut fail).is_err());
    }

    #[test]
    fn broadcasts_scalars_both_ways() {
        let mut f = plus;
        let xs = Value::numbers([1.0, 2.0, 3.0]);
        assert_eq!(deep_map2(&xs, &Value::Num(4.0), &mut f).unwrap(), Value::numbers([5.0, 6.0, 7.0]));
        assert_eq!(deep_map2(&Value::Num(4.0), &xs, &mut f).unwrap(), Value::numbers([5.0, 6.0, 7.0]));
        let m = matrix(vec![Value::numbers([1.0, 2.0])]);
        assert_eq!(deep_map2(&Value::Num(1.0), &m, &mut f).unwrap(), matrix(vec![Value::numbers([2.0, 3.0])]));
    }

    #[test]
    fn pairs_nested_arrays() {
        let mut f = plus;
        let a = Value::array([Value::numbers([1.0, 2.0]), Value::numbers([3.0, 4.0])]);
        let b = Value::array([Value::numbers([10.0, 20.0]), Value::numbers([30.0, 40.0])]);
        assert_eq!(
            deep_map2(&a, &b, &mut f).unwrap(),
            Value::array([Value::numbers([11.0, 22.0]), Value::numbers([33.0, 44.0])])
        );
    }

    #[test]
    fn mismatched_arrays_fail() {
        let mut f = plus;
        let err = deep_map2(&Value::numbers([1.0, 2.0]), &Value::numbers([1.0, 2.0, 3.0]), &mut f).unwrap_err();
        assert_eq!(err, MathError::ShapeMismatch { lhs: vec![2], rhs: vec![3] });
    }

    #[test]
    fn mismatched_matrices_fail() {
        let mut f = plus;
        let a = matrix(vec![Value::numbers([1.0, 2.0])]);
        let b = matrix(vec![Value::numbers([1.0]), Value::numbers([2.0])]);
        let err = deep_map2(&a, &b, &mut f).unwrap_err();
        assert_eq!(err, MathError::ShapeMismatch { lhs: vec![1, 2], rhs: vec![2, 1] });
    }

    #[test]
    fn mixed_kinds_follow_left_operand() {
        let mut f = plus;
        let m = matrix(vec![Value::numbers([1.0, 2.0])]);
        let a = Value::array([Value::numbers([10.0, 20.0])]);
        assert_eq!(deep_map2(&m, &a, &mut f).unwrap(), matrix(vec![Value::numbers([11.0, 22.0])]));
        assert_eq!(deep_map2(&a, &m, &mut f).unwrap(), Value::array([Value::numbers([11.0, 22.0])]));
    }
}
