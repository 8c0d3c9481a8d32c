use polymath_core::{MathError, Matrix, Unit, Value};
use polymath_runtime::Dispatcher;
use polymath_stdlib as stdlib;
use pretty_assertions::assert_eq;

fn dispatcher() -> Dispatcher {
    let mut d = Dispatcher::new();
    stdlib::register_all(&mut d).unwrap();
    d
}

fn unit(value: f64, name: &str) -> Value {
    Value::Unit(Unit::from_symbol(Some(value), name).unwrap())
}

#[test]
fn adds_numbers() {
    let d = dispatcher();
    assert_eq!(d.call("add", &[Value::Num(2.0), Value::Num(3.0)]).unwrap(), Value::Num(5.0));
}

#[test]
fn adds_complex_numbers() {
    let d = dispatcher();
    let out = d.call("add", &[Value::complex(2.0, 3.0), Value::complex(-4.0, 1.0)]).unwrap();
    assert_eq!(out, Value::complex(-2.0, 4.0));
    assert_eq!(out.to_string(), "-2 + 4i");
}

#[test]
fn broadcasts_scalar_over_array() {
    let d = dispatcher();
    let out = d.call("add", &[Value::numbers([1.0, 2.0, 3.0]), Value::Num(4.0)]).unwrap();
    assert_eq!(out, Value::numbers([5.0, 6.0, 7.0]));
    let out = d.call("add", &[Value::Num(4.0), Value::numbers([1.0, 2.0, 3.0])]).unwrap();
    assert_eq!(out, Value::numbers([5.0, 6.0, 7.0]));
}

#[test]
fn adds_matrices_cell_by_cell() {
    let d = dispatcher();
    let a = Value::Matrix(Matrix::from_nested(vec![Value::numbers([1.0, 2.0]), Value::numbers([3.0, 4.0])]).unwrap());
    let b = Value::Matrix(
        Matrix::from_nested(vec![Value::numbers([10.0, 20.0]), Value::numbers([30.0, 40.0])]).unwrap(),
    );
    let out = d.call("add", &[a, b]).unwrap();
    let expected = Matrix::from_nested(vec![Value::numbers([11.0, 22.0]), Value::numbers([33.0, 44.0])]).unwrap();
    assert_eq!(out, Value::Matrix(expected));
}

#[test]
fn mismatched_arrays_are_rejected() {
    let d = dispatcher();
    let err = d.call("add", &[Value::numbers([1.0, 2.0]), Value::numbers([1.0, 2.0, 3.0])]).unwrap_err();
    assert_eq!(err, MathError::ShapeMismatch { lhs: vec![2], rhs: vec![3] });
}

#[test]
fn adds_units_of_same_dimension() {
    let d = dispatcher();
    let Value::Unit(sum) = d.call("add", &[unit(5.0, "cm"), unit(2.1, "mm")]).unwrap() else {
        panic!("expected a unit");
    };
    let Value::Unit(expected) = unit(52.1, "mm") else { unreachable!() };
    let (got, want) = (sum.value.unwrap(), expected.value.unwrap());
    assert!((got - want).abs() < 1e-12, "{got} != {want}");
    assert!(sum.equal_base(&expected));
    assert_eq!(sum.to_string(), "5.21 cm");
}

#[test]
fn rejects_units_of_different_dimension() {
    let d = dispatcher();
    let err = d.call("add", &[unit(5.0, "cm"), unit(2.0, "kg")]).unwrap_err();
    assert_eq!(err, MathError::IncompatibleUnits { lhs: "cm".into(), rhs: "kg".into() });
}

#[test]
fn unit_and_number_have_no_overload() {
    let d = dispatcher();
    let err = d.call("add", &[unit(5.0, "cm"), Value::Num(1.0)]).unwrap_err();
    assert!(matches!(err, MathError::NoMatchingOverload { ref op, .. } if op == "add"));
}

#[test]
fn exp_maps_over_collections() {
    let d = dispatcher();
    let out = d.call("exp", &[Value::numbers([0.0, 1.0])]).unwrap();
    assert_eq!(out, Value::numbers([1.0, 1f64.exp()]));
    let Value::Complex(z) = d.call("exp", &[Value::complex(0.0, std::f64::consts::PI)]).unwrap() else {
        panic!("expected a complex result");
    };
    assert!((z.re + 1.0).abs() < 1e-12 && z.im.abs() < 1e-12);
}

#[test]
fn numbers_reach_complex_overloads_through_conversion() {
    let d = dispatcher();
    let out = d.call("add", &[Value::Num(1.0), Value::complex(0.0, 2.0)]).unwrap();
    assert_eq!(out, Value::complex(1.0, 2.0));
}

#[test]
fn register_with_selects_groups() {
    let mut d = Dispatcher::new();
    stdlib::register_with(&mut d, &["matrix"]).unwrap();
    assert!(d.contains("eye"));
    assert!(!d.contains("add"));
}
