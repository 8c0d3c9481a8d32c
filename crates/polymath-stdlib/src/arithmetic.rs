use polymath_core::{MathError, Result, TypeTag, Value};
use polymath_runtime::{deep_map, deep_map2, try_promote, Dispatcher};
use tracing::debug;

pub fn register_arithmetic(d: &mut Dispatcher) -> Result<()> {
    // Collection fallbacks last: a container must never reach a scalar overload.
    d.register("add", "number, number", add_numbers)?;
    d.register("add", "Decimal, Decimal", add_decimals)?;
    d.register("add", "number, Decimal", add_number_decimal)?;
    d.register("add", "Decimal, number", add_decimal_number)?;
    d.register("add", "Complex, Complex", add_complex)?;
    d.register("add", "Unit, Unit", add_units)?;
    d.register("add", "Array | Matrix, any", add_collection)?;
    d.register("add", "any, Array | Matrix", add_collection)?;
    d.register("add", "string, string", add_strings)?;

    d.register("exp", "number", exp_number)?;
    d.register("exp", "Complex", exp_complex)?;
    d.register("exp", "Decimal", exp_decimal)?;
    d.register("exp", "Array | Matrix", exp_collection)?;
    Ok(())
}

/// Numbers take part in complex overloads as `x + 0i`.
pub fn register_conversions(d: &mut Dispatcher) {
    d.add_conversion(TypeTag::Number, TypeTag::Complex, number_to_complex);
}

fn number_to_complex(v: &Value) -> Value {
    match v {
        Value::Num(x) => Value::complex(*x, 0.0),
        other => other.clone(),
    }
}

// Reached only if an implementation is registered under the wrong signature.
fn unexpected(op: &str, args: &[Value]) -> MathError {
    MathError::NoMatchingOverload {
        op: op.to_string(),
        types: args.iter().map(|a| a.type_tag().name().to_string()).collect(),
        candidates: Vec::new(),
    }
}

fn add_numbers(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Num(x), Value::Num(y)] => Ok(Value::Num(x + y)),
        _ => Err(unexpected("add", args)),
    }
}

fn add_decimals(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Decimal(x), Value::Decimal(y)] => Ok(Value::Decimal(x.add(y))),
        _ => Err(unexpected("add", args)),
    }
}

fn add_number_decimal(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Num(x), Value::Decimal(y)] => match try_promote(*x, y.context()) {
            Some(big_x) => Ok(Value::Decimal(big_x.add(y))),
            None => {
                debug!(number = *x, decimal = %y, "downgrading decimal to number for add");
                Ok(Value::Num(x + y.to_f64()))
            }
        },
        _ => Err(unexpected("add", args)),
    }
}

fn add_decimal_number(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Decimal(x), Value::Num(y)] => match try_promote(*y, x.context()) {
            Some(big_y) => Ok(Value::Decimal(x.add(&big_y))),
            None => {
                debug!(decimal = %x, number = *y, "downgrading decimal to number for add");
                Ok(Value::Num(x.to_f64() + y))
            }
        },
        _ => Err(unexpected("add", args)),
    }
}

fn add_complex(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Complex(x), Value::Complex(y)] => Ok(Value::Complex(x.add(y))),
        _ => Err(unexpected("add", args)),
    }
}

fn add_units(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    let [Value::Unit(x), Value::Unit(y)] = args else {
        return Err(unexpected("add", args));
    };
    let xv = x.value.ok_or(MathError::UndefinedUnitValue { param: "x" })?;
    let yv = y.value.ok_or(MathError::UndefinedUnitValue { param: "y" })?;
    if !x.equal_base(y) {
        return Err(MathError::IncompatibleUnits { lhs: x.unit_name(), rhs: y.unit_name() });
    }
    let mut sum = x.clone();
    sum.value = Some(xv + yv);
    sum.prefix_locked = false;
    Ok(Value::Unit(sum))
}

fn add_collection(d: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [x, y] => deep_map2(x, y, &mut |a: &Value, b: &Value| d.call("add", &[a.clone(), b.clone()])),
        _ => Err(unexpected("add", args)),
    }
}

fn add_strings(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Str(x), Value::Str(y)] => Ok(Value::Str(format!("{x}{y}"))),
        _ => Err(unexpected("add", args)),
    }
}

fn exp_number(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Num(x)] => Ok(Value::Num(x.exp())),
        _ => Err(unexpected("exp", args)),
    }
}

fn exp_complex(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Complex(z)] => Ok(Value::Complex(z.exp())),
        _ => Err(unexpected("exp", args)),
    }
}

fn exp_decimal(_: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Decimal(x)] => match x.exp() {
            Some(e) => Ok(Value::Decimal(e)),
            None => {
                debug!(decimal = %x, "decimal exponent out of range, downgrading");
                Ok(Value::Num(x.to_f64().exp()))
            }
        },
        _ => Err(unexpected("exp", args)),
    }
}

fn exp_collection(d: &Dispatcher, args: &[Value]) -> Result<Value> {
    match args {
        [x] => deep_map(x, &mut |v: &Value| d.call("exp", std::slice::from_ref(v))),
        _ => Err(unexpected("exp", args)),
    }
}
