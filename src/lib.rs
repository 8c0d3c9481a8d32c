//! Polymath: type-directed arithmetic over numbers, decimals, complex
//! numbers, physical units, arrays and matrices.
//!
//! ```
//! use polymath::{Math, Value};
//!
//! let math = Math::new().unwrap();
//! let sum = math.add(&Value::numbers([1.0, 2.0, 3.0]), &Value::Num(4.0)).unwrap();
//! assert_eq!(sum, Value::numbers([5.0, 6.0, 7.0]));
//! ```

pub use polymath_core::{
    format_value, BaseDimension, Complex, Decimal, DecimalContext, Dimension, MathError, Matrix, Prefix, Result,
    TypeTag, Unit, UnitDef, Value,
};
pub use polymath_runtime::{
    deep_map, deep_map2, try_promote, ConfigError, Dispatcher, MathConfig, MatrixMode, NativeFn, Signature, TypeSet,
};
pub use polymath_stdlib as stdlib;

use tracing::debug;

/// A dispatcher with the standard operations registered.
#[derive(Clone)]
pub struct Math {
    dispatcher: Dispatcher,
}

impl Math {
    pub fn new() -> Result<Self> {
        Self::with_config(MathConfig::default())
    }

    pub fn with_config(config: MathConfig) -> Result<Self> {
        debug!(matrix = ?config.matrix, precision = config.precision, "building math engine");
        let mut dispatcher = Dispatcher::with_config(config);
        stdlib::register_all(&mut dispatcher)?;
        Ok(Math { dispatcher })
    }

    /// Default configuration with `POLYMATH_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::with_config(MathConfig::from_env())
    }

    pub fn config(&self) -> &MathConfig {
        self.dispatcher.config()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Mutable access for registering extra overloads or conversions.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn add(&self, x: &Value, y: &Value) -> Result<Value> {
        self.call("add", &[x.clone(), y.clone()])
    }

    pub fn exp(&self, x: &Value) -> Result<Value> {
        self.call("exp", std::slice::from_ref(x))
    }

    /// `eye()`, `eye(n)`, `eye(m, n)` or `eye(size)`.
    pub fn eye(&self, args: &[Value]) -> Result<Value> {
        self.call("eye", args)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.dispatcher.call(name, args)
    }

    /// Parses `s` as a decimal in the configured precision.
    pub fn decimal(&self, s: &str) -> Result<Value> {
        Ok(Value::Decimal(Decimal::parse(s, self.config().decimal_context())?))
    }
}
