//! Polymath standard operations and their registration helpers.

use polymath_core::Result;
use polymath_runtime::Dispatcher;
use tracing::warn;

pub mod arithmetic;
pub mod matrix;

pub fn register_all(d: &mut Dispatcher) -> Result<()> {
    arithmetic::register_arithmetic(d)?;
    matrix::register_matrix(d)?;
    arithmetic::register_conversions(d);
    Ok(())
}

pub fn register_with(d: &mut Dispatcher, groups: &[&str]) -> Result<()> {
    for g in groups {
        match *g {
            "arithmetic" => arithmetic::register_arithmetic(d)?,
            "matrix" => matrix::register_matrix(d)?,
            "conversions" => arithmetic::register_conversions(d),
            other => warn!(group = other, "unknown operation group"),
        }
    }
    Ok(())
}
