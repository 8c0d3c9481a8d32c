//! Dense, resizable n-dimensional storage.
//!
//! Cells are kept row-major in a flat buffer whose length is always the
//! product of `size`. Every dimension is at least 1, except for the empty
//! matrix, whose size is `[0]`.

use crate::error::{MathError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    size: Vec<usize>,
    data: Vec<Value>,
}

fn strides(size: &[usize]) -> Vec<usize> {
    let mut st = vec![0; size.len()];
    let mut acc = 1usize;
    for i in (0..size.len()).rev() {
        st[i] = acc;
        acc *= size[i];
    }
    st
}

/// Number of cells for `size`. Every dimension must be positive and the
/// buffer must be addressable.
fn cell_count(op: &'static str, size: &[usize]) -> Result<usize> {
    let invalid = || MathError::InvalidSize { op, got: format!("{size:?}") };
    if size.is_empty() || size.contains(&0) {
        return Err(invalid());
    }
    let total = size.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d)).ok_or_else(invalid)?;
    match total.checked_mul(std::mem::size_of::<Value>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(total),
        _ => Err(invalid()),
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    /// The empty matrix, size `[0]`.
    pub fn new() -> Self {
        Matrix { size: vec![0], data: Vec::new() }
    }

    pub fn filled(size: &[usize], default: Value) -> Result<Self> {
        let total = cell_count("resize", size)?;
        Ok(Matrix { size: size.to_vec(), data: vec![default; total] })
    }

    /// Builds a matrix from nested arrays. Nesting depth and lengths must be
    /// uniform; the shape is read along the first elements.
    pub fn from_nested(items: Vec<Value>) -> Result<Self> {
        if items.is_empty() {
            return Ok(Matrix::new());
        }
        let mut size = vec![items.len()];
        let mut head = items.first();
        while let Some(Value::Array(inner)) = head {
            size.push(inner.len());
            head = inner.first();
        }
        let total = cell_count("matrix", &size)?;
        let mut data = Vec::with_capacity(total);
        flatten_into(items, &size, 0, &mut data)?;
        Ok(Matrix { size, data })
    }

    pub fn size(&self) -> &[usize] {
        &self.size
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn offset(&self, index: &[usize]) -> Result<usize> {
        let out_of_bounds = || MathError::IndexOutOfBounds { index: index.to_vec(), size: self.size.clone() };
        if index.len() != self.size.len() || index.iter().zip(&self.size).any(|(i, d)| i >= d) {
            return Err(out_of_bounds());
        }
        Ok(index.iter().zip(strides(&self.size)).map(|(i, s)| i * s).sum())
    }

    pub fn get(&self, index: &[usize]) -> Result<&Value> {
        let off = self.offset(index)?;
        Ok(&self.data[off])
    }

    pub fn set(&mut self, index: &[usize], value: Value) -> Result<()> {
        let off = self.offset(index)?;
        self.data[off] = value;
        Ok(())
    }

    /// Reallocates to `new_size`. Cells inside both the old and the new
    /// shape keep their value, new cells get `default`. When the rank
    /// changes, missing trailing coordinates are taken as 0.
    pub fn resize(&mut self, new_size: &[usize], default: Value) -> Result<()> {
        let total = cell_count("resize", new_size)?;
        let new_strides = strides(new_size);
        let old_strides = strides(&self.size);
        let mut old = std::mem::take(&mut self.data);
        let mut data = Vec::with_capacity(total);
        let mut index = vec![0usize; new_size.len()];
        for flat in 0..total {
            let mut rem = flat;
            for (k, s) in new_strides.iter().enumerate() {
                index[k] = rem / s;
                rem %= s;
            }
            let cell = self
                .old_offset(&index, &old_strides)
                .map(|off| std::mem::replace(&mut old[off], Value::Num(0.0)));
            data.push(cell.unwrap_or_else(|| default.clone()));
        }
        self.size = new_size.to_vec();
        self.data = data;
        Ok(())
    }

    fn old_offset(&self, index: &[usize], old_strides: &[usize]) -> Option<usize> {
        if index.len() > self.size.len() && index[self.size.len()..].iter().any(|&i| i != 0) {
            return None;
        }
        let mut off = 0;
        for (k, (&dim, &stride)) in self.size.iter().zip(old_strides).enumerate() {
            let coord = index.get(k).copied().unwrap_or(0);
            if coord >= dim {
                return None;
            }
            off += coord * stride;
        }
        Some(off)
    }

    /// Nested-array view of the cells.
    pub fn value_of(&self) -> Value {
        if self.data.is_empty() {
            return Value::Array(Vec::new());
        }
        nest(&self.data, &self.size)
    }

    pub fn map<F>(&self, mut f: F) -> Result<Matrix>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        let data = self.data.iter().map(&mut f).collect::<Result<Vec<_>>>()?;
        Ok(Matrix { size: self.size.clone(), data })
    }

    pub fn zip_map<F>(&self, other: &Matrix, mut f: F) -> Result<Matrix>
    where
        F: FnMut(&Value, &Value) -> Result<Value>,
    {
        if self.size != other.size {
            return Err(MathError::ShapeMismatch { lhs: self.size.clone(), rhs: other.size.clone() });
        }
        let data = self.data.iter().zip(&other.data).map(|(a, b)| f(a, b)).collect::<Result<Vec<_>>>()?;
        Ok(Matrix { size: self.size.clone(), data })
    }
}

fn ragged(size: &[usize], depth: usize, got: usize) -> MathError {
    let mut found = size[..depth].to_vec();
    found.push(got);
    MathError::ShapeMismatch { lhs: size[..=depth].to_vec(), rhs: found }
}

fn flatten_into(items: Vec<Value>, size: &[usize], depth: usize, out: &mut Vec<Value>) -> Result<()> {
    if items.len() != size[depth] {
        return Err(ragged(size, depth, items.len()));
    }
    let last = depth + 1 == size.len();
    for item in items {
        match (item, last) {
            (Value::Array(inner), false) => flatten_into(inner, size, depth + 1, out)?,
            (leaf, true) if !leaf.is_collection() => out.push(leaf),
            // a leaf above the innermost level, or an array below it
            _ => return Err(ragged(size, depth, 0)),
        }
    }
    Ok(())
}

fn nest(data: &[Value], size: &[usize]) -> Value {
    if size.len() == 1 {
        return Value::Array(data.to_vec());
    }
    let chunk = data.len() / size[0];
    Value::Array(data.chunks(chunk).map(|c| nest(c, &size[1..])).collect())
}
