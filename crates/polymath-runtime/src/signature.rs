//! Overload signatures in typed-function notation.
//!
//! `"number, Decimal"`, `"Array | Matrix, any"`, and `""` (no parameters)
//! are all valid signatures. Each position is a [`TypeSet`].

use polymath_core::{MathError, Result, TypeTag};
use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeSet: u16 {
        const NUMBER  = 0b000_0001;
        const DECIMAL = 0b000_0010;
        const COMPLEX = 0b000_0100;
        const UNIT    = 0b000_1000;
        const STRING  = 0b001_0000;
        const ARRAY   = 0b010_0000;
        const MATRIX  = 0b100_0000;
        const COLLECTION = Self::ARRAY.bits() | Self::MATRIX.bits();
        const ANY = Self::NUMBER.bits()
            | Self::DECIMAL.bits()
            | Self::COMPLEX.bits()
            | Self::UNIT.bits()
            | Self::STRING.bits()
            | Self::COLLECTION.bits();
    }
}

impl TypeSet {
    pub fn of(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Number => TypeSet::NUMBER,
            TypeTag::Decimal => TypeSet::DECIMAL,
            TypeTag::Complex => TypeSet::COMPLEX,
            TypeTag::Unit => TypeSet::UNIT,
            TypeTag::String => TypeSet::STRING,
            TypeTag::Array => TypeSet::ARRAY,
            TypeTag::Matrix => TypeSet::MATRIX,
        }
    }

    pub fn admits(&self, tag: TypeTag) -> bool {
        self.contains(TypeSet::of(tag))
    }

    pub fn tags(&self) -> impl Iterator<Item = TypeTag> + '_ {
        TypeTag::ALL.into_iter().filter(move |t| self.admits(*t))
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == TypeSet::ANY {
            return f.write_str("any");
        }
        let names: Vec<&str> = self.tags().map(TypeTag::name).collect();
        f.write_str(&names.join(" | "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    params: Vec<TypeSet>,
}

impl Signature {
    pub fn new(params: Vec<TypeSet>) -> Self {
        Signature { params }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: String| MathError::InvalidSignature { signature: text.to_string(), reason };
        if text.trim().is_empty() {
            return Ok(Signature::new(Vec::new()));
        }
        let mut params = Vec::new();
        for param in text.split(',') {
            let mut set = TypeSet::empty();
            for name in param.split('|').map(str::trim) {
                if name.is_empty() {
                    return Err(invalid("empty type name".into()));
                }
                if name == "any" {
                    set |= TypeSet::ANY;
                    continue;
                }
                let tag = TypeTag::from_name(name).ok_or_else(|| invalid(format!("unknown type '{name}'")))?;
                set |= TypeSet::of(tag);
            }
            params.push(set);
        }
        Ok(Signature::new(params))
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[TypeSet] {
        &self.params
    }

    /// True when every position admits the corresponding tag.
    pub fn matches(&self, tags: &[TypeTag]) -> bool {
        self.params.len() == tags.len() && self.params.iter().zip(tags).all(|(p, t)| p.admits(*t))
    }
}

impl FromStr for Signature {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        Signature::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}
