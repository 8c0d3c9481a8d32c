//! Physical quantities.
//!
//! A [`Unit`] stores its magnitude in SI base units together with the
//! exponent vector of its base dimensions. The prefix and symbol it was
//! created with are display data only; two units are equal when their base
//! values and dimensions are.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    LuminousIntensity,
    AmountOfSubstance,
    Angle,
    Bit,
}

impl BaseDimension {
    pub const COUNT: usize = 9;

    fn index(self) -> usize {
        self as usize
    }
}

/// Exponents of each base dimension, e.g. velocity is length^1 time^-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimension(pub [i8; BaseDimension::COUNT]);

impl Dimension {
    pub fn of(base: BaseDimension) -> Self {
        let mut exps = [0; BaseDimension::COUNT];
        exps[base.index()] = 1;
        Dimension(exps)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prefix {
    None,
    Nano,
    Micro,
    Milli,
    Centi,
    Deci,
    Deca,
    Hecto,
    Kilo,
    Mega,
    Giga,
}

impl Prefix {
    const ALL: [Prefix; 11] = [
        Prefix::None,
        Prefix::Nano,
        Prefix::Micro,
        Prefix::Milli,
        Prefix::Centi,
        Prefix::Deci,
        Prefix::Deca,
        Prefix::Hecto,
        Prefix::Kilo,
        Prefix::Mega,
        Prefix::Giga,
    ];

    pub fn factor(self) -> f64 {
        match self {
            Prefix::None => 1.0,
            Prefix::Nano => 1e-9,
            Prefix::Micro => 1e-6,
            Prefix::Milli => 1e-3,
            Prefix::Centi => 1e-2,
            Prefix::Deci => 1e-1,
            Prefix::Deca => 1e1,
            Prefix::Hecto => 1e2,
            Prefix::Kilo => 1e3,
            Prefix::Mega => 1e6,
            Prefix::Giga => 1e9,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Prefix::None => "",
            Prefix::Nano => "n",
            Prefix::Micro => "u",
            Prefix::Milli => "m",
            Prefix::Centi => "c",
            Prefix::Deci => "d",
            Prefix::Deca => "da",
            Prefix::Hecto => "h",
            Prefix::Kilo => "k",
            Prefix::Mega => "M",
            Prefix::Giga => "G",
        }
    }

    /// Prefixes that are powers of 1000; the only ones chosen automatically.
    pub fn is_scientific(self) -> bool {
        !matches!(self, Prefix::Centi | Prefix::Deci | Prefix::Deca | Prefix::Hecto)
    }
}

/// A named unit: its symbol, its size in SI base units and its dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub symbol: &'static str,
    pub factor: f64,
    pub dimension: BaseDimension,
    pub prefixed: bool,
}

pub const UNITS: &[UnitDef] = &[
    UnitDef { symbol: "m", factor: 1.0, dimension: BaseDimension::Length, prefixed: true },
    UnitDef { symbol: "in", factor: 0.0254, dimension: BaseDimension::Length, prefixed: false },
    UnitDef { symbol: "g", factor: 1e-3, dimension: BaseDimension::Mass, prefixed: true },
    UnitDef { symbol: "s", factor: 1.0, dimension: BaseDimension::Time, prefixed: true },
    UnitDef { symbol: "A", factor: 1.0, dimension: BaseDimension::Current, prefixed: true },
    UnitDef { symbol: "K", factor: 1.0, dimension: BaseDimension::Temperature, prefixed: true },
    UnitDef { symbol: "cd", factor: 1.0, dimension: BaseDimension::LuminousIntensity, prefixed: true },
    UnitDef { symbol: "mol", factor: 1.0, dimension: BaseDimension::AmountOfSubstance, prefixed: true },
    UnitDef { symbol: "rad", factor: 1.0, dimension: BaseDimension::Angle, prefixed: true },
    UnitDef { symbol: "b", factor: 1.0, dimension: BaseDimension::Bit, prefixed: true },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Magnitude in SI base units; `None` for a bare unit such as `cm`.
    pub value: Option<f64>,
    pub dimension: Dimension,
    /// When set, display keeps `prefix` instead of choosing the best one.
    pub prefix_locked: bool,
    symbol: String,
    unit_factor: f64,
    prefixed: bool,
    prefix: Prefix,
}

impl Unit {
    /// `value` is given in the prefixed unit, e.g. `Unit::new(Some(5.0), Prefix::Centi, m)`.
    pub fn new(value: Option<f64>, prefix: Prefix, def: &UnitDef) -> Self {
        let prefix = if def.prefixed { prefix } else { Prefix::None };
        Unit {
            value: value.map(|v| v * prefix.factor() * def.factor),
            dimension: Dimension::of(def.dimension),
            prefix_locked: false,
            symbol: def.symbol.to_string(),
            unit_factor: def.factor,
            prefixed: def.prefixed,
            prefix,
        }
    }

    /// Looks `name` up in the built-in unit table, splitting off a prefix.
    pub fn from_symbol(value: Option<f64>, name: &str) -> Option<Unit> {
        if let Some(def) = UNITS.iter().find(|d| d.symbol == name) {
            return Some(Unit::new(value, Prefix::None, def));
        }
        Prefix::ALL.iter().filter(|p| **p != Prefix::None).find_map(|p| {
            let rest = name.strip_prefix(p.symbol())?;
            let def = UNITS.iter().find(|d| d.prefixed && d.symbol == rest)?;
            Some(Unit::new(value, *p, def))
        })
    }

    pub fn equal_base(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn lock_prefix(mut self) -> Self {
        self.prefix_locked = true;
        self
    }

    pub fn unit_name(&self) -> String {
        format!("{}{}", self.prefix.symbol(), self.symbol)
    }

    /// Prefix used for display: the stored one when locked, otherwise the
    /// scientific prefix that brings the shown number closest to ~16.
    pub fn display_prefix(&self) -> Prefix {
        let abs = match self.value {
            Some(v) if v != 0.0 && v.is_finite() => (v / self.unit_factor).abs(),
            _ => return self.prefix,
        };
        if self.prefix_locked || !self.prefixed {
            return self.prefix;
        }
        let score = |p: Prefix| ((abs / p.factor()).log10() - 1.2).abs();
        let mut best = self.prefix;
        let mut best_score = score(best);
        for p in Prefix::ALL.iter().copied().filter(|p| p.is_scientific()) {
            let s = score(p);
            if s < best_score || (s == best_score && p.symbol().len() < best.symbol().len()) {
                best = p;
                best_score = s;
            }
        }
        best
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.dimension == other.dimension
    }
}

fn trim_float_noise(x: f64) -> f64 {
    format!("{x:.13e}").parse::<f64>().unwrap_or(x)
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.display_prefix();
        let name = format!("{}{}", prefix.symbol(), self.symbol);
        match self.value {
            Some(v) => {
                let shown = trim_float_noise(v / (prefix.factor() * self.unit_factor));
                write!(f, "{shown} {name}")
            }
            None => write!(f, "{name}"),
        }
    }
}
