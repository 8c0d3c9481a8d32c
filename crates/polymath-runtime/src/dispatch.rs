use crate::config::MathConfig;
use crate::signature::Signature;
use polymath_core::{MathError, Result, TypeTag, Value};
use std::collections::HashMap;
use tracing::{debug, trace};

pub type NativeFn = fn(&Dispatcher, &[Value]) -> Result<Value>;
pub type ConvertFn = fn(&Value) -> Value;

#[derive(Clone)]
struct Overload {
    signature: Signature,
    f: NativeFn,
}

#[derive(Clone)]
struct Conversion {
    from: TypeTag,
    to: TypeTag,
    f: ConvertFn,
}

/// Outcome of overload resolution for a list of operand types.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Position of the chosen overload in registration order
    pub index: usize,
    pub signature: Signature,
    /// Per operand, the type it must be converted to, if any
    pub conversions: Vec<Option<TypeTag>>,
}

impl Resolution {
    pub fn is_exact(&self) -> bool {
        self.conversions.iter().all(Option::is_none)
    }
}

/// Overload tables keyed by operation name.
///
/// Registration takes `&mut self`; once built, a dispatcher is only read, so
/// a shared `&Dispatcher` (or `Arc<Dispatcher>`) can serve calls from many
/// threads.
#[derive(Clone, Default)]
pub struct Dispatcher {
    ops: HashMap<String, Vec<Overload>>,
    conversions: Vec<Conversion>,
    config: MathConfig,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MathConfig) -> Self {
        Dispatcher { config, ..Self::default() }
    }

    pub fn config(&self) -> &MathConfig {
        &self.config
    }

    /// Appends an overload. Earlier registrations take priority, so exact
    /// signatures must come before permissive ones such as `"Array | Matrix, any"`.
    pub fn register(&mut self, name: &str, signature: &str, f: NativeFn) -> Result<()> {
        let signature = Signature::parse(signature)?;
        self.register_signature(name, signature, f);
        Ok(())
    }

    pub fn register_signature(&mut self, name: &str, signature: Signature, f: NativeFn) {
        self.ops.entry(name.to_string()).or_default().push(Overload { signature, f });
    }

    /// Conversions are only considered when no overload matches directly.
    pub fn add_conversion(&mut self, from: TypeTag, to: TypeTag, f: ConvertFn) {
        self.conversions.push(Conversion { from, to, f });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ops.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn signatures(&self, name: &str) -> Vec<String> {
        self.ops
            .get(name)
            .map(|list| list.iter().map(|o| o.signature.to_string()).collect())
            .unwrap_or_default()
    }

    fn conversion_to(&self, from: TypeTag, accept: impl Fn(TypeTag) -> bool) -> Option<&Conversion> {
        self.conversions.iter().find(|c| c.from == from && accept(c.to))
    }

    pub fn resolve(&self, name: &str, tags: &[TypeTag]) -> Result<Resolution> {
        let overloads = self.ops.get(name).ok_or_else(|| MathError::UnknownFunction(name.to_string()))?;

        for (index, o) in overloads.iter().enumerate() {
            if o.signature.matches(tags) {
                return Ok(Resolution {
                    index,
                    signature: o.signature.clone(),
                    conversions: vec![None; tags.len()],
                });
            }
        }

        if !self.conversions.is_empty() {
            for (index, o) in overloads.iter().enumerate() {
                if o.signature.arity() != tags.len() {
                    continue;
                }
                let planned: Option<Vec<Option<TypeTag>>> = o
                    .signature
                    .params()
                    .iter()
                    .zip(tags)
                    .map(|(param, tag)| {
                        if param.admits(*tag) {
                            Some(None)
                        } else {
                            self.conversion_to(*tag, |to| param.admits(to)).map(|c| Some(c.to))
                        }
                    })
                    .collect();
                if let Some(conversions) = planned {
                    debug!(op = name, signature = %o.signature, "resolved with conversions");
                    return Ok(Resolution { index, signature: o.signature.clone(), conversions });
                }
            }
        }

        Err(MathError::NoMatchingOverload {
            op: name.to_string(),
            types: tags.iter().map(|t| t.name().to_string()).collect(),
            candidates: overloads.iter().map(|o| o.signature.to_string()).collect(),
        })
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let tags: Vec<TypeTag> = args.iter().map(Value::type_tag).collect();
        let resolution = self.resolve(name, &tags)?;
        trace!(op = name, signature = %resolution.signature, "dispatch");
        let f = self.ops[name][resolution.index].f;
        if resolution.is_exact() {
            return f(self, args);
        }
        let converted: Vec<Value> = args
            .iter()
            .zip(&resolution.conversions)
            .map(|(arg, target)| match target {
                Some(to) => self.convert(arg, *to),
                None => arg.clone(),
            })
            .collect();
        f(self, &converted)
    }

    fn convert(&self, value: &Value, to: TypeTag) -> Value {
        let from = value.type_tag();
        match self.conversion_to(from, |t| t == to) {
            Some(c) => (c.f)(value),
            None => value.clone(),
        }
    }

    /// One line per overload of `name` describing whether it accepts `args`.
    pub fn explain(&self, name: &str, args: &[Value]) -> Vec<String> {
        let tags: Vec<TypeTag> = args.iter().map(Value::type_tag).collect();
        let chosen = self.resolve(name, &tags).ok().map(|r| r.index);
        let Some(overloads) = self.ops.get(name) else {
            return vec![format!("{name}: no overloads registered")];
        };
        overloads
            .iter()
            .enumerate()
            .map(|(i, o)| {
                let verdict = if chosen == Some(i) {
                    "selected".to_string()
                } else if o.signature.arity() != tags.len() {
                    format!("expects {} argument(s), got {}", o.signature.arity(), tags.len())
                } else {
                    match o.signature.params().iter().zip(&tags).position(|(p, t)| !p.admits(*t)) {
                        Some(pos) => {
                            format!("argument {} is {}, expected {}", pos + 1, tags[pos], o.signature.params()[pos])
                        }
                        None => "shadowed by an earlier overload".to_string(),
                    }
                };
                format!("{name}({}): {verdict}", o.signature)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first(_: &Dispatcher, _: &[Value]) -> Result<Value> {
        Ok(Value::from("first"))
    }

    fn second(_: &Dispatcher, _: &[Value]) -> Result<Value> {
        Ok(Value::from("second"))
    }

    fn echo(_: &Dispatcher, args: &[Value]) -> Result<Value> {
        Ok(Value::Array(args.to_vec()))
    }

    fn to_complex(v: &Value) -> Value {
        match v {
            Value::Num(x) => Value::complex(*x, 0.0),
            other => other.clone(),
        }
    }

    #[test]
    fn registration_order_breaks_ties() {
        let mut d = Dispatcher::new();
        d.register("f", "number, any", first).unwrap();
        d.register("f", "number, number", second).unwrap();
        assert_eq!(d.call("f", &[Value::Num(1.0), Value::Num(2.0)]).unwrap(), Value::from("first"));
    }

    #[test]
    fn union_positions_match_any_member() {
        let mut d = Dispatcher::new();
        d.register("f", "number | Decimal", first).unwrap();
        d.register("f", "Array | Matrix", second).unwrap();
        assert_eq!(d.call("f", &[Value::Num(1.0)]).unwrap(), Value::from("first"));
        assert_eq!(d.call("f", &[Value::numbers([1.0])]).unwrap(), Value::from("second"));
    }

    #[test]
    fn zero_arity_signature() {
        let mut d = Dispatcher::new();
        d.register("f", "", first).unwrap();
        d.register("f", "number", second).unwrap();
        assert_eq!(d.call("f", &[]).unwrap(), Value::from("first"));
    }

    #[test]
    fn no_match_names_types_and_candidates() {
        let mut d = Dispatcher::new();
        d.register("f", "number, number", first).unwrap();
        let err = d.call("f", &[Value::Num(1.0), Value::from("x")]).unwrap_err();
        assert_eq!(
            err,
            MathError::NoMatchingOverload {
                op: "f".into(),
                types: vec!["number".into(), "string".into()],
                candidates: vec!["number, number".into()],
            }
        );
        assert_eq!(err.to_string(), "no matching overload for f(number, string); candidates: number, number");
    }

    #[test]
    fn unknown_function() {
        let d = Dispatcher::new();
        assert_eq!(d.call("nope", &[]).unwrap_err(), MathError::UnknownFunction("nope".into()));
    }

    #[test]
    fn conversions_are_a_last_resort() {
        let mut d = Dispatcher::new();
        d.register("f", "Complex, Complex", echo).unwrap();
        d.register("f", "any, string", first).unwrap();
        assert!(d.call("f", &[Value::Num(1.0), Value::complex(0.0, 1.0)]).is_err());

        d.add_conversion(TypeTag::Number, TypeTag::Complex, to_complex);
        let out = d.call("f", &[Value::Num(1.0), Value::complex(0.0, 1.0)]).unwrap();
        assert_eq!(out, Value::array([Value::complex(1.0, 0.0), Value::complex(0.0, 1.0)]));

        let r = d.resolve("f", &[TypeTag::Number, TypeTag::Complex]).unwrap();
        assert_eq!(r.conversions, vec![Some(TypeTag::Complex), None]);
        assert!(!r.is_exact());
        // a direct match still wins over a conversion
        assert_eq!(d.call("f", &[Value::Num(1.0), Value::from("s")]).unwrap(), Value::from("first"));
    }

    #[test]
    fn explain_lists_every_overload() {
        let mut d = Dispatcher::new();
        d.register("f", "number, number", first).unwrap();
        d.register("f", "string", second).unwrap();
        d.register("f", "any, any", second).unwrap();
        let lines = d.explain("f", &[Value::Num(1.0), Value::from("x")]);
        assert_eq!(
            lines,
            vec![
                "f(number, number): argument 2 is string, expected number".to_string(),
                "f(string): expects 1 argument(s), got 2".to_string(),
                "f(any, any): selected".to_string(),
            ]
        );
    }

    #[test]
    fn dispatcher_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher>();
    }
}
