use crate::value::Value;

pub fn format_value(v: &Value) -> String {
    match v {
        Value::Num(x) => x.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Complex(z) => z.to_string(),
        Value::Unit(u) => u.to_string(),
        Value::Str(s) => format!("\"{}\"", s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Matrix(m) => format_value(&m.value_of()),
    }
}
