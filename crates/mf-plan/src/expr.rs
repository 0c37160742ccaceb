//! Building blocks of mapping-language expressions

use serde_json::Value;
use std::fmt;

/// Quote a column name for `root.` / `this.` paths.
///
/// Embedded `"` and `\` are backslash-escaped.
pub fn quote_column(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// `this."<column>"`, the column's incoming value
pub fn this_column(name: &str) -> String {
    format!("this.{}", quote_column(name))
}

/// `root."<column>" = <expr>`
pub fn assignment(column: &str, expr: &str) -> String {
    format!("root.{} = {}", quote_column(column), expr)
}

/// A double-quoted string literal
pub fn string_literal(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// A list of string literals, e.g. `["gmail.com","yahoo.com"]`
pub fn string_list(values: &[String]) -> String {
    Value::from(values.to_vec()).to_string()
}

/// Clamp `[min, max]` against a column's maximum character length.
///
/// Only positive lengths clamp: `max` drops to the length, then `min` to `max`.
pub fn clamp_range(min: i64, max: i64, max_length: Option<i64>) -> (i64, i64) {
    match max_length {
        Some(len) if len > 0 => {
            let max = max.min(len);
            (min.min(max), max)
        }
        _ => (min, max),
    }
}

/// A named function call with `name:value` arguments
#[derive(Debug, Clone)]
pub struct FunctionCall {
    name: &'static str,
    args: Vec<(&'static str, String)>,
}

impl FunctionCall {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append an argument rendered with `Display`
    pub fn arg(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.args.push((key, value.to_string()));
        self
    }

    /// Append an argument only when present
    pub fn opt_arg<T: fmt::Display>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.arg(key, v),
            None => self,
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (key, value)) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}:{value}")?;
        }
        f.write_str(")")
    }
}
