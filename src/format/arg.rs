// src/format/arg.rs

//! Positional log arguments.

use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

/// One positional argument of a debug call.
///
/// Values are captured eagerly when the argument is built so that rendering
/// never needs to reach back into caller-owned data.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A serializable value, captured as JSON.
    Json(Value),
    /// A value captured through its `Debug` impl, compact and pretty forms.
    Debug { compact: String, pretty: String },
    /// An error and its `source()` chain, outermost first.
    Error(Vec<String>),
    /// A value whose serialization failed; holds the serializer's message.
    Unserializable(String),
}

impl Arg {
    /// Captures any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Arg::Json(value),
            Err(err) => Arg::Unserializable(err.to_string()),
        }
    }

    /// Captures a value through its `Debug` impl.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Arg::Debug {
            compact: format!("{:?}", value),
            pretty: format!("{:#?}", value),
        }
    }

    /// Captures an error with its source chain.
    pub fn error(err: &(dyn StdError + 'static)) -> Self {
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Arg::Error(chain)
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Arg::Str(_))
    }

    /// Generic stringification. Errors render as their message followed by
    /// their causes, one per line.
    pub fn coerce(&self) -> String {
        match self {
            Arg::Null => "null".to_owned(),
            Arg::Bool(b) => b.to_string(),
            Arg::Int(i) => i.to_string(),
            Arg::Float(f) => f.to_string(),
            Arg::Str(s) => s.clone(),
            Arg::Json(Value::String(s)) => s.clone(),
            Arg::Json(value) => value.to_string(),
            Arg::Debug { compact, .. } => compact.clone(),
            Arg::Error(chain) => chain.join("\n    caused by: "),
            Arg::Unserializable(err) => format!("[Unserializable: {}]", err),
        }
    }

    /// JSON text for `%j`. Fails only for values that could not be
    /// serialized when they were captured.
    pub fn to_json(&self) -> Result<String, String> {
        let text = match self {
            Arg::Null => "null".to_owned(),
            Arg::Bool(b) => b.to_string(),
            Arg::Int(i) => i.to_string(),
            Arg::Float(f) => serde_json::to_string(f).map_err(|e| e.to_string())?,
            Arg::Str(s) => Value::from(s.as_str()).to_string(),
            Arg::Json(value) => value.to_string(),
            Arg::Debug { compact, .. } => Value::from(compact.as_str()).to_string(),
            Arg::Error(chain) => serde_json::json!({ "message": chain.first() }).to_string(),
            Arg::Unserializable(err) => return Err(err.clone()),
        };
        Ok(text)
    }

    /// Structural dump for `%o` (single line) and `%O` (multi-line).
    pub fn inspect(&self, multiline: bool) -> String {
        let pretty = match self {
            Arg::Str(s) => return format!("'{}'", s),
            Arg::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Arg::Debug { pretty, .. } => pretty.clone(),
            other => other.coerce(),
        };
        if multiline {
            pretty
        } else {
            pretty
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_owned())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<char> for Arg {
    fn from(c: char) -> Self {
        Arg::Str(c.to_string())
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    match i64::try_from(v) {
                        Ok(i) => Arg::Int(i),
                        Err(_) => Arg::Float(v as f64),
                    }
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize);

impl From<f32> for Arg {
    fn from(f: f32) -> Self {
        Arg::Float(f64::from(f))
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Json(value)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("request failed")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_coerce_primitives() {
        assert_eq!(Arg::from(42).coerce(), "42");
        assert_eq!(Arg::from(1.5).coerce(), "1.5");
        assert_eq!(Arg::from(true).coerce(), "true");
        assert_eq!(Arg::from(None::<i32>).coerce(), "null");
        assert_eq!(Arg::from("plain").coerce(), "plain");
        assert_eq!(Arg::from(json!({"a": 1})).coerce(), r#"{"a":1}"#);
    }

    #[test]
    fn test_error_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "socket closed"));
        let arg = Arg::error(&err);
        assert_eq!(
            arg,
            Arg::Error(vec!["request failed".to_owned(), "socket closed".to_owned()])
        );
        assert_eq!(arg.coerce(), "request failed\n    caused by: socket closed");
    }

    #[test]
    fn test_unserializable_values() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not JSON");
        let arg = Arg::json(&map);
        assert!(matches!(arg, Arg::Unserializable(_)));
        assert!(arg.to_json().is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Arg::json(&json!({"a": 1})).to_json().unwrap(), r#"{"a":1}"#);
        assert_eq!(Arg::from("hi").to_json().unwrap(), r#""hi""#);
        assert_eq!(Arg::from(f64::NAN).to_json().unwrap(), "null");
    }

    #[test]
    fn test_inspect_single_and_multi_line() {
        let arg = Arg::json(&json!({"name": "test", "value": 123}));
        let multi = arg.inspect(true);
        assert!(multi.contains('\n'));
        let single = arg.inspect(false);
        assert!(!single.contains('\n'));
        assert!(single.contains(r#""name": "test""#));

        assert_eq!(Arg::from("s").inspect(false), "'s'");
    }

    #[test]
    fn test_debug_capture() {
        let arg = Arg::debug(&vec![1, 2]);
        assert_eq!(arg.coerce(), "[1, 2]");
        assert_eq!(arg.inspect(false), "[ 1, 2, ]");
    }
}
