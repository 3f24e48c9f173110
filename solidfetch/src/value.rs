//! Literal and dynamic values.
//!
//! Everything the builder interpolates — path slots, query values, header
//! values, body fields — is either a [`Value`] (a plain literal) or a
//! [`Dynamic`] (a closure resolved against the injectables context at call
//! time). Resolution is one level deep: a resolver's output is used as-is
//! and never re-resolved.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::inject::ResolvedInjectables;

/// A fully resolved literal value.
///
/// Renders to a bare string for URL and header positions: strings are
/// emitted unquoted, booleans as `true`/`false`, and null as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Render the value as it appears in a URL or header.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::Number(n.into()),
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
        }
    }
}

/// A value that may be resolved lazily against the injectables context.
///
/// Either a literal [`Value`] or a one-argument resolver closure receiving
/// the resolved injectables. Anything convertible to a `Value` converts to
/// a `Dynamic`; use [`Dynamic::from_fn`] for resolvers.
#[derive(Clone)]
pub enum Dynamic {
    Value(Value),
    Resolver(Arc<dyn Fn(&ResolvedInjectables) -> Value + Send + Sync>),
}

impl Dynamic {
    /// Create a dynamic value from a resolver closure.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let token = Dynamic::from_fn(|inj| inj["token"].clone());
    /// ```
    pub fn from_fn<F>(resolver: F) -> Self
    where
        F: Fn(&ResolvedInjectables) -> Value + Send + Sync + 'static,
    {
        Dynamic::Resolver(Arc::new(resolver))
    }

    /// Resolve to a literal: invoke the closure, or pass the literal through.
    pub fn resolve(&self, injectables: &ResolvedInjectables) -> Value {
        match self {
            Dynamic::Value(value) => value.clone(),
            Dynamic::Resolver(resolver) => resolver(injectables),
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Dynamic::Resolver(_) => f.debug_tuple("Resolver").finish(),
        }
    }
}

impl From<Value> for Dynamic {
    fn from(value: Value) -> Self {
        Dynamic::Value(value)
    }
}

impl From<&str> for Dynamic {
    fn from(s: &str) -> Self {
        Dynamic::Value(s.into())
    }
}

impl From<String> for Dynamic {
    fn from(s: String) -> Self {
        Dynamic::Value(s.into())
    }
}

impl From<bool> for Dynamic {
    fn from(b: bool) -> Self {
        Dynamic::Value(b.into())
    }
}

impl From<i64> for Dynamic {
    fn from(n: i64) -> Self {
        Dynamic::Value(n.into())
    }
}

impl From<i32> for Dynamic {
    fn from(n: i32) -> Self {
        Dynamic::Value(n.into())
    }
}

impl From<f64> for Dynamic {
    fn from(n: f64) -> Self {
        Dynamic::Value(n.into())
    }
}

/// Resolve a sequence of dynamic values, preserving order.
pub fn resolve_seq(values: &[Dynamic], injectables: &ResolvedInjectables) -> Vec<Value> {
    values.iter().map(|v| v.resolve(injectables)).collect()
}

/// Resolve a keyed mapping of dynamic values, preserving keys and order.
pub fn resolve_map(
    values: &IndexMap<String, Dynamic>,
    injectables: &ResolvedInjectables,
) -> IndexMap<String, Value> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), v.resolve(injectables)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_render() {
        assert_eq!(Value::from("abc").render(), "abc");
        assert_eq!(Value::from(true).render(), "true");
        assert_eq!(Value::from(42i64).render(), "42");
        assert_eq!(Value::Null.render(), "null");
    }

    #[test]
    fn test_value_to_json() {
        let json: serde_json::Value = Value::from(42i64).into();
        assert_eq!(json, serde_json::json!(42));

        let json: serde_json::Value = Value::Null.into();
        assert!(json.is_null());
    }

    #[test]
    fn test_dynamic_literal_passes_through() {
        let resolved = ResolvedInjectables::new();
        let value = Dynamic::from("literal").resolve(&resolved);
        assert_eq!(value, Value::from("literal"));
    }

    #[test]
    fn test_dynamic_resolver_sees_injectables() {
        let mut resolved = ResolvedInjectables::new();
        resolved.insert("id".to_owned(), Value::from("42"));

        let dynamic = Dynamic::from_fn(|inj| inj["id"].clone());
        assert_eq!(dynamic.resolve(&resolved), Value::from("42"));
    }

    #[test]
    fn test_resolve_map_preserves_order() {
        let resolved = ResolvedInjectables::new();
        let mut map = IndexMap::new();
        map.insert("b".to_owned(), Dynamic::from(1i64));
        map.insert("a".to_owned(), Dynamic::from(2i64));

        let out = resolve_map(&map, &resolved);
        let keys: Vec<_> = out.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_resolve_seq_mixed() {
        let mut resolved = ResolvedInjectables::new();
        resolved.insert("n".to_owned(), Value::from(7i64));

        let values = vec![Dynamic::from("x"), Dynamic::from_fn(|inj| inj["n"].clone())];
        let out = resolve_seq(&values, &resolved);
        assert_eq!(out, vec![Value::from("x"), Value::from(7i64)]);
    }
}
