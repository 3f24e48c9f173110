//! The injectables context.
//!
//! Injectables are named values registered on the client and referenced by
//! resolver closures at request time — auth tokens, tenant ids, locale and
//! the like. Each entry is either a literal or a zero-argument resolver;
//! [`Injectables::resolve`] flattens the set into plain literals.
//!
//! The set accumulates: merging a partial set overrides same-named keys and
//! keeps the rest. Resolver closures are assumed idempotent; they may be
//! invoked more than once per request.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

/// A flattened injectables snapshot: every resolver invoked, every literal
/// passed through.
pub type ResolvedInjectables = IndexMap<String, Value>;

/// A single injectable entry: a literal or a zero-argument resolver.
#[derive(Clone)]
pub enum Injectable {
    Value(Value),
    Resolver(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl Injectable {
    /// Create an injectable from a resolver closure.
    pub fn from_fn<F>(resolver: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Injectable::Resolver(Arc::new(resolver))
    }

    /// Resolve to a literal.
    pub fn resolve(&self) -> Value {
        match self {
            Injectable::Value(value) => value.clone(),
            Injectable::Resolver(resolver) => resolver(),
        }
    }
}

impl fmt::Debug for Injectable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Injectable::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Injectable::Resolver(_) => f.debug_tuple("Resolver").finish(),
        }
    }
}

impl<T: Into<Value>> From<T> for Injectable {
    fn from(value: T) -> Self {
        Injectable::Value(value.into())
    }
}

/// An insertion-ordered set of injectables.
#[derive(Debug, Clone, Default)]
pub struct Injectables {
    entries: IndexMap<String, Injectable>,
}

impl Injectables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any existing entry with the same name.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let injectables = Injectables::new()
    ///     .set("locale", "en")
    ///     .set("token", Injectable::from_fn(|| current_token().into()));
    /// ```
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Injectable>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Add an entry in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Injectable>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Merge another set into this one; later values override same-named
    /// keys, overridden keys keep their original position.
    pub fn merge(&mut self, partial: Injectables) {
        for (name, value) in partial.entries {
            self.entries.insert(name, value);
        }
    }

    /// Flatten into literals: invoke every resolver, pass literals through.
    pub fn resolve(&self) -> ResolvedInjectables {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
