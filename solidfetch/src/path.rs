//! Path templates and URL construction.
//!
//! A [`PathTemplate`] is an ordered sequence of literal segments with
//! dynamic slots between them. Templates are rendered eagerly when an
//! endpoint is created; the query string is appended per call from the
//! merged query mapping.

use indexmap::IndexMap;

use crate::inject::ResolvedInjectables;
use crate::value::{Dynamic, Value};

/// A URL path with interpolation slots.
///
/// # Example
///
/// ```ignore
/// // "/users/{id}/posts" with `id` pulled from the injectables
/// let template = PathTemplate::new("/users/")
///     .slot(Dynamic::from_fn(|inj| inj["id"].clone()))
///     .lit("/posts");
/// ```
///
/// A plain string converts into a slotless template.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    head: String,
    tail: Vec<(Dynamic, String)>,
}

impl PathTemplate {
    /// Create a template from its leading literal segment.
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            tail: Vec::new(),
        }
    }

    /// Append an interpolation slot.
    pub fn slot(mut self, value: impl Into<Dynamic>) -> Self {
        self.tail.push((value.into(), String::new()));
        self
    }

    /// Append a literal segment.
    pub fn lit(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        match self.tail.last_mut() {
            Some((_, lit)) => lit.push_str(&segment),
            None => self.head.push_str(&segment),
        }
        self
    }

    /// Render the template: concatenate literal segments and resolved slot
    /// values in order.
    pub fn render(&self, injectables: &ResolvedInjectables) -> String {
        let mut path = self.head.clone();
        for (slot, lit) in &self.tail {
            path.push_str(&slot.resolve(injectables).render());
            path.push_str(lit);
        }
        path
    }
}

impl From<&str> for PathTemplate {
    fn from(path: &str) -> Self {
        PathTemplate::new(path)
    }
}

impl From<String> for PathTemplate {
    fn from(path: String) -> Self {
        PathTemplate::new(path)
    }
}

/// Append a serialized query mapping to a rendered path.
///
/// Pairs are emitted as `key=value` joined by `&`, in insertion order, with
/// values rendered as bare literals (no percent-encoding — callers own the
/// encoding of reserved characters, as in a raw fetch call). The prefix is
/// `''` when the path already ends in a bare `?`, `&` when the path carries
/// query parameters, and `?` otherwise. An empty mapping appends nothing.
pub(crate) fn append_query(path: &str, query: &IndexMap<String, Value>) -> String {
    if query.is_empty() {
        return path.to_owned();
    }

    let prefix = if path.ends_with('?') {
        ""
    } else if path.contains('?') {
        "&"
    } else {
        "?"
    };

    let pairs = query
        .iter()
        .map(|(key, value)| format!("{key}={}", value.render()))
        .collect::<Vec<_>>()
        .join("&");

    format!("{path}{prefix}{pairs}")
}
