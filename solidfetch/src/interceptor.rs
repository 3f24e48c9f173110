//! Interceptor chains.
//!
//! Three independent chains run around every call: request interceptors
//! before the transport is invoked, response interceptors after a
//! successful response, and error interceptors after a failure. Each chain
//! is an ordered list folded left-to-right: an interceptor returning
//! `Some(v)` replaces the accumulator for the next step, `None` keeps it.
//!
//! `None` is the only pass-through sentinel — any `Some` value replaces the
//! accumulator, including values that would be "falsy" elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use solidfetch::{Interceptor, RequestParts};
//!
//! let trace = Interceptor::new("trace-header", |req: &RequestParts| {
//!     let mut req = req.clone();
//!     req.headers.insert("x-trace-id", "abc123".parse().unwrap());
//!     Some(req)
//! });
//!
//! let client = Client::builder()
//!     .request_interceptor(trace)
//!     .build()?;
//! ```

use std::fmt;
use std::sync::Arc;

/// A single step in an interceptor chain over values of type `T`.
///
/// Closures `Fn(&T) -> Option<T> + Send + Sync` implement this directly;
/// use [`Interceptor::new`] to attach a name for trace output.
pub trait Intercept<T>: Send + Sync {
    /// Inspect the accumulator and optionally replace it.
    fn action(&self, input: &T) -> Option<T>;

    /// Name used in trace events.
    fn name(&self) -> &str {
        "anonymous"
    }
}

impl<T, F> Intercept<T> for F
where
    F: Fn(&T) -> Option<T> + Send + Sync,
{
    fn action(&self, input: &T) -> Option<T> {
        self(input)
    }
}

/// A named interceptor wrapping a closure.
pub struct Interceptor<F> {
    name: String,
    action: F,
}

impl<F> Interceptor<F> {
    pub fn new(name: impl Into<String>, action: F) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

impl<F: Clone> Clone for Interceptor<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            action: self.action.clone(),
        }
    }
}

impl<F> fmt::Debug for Interceptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .finish()
    }
}

impl<T, F> Intercept<T> for Interceptor<F>
where
    F: Fn(&T) -> Option<T> + Send + Sync,
{
    fn action(&self, input: &T) -> Option<T> {
        (self.action)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered chain of interceptors applied as a left-to-right fold.
pub struct Chain<T> {
    steps: Vec<Arc<dyn Intercept<T>>>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append an interceptor to the end of the chain.
    pub fn push(&mut self, step: Arc<dyn Intercept<T>>) {
        self.steps.push(step);
    }

    /// Builder-style [`push`](Chain::push).
    pub fn with(mut self, step: impl Intercept<T> + 'static) -> Self {
        self.push(Arc::new(step));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Fold the chain over `init`: each step's `Some` output becomes the
    /// next step's input, `None` keeps the accumulator.
    pub fn apply(&self, init: T) -> T {
        let mut acc = init;
        for step in &self.steps {
            if let Some(next) = step.action(&acc) {
                #[cfg(feature = "tracing")]
                tracing::trace!(interceptor = step.name(), "interceptor replaced value");
                acc = next;
            }
        }
        acc
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<T> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("len", &self.steps.len()).finish()
    }
}
