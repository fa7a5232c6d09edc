use std::future::Future;

use tracing::{debug, trace};

use crate::conditions::{CatchCondition, ConditionRegistry};
use crate::errors::Result;
use crate::outcome::Outcome;
use crate::thrown::Thrown;

/// Runs callbacks and routes whatever they raise.
///
/// A raised value is caught when the dispatcher has no conditions, or when
/// at least one of its conditions matches. Caught values come back as
/// `Ok(Outcome::Failure(..))`; anything else is returned untouched as `Err`.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    conditions: Vec<CatchCondition>,
}

impl Dispatcher {
    /// A dispatcher that catches everything.
    pub fn new() -> Self { Self::default() }

    pub fn with_conditions(conditions: impl IntoIterator<Item = CatchCondition>) -> Self {
        Self { conditions: conditions.into_iter().collect() }
    }

    /// Looks each name up in `registry`.
    pub fn from_names<S: AsRef<str>>(registry: &ConditionRegistry, names: &[S]) -> Result<Self> {
        Ok(Self { conditions: registry.resolve(names)? })
    }

    pub fn catching(mut self, condition: CatchCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[CatchCondition] {
        &self.conditions
    }

    pub fn is_caught(&self, thrown: &Thrown) -> bool {
        is_caught(&self.conditions, thrown)
    }

    pub fn execute<T, F>(&self, callback: F) -> std::result::Result<Outcome<T>, Thrown>
    where
        F: FnOnce() -> std::result::Result<T, Thrown>,
    {
        execute(callback, &self.conditions)
    }

    pub fn execute_async<T, F, Fut>(
        &self,
        callback: F,
    ) -> impl Future<Output = std::result::Result<Outcome<T>, Thrown>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, Thrown>>,
    {
        execute_async(callback, &self.conditions)
    }
}

/// Invokes `callback` once and classifies its result synchronously.
///
/// `Ok(v)` becomes `Outcome::Success(v)`. A raised value becomes
/// `Outcome::Failure` when `conditions` is empty or one of them matches;
/// otherwise the very same value is returned as `Err`.
pub fn execute<T, F>(callback: F, conditions: &[CatchCondition]) -> std::result::Result<Outcome<T>, Thrown>
where
    F: FnOnce() -> std::result::Result<T, Thrown>,
{
    match callback() {
        Ok(value) => {
            trace!("callback returned a value");
            Ok(Outcome::Success(value))
        }
        Err(thrown) => route(conditions, thrown),
    }
}

/// Deferred counterpart of [`execute`].
///
/// `callback` is invoked right away; the returned future waits for the
/// future it produced and applies the same routing to its output. Nothing
/// blocks, and dropping the returned future drops the callback's future.
pub fn execute_async<T, F, Fut>(
    callback: F,
    conditions: &[CatchCondition],
) -> impl Future<Output = std::result::Result<Outcome<T>, Thrown>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, Thrown>>,
{
    let pending = callback();
    let conditions = conditions.to_vec();
    async move {
        match pending.await {
            Ok(value) => {
                trace!("deferred callback fulfilled");
                Ok(Outcome::Success(value))
            }
            Err(thrown) => route(&conditions, thrown),
        }
    }
}

/// True when `thrown` would be caught under `conditions`. Evaluation stops
/// at the first matching condition.
pub fn is_caught(conditions: &[CatchCondition], thrown: &Thrown) -> bool {
    conditions.is_empty() || conditions.iter().any(|c| c.matches(thrown))
}

fn route<T>(conditions: &[CatchCondition], thrown: Thrown) -> std::result::Result<Outcome<T>, Thrown> {
    if conditions.is_empty() {
        debug!(kind = ?thrown.kind(), "caught raised value, no conditions given");
        return Ok(Outcome::Failure(thrown));
    }
    match conditions.iter().find(|c| c.matches(&thrown)) {
        Some(condition) => {
            debug!(kind = ?thrown.kind(), condition = condition.name(), "caught raised value");
            Ok(Outcome::Failure(thrown))
        }
        None => {
            debug!(
                kind = ?thrown.kind(),
                conditions = conditions.len(),
                "no condition matched, propagating raised value"
            );
            Err(thrown)
        }
    }
}
