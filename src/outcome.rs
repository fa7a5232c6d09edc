use crate::thrown::Thrown;

/// Result of a dispatch whose raised value, if any, was caught.
///
/// A value that was raised but not caught never becomes an `Outcome`; it is
/// handed back through the `Err` side of the dispatch call instead.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    Success(T),
    Failure(Thrown),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Thrown> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(thrown) => Some(thrown),
        }
    }

    /// The `(error, value)` pair form: `(None, Some(v))` on success,
    /// `(Some(e), None)` on failure.
    pub fn into_pair(self) -> (Option<Thrown>, Option<T>) {
        match self {
            Outcome::Success(value) => (None, Some(value)),
            Outcome::Failure(thrown) => (Some(thrown), None),
        }
    }

    pub fn into_result(self) -> Result<T, Thrown> {
        self.into()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(thrown) => Outcome::Failure(thrown),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Thrown> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(thrown) => Err(thrown),
        }
    }
}
