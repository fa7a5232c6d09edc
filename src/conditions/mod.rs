use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::class::Class;
use crate::errors::{CatchError, Result};
use crate::thrown::Thrown;

type Predicate = dyn Fn(&Thrown) -> bool + Send + Sync;

/// A named, pure test deciding whether a raised value should be caught.
///
/// Conditions hold no per-call state, so one value can be cloned into as
/// many dispatches as needed.
#[derive(Clone)]
pub struct CatchCondition {
    name: Cow<'static, str>,
    test: Arc<Predicate>,
}

impl CatchCondition {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, test: F) -> Self
    where
        F: Fn(&Thrown) -> bool + Send + Sync + 'static,
    {
        Self { name: name.into(), test: Arc::new(test) }
    }

    /// Builds a condition named after the function item passed in, so
    /// `from_fn(is_null_thrown)` is called `is_null_thrown`. Function
    /// pointers and closures are named `anonymous`.
    pub fn from_fn<F>(test: F) -> Self
    where
        F: Fn(&Thrown) -> bool + Send + Sync + 'static,
    {
        let full = std::any::type_name::<F>();
        let short = full.rsplit("::").next().unwrap_or(full);
        // fn pointers and closures have no usable item name
        let is_ident = short.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
            && short.chars().all(|c| c.is_alphanumeric() || c == '_');
        if is_ident {
            Self::new(short.to_string(), test)
        } else {
            Self::new("anonymous", test)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, thrown: &Thrown) -> bool {
        (self.test)(thrown)
    }
}

impl fmt::Debug for CatchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CatchCondition").field(&self.name).finish()
    }
}

/// Condition matching instances of `class` or of any class extending it.
/// Every other value, primitives included, yields false.
pub fn make_instance_of_condition(class: &Class) -> CatchCondition {
    let target = class.clone();
    CatchCondition::new(
        format!("instance_of({})", class.name()),
        move |thrown| thrown.as_instance().is_some_and(|i| i.is_instance_of(&target)),
    )
}

/// Condition matching instances whose class is exactly `class`; instances of
/// subclasses are rejected.
pub fn make_exact_type_condition(class: &Class) -> CatchCondition {
    let target = class.id();
    CatchCondition::new(
        format!("exact_type({})", class.name()),
        move |thrown| thrown.class().is_some_and(|c| c.id() == target),
    )
}

/// Name-indexed set of conditions. Clones share storage until modified.
#[derive(Clone, Default)]
pub struct ConditionRegistry {
    inner: Arc<HashMap<String, CatchCondition>>,
}

impl ConditionRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut map: HashMap<String, CatchCondition> = HashMap::new();
        for (name, test) in builtins::ALL {
            map.insert((*name).to_string(), CatchCondition::new(*name, *test));
        }
        Self { inner: Arc::new(map) }
    }

    /// Adds `condition` under its own name, replacing any previous entry.
    pub fn register(&mut self, condition: CatchCondition) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(condition.name().to_string(), condition);
    }

    pub fn get(&self, name: &str) -> Option<CatchCondition> {
        self.inner.get(name).cloned()
    }

    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<CatchCondition>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name).ok_or_else(|| CatchError::UnknownCondition(name.to_string()))
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Built-in classifications of raised values.
pub mod builtins {
    use crate::class::Class;
    use crate::thrown::Thrown;

    pub(crate) const ALL: &[(&str, fn(&Thrown) -> bool)] = &[
        ("is_array_thrown", is_array_thrown),
        ("is_big_int_thrown", is_big_int_thrown),
        ("is_boolean_thrown", is_boolean_thrown),
        ("is_error_thrown", is_error_thrown),
        ("is_function_thrown", is_function_thrown),
        ("is_instance_of_error_thrown", is_instance_of_error_thrown),
        ("is_null_thrown", is_null_thrown),
        ("is_number_thrown", is_number_thrown),
        ("is_object_thrown", is_object_thrown),
        ("is_string_thrown", is_string_thrown),
        ("is_symbol_thrown", is_symbol_thrown),
        ("is_type_of_object_thrown", is_type_of_object_thrown),
        ("is_undefined_thrown", is_undefined_thrown),
    ];

    pub fn is_array_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Array(_))
    }

    pub fn is_big_int_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::BigInt(_))
    }

    pub fn is_boolean_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Bool(_))
    }

    /// Only a plain `Error`; `TypeError` and user subclasses do not count.
    pub fn is_error_thrown(thrown: &Thrown) -> bool {
        thrown.class().is_some_and(|c| c == Class::error())
    }

    pub fn is_function_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Function(_))
    }

    /// Any member of the error family, subclasses included.
    pub fn is_instance_of_error_thrown(thrown: &Thrown) -> bool {
        thrown.class().is_some_and(Class::is_error_class)
    }

    pub fn is_null_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Null)
    }

    pub fn is_number_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Number(_))
    }

    /// Plain objects only: arrays and class instances are excluded.
    pub fn is_object_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Object(_))
    }

    pub fn is_string_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::String(_))
    }

    pub fn is_symbol_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Symbol(_))
    }

    /// Any non-null structured value: arrays, plain objects and instances.
    pub fn is_type_of_object_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Array(_) | Thrown::Object(_) | Thrown::Instance(_))
    }

    pub fn is_undefined_thrown(thrown: &Thrown) -> bool {
        matches!(thrown, Thrown::Undefined)
    }
}
