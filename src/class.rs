use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque tag identifying one class. Two handles describe the same class iff
/// their ids are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

struct ClassInner {
    id: ClassId,
    name: String,
    parent: Option<Class>,
}

/// A class in a single-inheritance hierarchy.
///
/// Handles are cheap to clone. Subclasses are created with [`Class::extend`];
/// the hierarchy is fixed at creation time, so the ancestor chain of a class
/// never changes.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

impl Class {
    /// A new root class with no parent.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parent(name.into(), None)
    }

    /// A new class that inherits from `self`.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self::with_parent(name.into(), Some(self.clone()))
    }

    fn with_parent(name: String, parent: Option<Class>) -> Self {
        let id = ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed));
        Class(Arc::new(ClassInner { id, name, parent }))
    }

    pub fn id(&self) -> ClassId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// This class followed by each of its ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// True when `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|c| c.id() == other.id())
    }

    /// True when `self` belongs to the built-in error family.
    pub fn is_error_class(&self) -> bool {
        self.is_subclass_of(Class::error())
    }

    /// The built-in `Error` class, root of the error family.
    pub fn error() -> &'static Class {
        &builtins().error
    }

    pub fn type_error() -> &'static Class {
        &builtins().type_error
    }

    pub fn range_error() -> &'static Class {
        &builtins().range_error
    }

    pub fn syntax_error() -> &'static Class {
        &builtins().syntax_error
    }

    pub fn reference_error() -> &'static Class {
        &builtins().reference_error
    }

    pub fn eval_error() -> &'static Class {
        &builtins().eval_error
    }

    pub fn uri_error() -> &'static Class {
        &builtins().uri_error
    }

    pub fn aggregate_error() -> &'static Class {
        &builtins().aggregate_error
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.0.id.0)
            .field("name", &self.0.name)
            .field("parent", &self.parent().map(Class::name))
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

struct Builtins {
    error: Class,
    type_error: Class,
    range_error: Class,
    syntax_error: Class,
    reference_error: Class,
    eval_error: Class,
    uri_error: Class,
    aggregate_error: Class,
}

fn builtins() -> &'static Builtins {
    static BUILTINS: OnceLock<Builtins> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        let error = Class::new("Error");
        Builtins {
            type_error: error.extend("TypeError"),
            range_error: error.extend("RangeError"),
            syntax_error: error.extend("SyntaxError"),
            reference_error: error.extend("ReferenceError"),
            eval_error: error.extend("EvalError"),
            uri_error: error.extend("URIError"),
            aggregate_error: error.extend("AggregateError"),
            error,
        }
    })
}
