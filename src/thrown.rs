use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use num_bigint::BigInt;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::class::Class;
use crate::errors::{CatchError, Result};

// 2^53, past which f64 stops representing every integer
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Any value a callback can raise.
///
/// Primitive variants compare and copy by value. `Symbol`, `Array`,
/// `Object`, `Function` and `Instance` are shared handles that carry an
/// identity; see [`Thrown::is_same`].
#[derive(Clone, Debug, Default)]
pub enum Thrown {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Symbol(Symbol),
    Array(Arc<Vec<Thrown>>),
    /// A plain object: string keys, no class.
    Object(Arc<BTreeMap<String, Thrown>>),
    Function(Callable),
    Instance(Arc<Instance>),
}

/// `typeof`-style category of a [`Thrown`]. Unlike a script runtime, null
/// has its own kind instead of reporting `object`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrownKind {
    Undefined,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    Object,
    Function,
}

impl Thrown {
    /// An instance of the built-in `Error` class.
    pub fn error(message: impl Into<String>) -> Self {
        Thrown::instance(Class::error(), message)
    }

    /// An instance of `class` carrying `message`.
    pub fn instance(class: &Class, message: impl Into<String>) -> Self {
        Instance::new(class).with_message(message).into()
    }

    /// Wraps a Rust error as a plain `Error` instance with the same message.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Thrown::error(err.to_string())
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Thrown::Symbol(Symbol::new(Some(description.into())))
    }

    pub fn function<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Thrown]) -> Thrown + Send + Sync + 'static,
    {
        Thrown::Function(Callable::new(name, f))
    }

    pub fn array(items: impl IntoIterator<Item = Thrown>) -> Self {
        Thrown::Array(Arc::new(items.into_iter().collect()))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Thrown)>) -> Self {
        Thrown::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Parses a decimal integer literal, with an optional trailing `n`.
    pub fn parse_big_int(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let digits = trimmed.strip_suffix('n').unwrap_or(trimmed);
        BigInt::from_str(digits)
            .map(Thrown::BigInt)
            .map_err(|_| CatchError::InvalidBigInt(text.to_string()))
    }

    pub fn kind(&self) -> ThrownKind {
        match self {
            Thrown::Undefined => ThrownKind::Undefined,
            Thrown::Null => ThrownKind::Null,
            Thrown::Bool(_) => ThrownKind::Boolean,
            Thrown::Number(_) => ThrownKind::Number,
            Thrown::BigInt(_) => ThrownKind::BigInt,
            Thrown::String(_) => ThrownKind::String,
            Thrown::Symbol(_) => ThrownKind::Symbol,
            Thrown::Array(_) | Thrown::Object(_) | Thrown::Instance(_) => ThrownKind::Object,
            Thrown::Function(_) => ThrownKind::Function,
        }
    }

    /// The class of an instance; `None` for every other variant.
    pub fn class(&self) -> Option<&Class> {
        match self {
            Thrown::Instance(instance) => Some(&instance.class),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Thrown::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Identity comparison. Primitives compare by value (NaN is the same as
    /// NaN); shared variants are the same only when they are one allocation.
    pub fn is_same(&self, other: &Thrown) -> bool {
        match (self, other) {
            (Thrown::Undefined, Thrown::Undefined) | (Thrown::Null, Thrown::Null) => true,
            (Thrown::Bool(a), Thrown::Bool(b)) => a == b,
            (Thrown::Number(a), Thrown::Number(b)) => {
                (a.is_nan() && b.is_nan()) || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            (Thrown::BigInt(a), Thrown::BigInt(b)) => a == b,
            (Thrown::String(a), Thrown::String(b)) => a == b,
            (Thrown::Symbol(a), Thrown::Symbol(b)) => a == b,
            (Thrown::Array(a), Thrown::Array(b)) => Arc::ptr_eq(a, b),
            (Thrown::Object(a), Thrown::Object(b)) => Arc::ptr_eq(a, b),
            (Thrown::Function(a), Thrown::Function(b)) => a == b,
            (Thrown::Instance(a), Thrown::Instance(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Lossy projection for diagnostics. Undefined and functions become
    /// null, big integers and symbols become strings, instances become an
    /// object with `name`, `message` and their own fields.
    pub fn to_json(&self) -> Value {
        match self {
            Thrown::Undefined | Thrown::Null | Thrown::Function(_) => Value::Null,
            Thrown::Bool(b) => Value::Bool(*b),
            Thrown::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                Value::from(*n as i64)
            }
            Thrown::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Thrown::BigInt(n) => Value::String(n.to_string()),
            Thrown::String(s) => Value::String(s.clone()),
            Thrown::Symbol(sym) => Value::String(sym.to_string()),
            Thrown::Array(items) => Value::Array(items.iter().map(Thrown::to_json).collect()),
            Thrown::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Thrown::Instance(instance) => {
                let mut map = Map::new();
                map.insert("name".into(), Value::String(instance.class.name().to_string()));
                if let Some(message) = &instance.message {
                    map.insert("message".into(), Value::String(message.clone()));
                }
                for (k, v) in &instance.fields {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl PartialEq for Thrown {
    /// Structural equality. Symbols and functions still compare by identity
    /// since they have no comparable contents.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Thrown::Undefined, Thrown::Undefined) | (Thrown::Null, Thrown::Null) => true,
            (Thrown::Bool(a), Thrown::Bool(b)) => a == b,
            (Thrown::Number(a), Thrown::Number(b)) => a == b,
            (Thrown::BigInt(a), Thrown::BigInt(b)) => a == b,
            (Thrown::String(a), Thrown::String(b)) => a == b,
            (Thrown::Symbol(a), Thrown::Symbol(b)) => a == b,
            (Thrown::Array(a), Thrown::Array(b)) => a == b,
            (Thrown::Object(a), Thrown::Object(b)) => a == b,
            (Thrown::Function(a), Thrown::Function(b)) => a == b,
            (Thrown::Instance(a), Thrown::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thrown::Undefined => f.write_str("undefined"),
            Thrown::Null => f.write_str("null"),
            Thrown::Bool(b) => write!(f, "{b}"),
            Thrown::Number(n) if n.is_nan() => f.write_str("NaN"),
            Thrown::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Thrown::Number(n) => f.write_str(&format_number(*n)),
            Thrown::BigInt(n) => write!(f, "{n}n"),
            Thrown::String(s) => f.write_str(s),
            Thrown::Symbol(sym) => write!(f, "{sym}"),
            // Holes render empty, like a script runtime joining an array
            Thrown::Array(items) => write!(
                f,
                "{}",
                items
                    .iter()
                    .map(|item| match item {
                        Thrown::Undefined | Thrown::Null => String::new(),
                        other => other.to_string(),
                    })
                    .join(",")
            ),
            Thrown::Object(_) => f.write_str("[object Object]"),
            Thrown::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
            Thrown::Instance(instance) => write!(f, "{instance}"),
        }
    }
}

impl std::error::Error for Thrown {}

/// Renders a finite number like a script runtime: no sign on zero, and
/// exponent form once the decimal exponent reaches 21 or drops below -6.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let scientific = format!("{n:e}");
    match scientific.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
        Some((mantissa, Ok(exp))) if exp >= 21 => format!("{mantissa}e+{exp}"),
        Some((mantissa, Ok(exp))) if exp < -6 => format!("{mantissa}e{exp}"),
        _ => n.to_string(),
    }
}

impl From<bool> for Thrown {
    fn from(b: bool) -> Self {
        Thrown::Bool(b)
    }
}

impl From<f64> for Thrown {
    fn from(n: f64) -> Self {
        Thrown::Number(n)
    }
}

impl From<i32> for Thrown {
    fn from(n: i32) -> Self {
        Thrown::Number(f64::from(n))
    }
}

impl From<&str> for Thrown {
    fn from(s: &str) -> Self {
        Thrown::String(s.to_string())
    }
}

impl From<String> for Thrown {
    fn from(s: String) -> Self {
        Thrown::String(s)
    }
}

impl From<BigInt> for Thrown {
    fn from(n: BigInt) -> Self {
        Thrown::BigInt(n)
    }
}

impl From<Vec<Thrown>> for Thrown {
    fn from(items: Vec<Thrown>) -> Self {
        Thrown::Array(Arc::new(items))
    }
}

impl From<Instance> for Thrown {
    fn from(instance: Instance) -> Self {
        Thrown::Instance(Arc::new(instance))
    }
}

impl From<Value> for Thrown {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Thrown::Null,
            Value::Bool(b) => Thrown::Bool(b),
            // Integers beyond f64 range keep their precision as big integers
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() || f.abs() < MAX_SAFE_INTEGER => Thrown::Number(f),
                _ => Thrown::parse_big_int(&n.to_string()).unwrap_or(Thrown::Number(f64::NAN)),
            },
            Value::String(s) => Thrown::String(s),
            Value::Array(items) => Thrown::array(items.into_iter().map(Thrown::from)),
            Value::Object(map) => Thrown::object(map.into_iter().map(|(k, v)| (k, Thrown::from(v)))),
        }
    }
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique token. Every call to [`Symbol::new`] yields a distinct symbol,
/// even with the same description.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: Option<String>) -> Self {
        Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

type NativeFn = dyn Fn(&[Thrown]) -> Thrown + Send + Sync;

/// A callable value. Equality is identity of the underlying closure.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Thrown]) -> Thrown + Send + Sync + 'static,
    {
        Callable {
            name: Arc::from(name.into()),
            func: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Thrown]) -> Thrown {
        (self.func)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish_non_exhaustive()
    }
}

/// An object created from a [`Class`]. Instances of the error family carry a
/// message; any instance may carry extra fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub class: Class,
    pub message: Option<String>,
    pub fields: BTreeMap<String, Thrown>,
}

impl Instance {
    pub fn new(class: &Class) -> Self {
        Instance {
            class: class.clone(),
            message: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Thrown>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class.is_subclass_of(class)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.class.is_error_class() {
            return write!(f, "[object {}]", self.class.name());
        }
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => write!(f, "{}: {message}", self.class.name()),
            _ => f.write_str(self.class.name()),
        }
    }
}
