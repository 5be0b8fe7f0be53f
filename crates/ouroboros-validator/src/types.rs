//! Field introspection model
//!
//! Rust has no runtime reflection, so records describe themselves through the
//! [`Introspect`] capability: they produce a [`Record`] whose [`Field`]s carry
//! a name, a set of tags (rule tag, static-feedback tag, ...), an accessibility
//! bit and a dynamic [`Value`].
//!
//! ```rust
//! use ouroboros_validator::{Field, Introspect, Record, Value};
//!
//! struct SignupForm {
//!     username: String,
//!     age: Option<u32>,
//! }
//!
//! impl Introspect for SignupForm {
//!     fn introspect(&self) -> Value {
//!         Record::new("SignupForm")
//!             .field(Field::new("UserName", self.username.as_str()).validate("len:8-20,required"))
//!             .field(Field::new("Age", self.age).validate("blank,gte:18"))
//!             .into()
//!     }
//! }
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Default name of the rule tag
pub const DEFAULT_TAG_NAME: &str = "validate";

/// Default name of the static-feedback tag
pub const DEFAULT_FEEDBACK_TAG_NAME: &str = "feedback";

/// Zero value of a time field: 0001-01-01 00:00:00
pub static ZERO_TIME: Lazy<NaiveDateTime> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
});

// ============================================================================
// Kind
// ============================================================================

/// Underlying kind of a value, used for rule dispatch and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    String,
    /// Signed integer (i8..i64, isize)
    Int,
    /// Unsigned integer (u8..u64, usize)
    Uint,
    Float32,
    Float64,
    /// Any time-like value (chrono date, datetime, zoned datetime)
    Time,
    /// Growable sequence
    List,
    /// Fixed-size array
    Array,
    Map,
    /// Single-level indirection, possibly nil
    Pointer,
    Record,
}

impl Kind {
    /// Human-readable kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Time => "time",
            Self::List => "list",
            Self::Array => "array",
            Self::Map => "map",
            Self::Pointer => "pointer",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Value
// ============================================================================

/// Current value of a field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Time(NaiveDateTime),
    List(Vec<Value>),
    Array(Vec<Value>),
    /// Key-value pairs; iteration order carries no meaning
    Map(Vec<(Value, Value)>),
    /// `None` is a nil pointer
    Pointer(Option<Box<Value>>),
    Record(Record),
}

impl Value {
    /// Kind of this value (a pointer reports `Pointer`, not its target's kind)
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::String(_) => Kind::String,
            Self::Int(_) => Kind::Int,
            Self::Uint(_) => Kind::Uint,
            Self::Float32(_) => Kind::Float32,
            Self::Float64(_) => Kind::Float64,
            Self::Time(_) => Kind::Time,
            Self::List(_) => Kind::List,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
            Self::Pointer(_) => Kind::Pointer,
            Self::Record(_) => Kind::Record,
        }
    }

    /// Nil pointer for a value of any kind
    pub fn nil() -> Self {
        Self::Pointer(None)
    }

    /// Check if value is a nil pointer
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Pointer(None))
    }

    /// Check if value is the zero value of its kind
    ///
    /// The zero time is [`ZERO_TIME`] (0001-01-01 00:00:00). A
    /// non-nil pointer is never zero, even if it points at a zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::String(s) => s.is_empty(),
            Self::Int(n) => *n == 0,
            Self::Uint(n) => *n == 0,
            Self::Float32(f) => *f == 0.0,
            Self::Float64(f) => *f == 0.0,
            Self::Time(t) => *t == *ZERO_TIME,
            Self::List(items) => items.is_empty(),
            Self::Array(items) => items.iter().all(Value::is_zero),
            Self::Map(pairs) => pairs.is_empty(),
            Self::Pointer(target) => target.is_none(),
            Self::Record(record) => record.fields.iter().all(|f| f.value.is_zero()),
        }
    }

    /// Follow one level of pointer indirection
    ///
    /// Returns `None` for a nil pointer and `self` for non-pointer values.
    pub fn indirect(&self) -> Option<&Value> {
        match self {
            Self::Pointer(target) => target.as_deref(),
            other => Some(other),
        }
    }

    /// Length of a length-bearing value (characters for strings)
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::List(items) | Self::Array(items) => Some(items.len()),
            Self::Map(pairs) => Some(pairs.len()),
            _ => None,
        }
    }

    /// Borrow the string content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Record and Field
// ============================================================================

/// A flat record: ordered fields in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Type name, used in logs
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
}

impl Record {
    /// Create an empty record
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style)
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a field
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Look up a field by its declared name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared field name
    pub name: String,
    /// Annotations, keyed by tag name
    pub tags: Vec<(String, String)>,
    /// Inaccessible fields are never validated, whatever their tags
    pub exported: bool,
    /// Current value
    pub value: Value,
}

impl Field {
    /// Create an accessible field
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            exported: true,
            value: value.into(),
        }
    }

    /// Create an inaccessible field
    pub fn private(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            exported: false,
            ..Self::new(name, value)
        }
    }

    /// Attach an annotation under `key`
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// Attach a rule annotation under the default rule tag name
    pub fn validate(self, rules: impl Into<String>) -> Self {
        self.tag(DEFAULT_TAG_NAME, rules)
    }

    /// Attach a static-feedback override under the default feedback tag name
    pub fn feedback(self, message: impl Into<String>) -> Self {
        self.tag(DEFAULT_FEEDBACK_TAG_NAME, message)
    }

    /// Look up an annotation; `Some("")` means present but empty
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Kind of the field's value
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }
}

// ============================================================================
// Introspect
// ============================================================================

/// Capability to expose a value to the engine
///
/// Records return `Value::Record`; anything else is rejected by the engine as
/// an unsupported value type. `Option<T>` introspects as a pointer.
pub trait Introspect {
    fn introspect(&self) -> Value;
}

impl Introspect for Value {
    fn introspect(&self) -> Value {
        self.clone()
    }
}

impl Introspect for Record {
    fn introspect(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn introspect(&self) -> Value {
        (**self).introspect()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn introspect(&self) -> Value {
        (**self).introspect()
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn introspect(&self) -> Value {
        Value::Pointer(self.as_ref().map(|inner| Box::new(inner.introspect())))
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64, u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Time(value.and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::Time(value.naive_utc())
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Value::Pointer(value.map(|inner| Box::new(inner.into())))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(value: HashMap<K, V, S>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
