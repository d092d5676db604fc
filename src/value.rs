//! The opaque value carrier used for receivers, inputs and outputs of test cases.
//!
//! Case values are type-erased into a small closed set of shapes so the engine can
//! compare them structurally and detect nil-ness without knowing the concrete Rust
//! types involved. References, sequences and maps carry a type tag naming the Rust
//! type they were built from; it shows up in `Debug` output but not in equality, so a
//! `Vec<&str>`, a `Vec<String>` and a YAML sequence of strings compare equal.
//! Record names do take part in equality.

use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Type tag used for containers built from YAML / JSON documents.
pub const ANY_TYPE: &str = "any";

/// A type-erased case value.
///
/// # Examples
///
/// ```rust
/// use casebook::Value;
/// let v = Value::from("hello");
/// assert_eq!(v.type_name(), "Str");
/// let nil = Value::default();
/// assert!(nil.is_nil());
/// let null: Value = None::<i32>.into();
/// assert!(null.is_nil());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum Value {
    /// Untyped absence of a value.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Typed nullable reference. `None` is a null reference.
    Ref(String, Option<Box<Value>>),
    /// Typed sequence. `None` is a sequence that was never allocated.
    Seq(String, Option<Vec<Value>>),
    /// Typed map with string keys. `None` is a map that was never allocated.
    Map(String, Option<BTreeMap<String, Value>>),
    /// Named record with ordered fields.
    Record(String, Vec<(String, Value)>),
}

impl Value {
    /// Returns the shape name of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::Ref(..) => "Ref",
            Value::Seq(..) => "Seq",
            Value::Map(..) => "Map",
            Value::Record(..) => "Record",
        }
    }

    /// True for the untyped nil and for null references of any type.
    ///
    /// Unallocated sequences and maps are not nil in this sense.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil | Value::Ref(_, None))
    }

    /// Returns the element count if this value is a sequence, allocated or not.
    pub fn seq_len(&self) -> Option<usize> {
        match self {
            Value::Seq(_, items) => Some(items.as_ref().map_or(0, Vec::len)),
            _ => None,
        }
    }

    /// A null reference to a `T`.
    pub fn null<T: ?Sized>() -> Self {
        Value::Ref(type_name::<T>().to_string(), None)
    }

    /// An unallocated sequence of `T`.
    pub fn nil_seq<T>() -> Self {
        Value::Seq(type_name::<T>().to_string(), None)
    }

    /// An unallocated map with `T` values.
    pub fn nil_map<T>() -> Self {
        Value::Map(type_name::<T>().to_string(), None)
    }

    /// A non-null reference pointing at `target`.
    pub fn reference<T: Into<Value>>(target: T) -> Self {
        Value::Ref(type_name::<T>().to_string(), Some(Box::new(target.into())))
    }

    /// Builds a named record from `(field, value)` pairs.
    ///
    /// ```rust
    /// use casebook::Value;
    /// let p = Value::record("Point", [("x", 1), ("y", 2)]);
    /// assert_eq!(p.to_string(), "Point { x: 1, y: 2 }");
    /// ```
    pub fn record<N, I, K, V>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Record(
            name.into(),
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Converts any serializable value through its YAML data model.
    ///
    /// Containers produced this way are tagged [`ANY_TYPE`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::to_value(value).map(Value::from)
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }

    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &BTreeMap<String, Value>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }

    fn fmt_record(f: &mut fmt::Formatter<'_>, name: &str, fields: &[(String, Value)]) -> fmt::Result {
        if fields.is_empty() {
            return write!(f, "{} {{}}", name);
        }
        write!(f, "{} {{ ", name)?;
        for (i, (k, v)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil | Value::Ref(_, None) => write!(f, "<nil>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Ref(_, Some(target)) => write!(f, "&{}", target),
            Value::Seq(_, items) => Self::fmt_seq(f, items.as_deref().unwrap_or_default()),
            Value::Map(_, None) => write!(f, "{{}}"),
            Value::Map(_, Some(map)) => Self::fmt_map(f, map),
            Value::Record(name, fields) => Self::fmt_record(f, name, fields),
        }
    }
}

/// Deep structural equality, ignoring container type tags.
///
/// An unallocated sequence or map is still distinct from an allocated empty one; that
/// normalization belongs to [`crate::compare::values_equal`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Ref(_, a), Value::Ref(_, b)) => a == b,
            (Value::Seq(_, a), Value::Seq(_, b)) => a == b,
            (Value::Map(_, a), Value::Map(_, b)) => a == b,
            (Value::Record(a_name, a), Value::Record(b_name, b)) => a_name == b_name && a == b,
            _ => false,
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_into_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(i64::from(n))
            }
        })*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(
            type_name::<T>().to_string(),
            Some(items.into_iter().map(Into::into).collect()),
        )
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::Seq(
            type_name::<T>().to_string(),
            Some(items.into_iter().map(Into::into).collect()),
        )
    }
}

/// `Option<T>` maps to a typed nullable reference.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        Value::Ref(
            type_name::<T>().to_string(),
            opt.map(|v| Box::new(v.into())),
        )
    }
}

impl<K: Into<String>, T: Into<Value>> From<BTreeMap<K, T>> for Value {
    fn from(map: BTreeMap<K, T>) -> Self {
        Value::Map(
            type_name::<T>().to_string(),
            Some(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        )
    }
}

impl<K: Into<String>, T: Into<Value>> From<HashMap<K, T>> for Value {
    fn from(map: HashMap<K, T>) -> Self {
        Value::Map(
            type_name::<T>().to_string(),
            Some(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        )
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(doc: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;
        match doc {
            Yaml::Null => Value::Nil,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Value::Str(s),
            Yaml::Sequence(items) => Value::Seq(
                ANY_TYPE.to_string(),
                Some(items.into_iter().map(Value::from).collect()),
            ),
            Yaml::Mapping(map) => Value::Map(
                ANY_TYPE.to_string(),
                Some(
                    map.into_iter()
                        .map(|(k, v)| (yaml_key(k), Value::from(v)))
                        .collect(),
                ),
            ),
            Yaml::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => Value::from(other).to_string(),
    }
}
