//! The value domain that specs are resolved against.
//!
//! Containers sit behind [`Arc`], so cloning a [`Value`] is cheap and two
//! clones of the same container are the *same* value in the sense of
//! [`Value::same`]. Structural sharing in `update` results relies on this.

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An opaque callable value. Used for `$apply` payloads and transform specs.
pub type Func = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Category of a [`Value`], used for command dispatch and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
    MapLike,
    SetLike,
    Callable,
}

impl Kind {
    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Bool => "Boolean",
            Kind::Number => "Number",
            Kind::String => "String",
            Kind::Sequence => "Array",
            Kind::Mapping => "Object",
            Kind::MapLike => "Map",
            Kind::SetLike => "Set",
            Kind::Callable => "Function",
        }
    }

    /// Whether children of this kind can be addressed by path keys.
    pub fn is_keyed(self) -> bool {
        matches!(self, Kind::Sequence | Kind::Mapping | Kind::MapLike)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A keyed record with insertion-ordered entries.
///
/// The optional class tag plays the role of a prototype: copies made during
/// an update keep it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    class: Option<Arc<str>>,
    entries: IndexMap<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(class: impl Into<Arc<str>>) -> Self {
        Object {
            class: Some(class.into()),
            entries: IndexMap::new(),
        }
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Object {
            class: None,
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A number, remembering whether JSON input wrote it as a float.
///
/// The flag only affects [`Value::to_json`]: `2.0` read from JSON is
/// written back as `2.0`. Identity, equality and hashing look at the value
/// alone.
#[derive(Debug, Clone, Copy)]
pub struct Number {
    value: f64,
    float: bool,
}

impl Number {
    pub fn new(value: f64) -> Self {
        Number { value, float: false }
    }

    /// A number that serializes as a JSON float even when integral.
    pub fn float(value: f64) -> Self {
        Number { value, float: true }
    }

    pub fn get(self) -> f64 {
        self.value
    }

    pub fn is_float(self) -> bool {
        self.float
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        let value = n.as_f64().unwrap_or(f64::NAN);
        if n.is_f64() {
            Number::float(value)
        } else {
            Number::new(value)
        }
    }
}

/// A value that can be the target of an update.
#[derive(Clone, Default)]
pub enum Value {
    /// The value of a missing key.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Object(Arc<Object>),
    Map(Arc<IndexMap<Value, Value>>),
    Set(Arc<IndexSet<Value>>),
    Function(Func),
}

impl Value {
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Array(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn object<K: Into<String>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Object(Arc::new(entries.into_iter().collect()))
    }

    /// Creates an object carrying a class tag.
    pub fn object_with_class<K: Into<String>, V: Into<Value>>(
        class: impl Into<Arc<str>>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut object = Object::with_class(class);
        for (k, v) in entries {
            object.insert(k, v.into());
        }
        Value::Object(Arc::new(object))
    }

    pub fn map<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }

    pub fn set<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Set(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn function(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Value::Function(Arc::new(f))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Sequence,
            Value::Object(_) => Kind::Mapping,
            Value::Map(_) => Kind::MapLike,
            Value::Set(_) => Kind::SetLike,
            Value::Function(_) => Kind::Callable,
        }
    }

    /// Strict identity: scalars compare by value (`NaN` is never identical
    /// to itself), containers and functions by pointer.
    ///
    /// This is the default equality hook of an [`Updater`](crate::Updater).
    pub fn same(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.get() == b.get(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => func_ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.get()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&IndexSet<Value>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Reads the child at a property key. Missing children read as
    /// [`Value::Undefined`].
    pub fn get(&self, key: &str) -> Value {
        let child = match self {
            Value::Object(object) => object.get(key),
            Value::Array(items) => array_index(key).and_then(|i| items.get(i)),
            Value::Map(map) => map.get(&Value::from(key)),
            _ => None,
        };
        child.cloned().unwrap_or_default()
    }

    /// Whether the value itself holds an entry at `key`.
    pub fn has_own(&self, key: &str) -> bool {
        match self {
            Value::Object(object) => object.contains_key(key),
            Value::Array(items) => array_index(key).is_some_and(|i| i < items.len()),
            Value::Map(map) => map.contains_key(&Value::from(key)),
            _ => false,
        }
    }

    /// `false` for `undefined`, `null`, `false`, `0`, `NaN` and `""`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.get() != 0.0 && !n.get().is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric conversion of scalars. `null` and `false` give 0, `true`
    /// gives 1, strings are parsed as numeric literals. Anything else,
    /// including `undefined`, gives `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => n.get(),
            Value::String(s) => parse_number(s),
            _ => f64::NAN,
        }
    }

    /// Converts the value to a property key, e.g. `1.0` becomes `"1"`.
    pub fn to_key(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        }
    }

    /// Converts to JSON following stringify rules: `undefined` and functions
    /// are dropped from objects and become `null` elsewhere, non-finite
    /// numbers become `null`, maps become objects keyed by [`Value::to_key`]
    /// and sets become arrays.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => Json::String(s.to_string()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Set(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(object) => Json::Object(
                object
                    .iter()
                    .filter(|(_, v)| !v.is_omitted_in_json())
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Value::Map(map) => Json::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_omitted_in_json())
                    .map(|(k, v)| (k.to_key(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn is_omitted_in_json(&self) -> bool {
        matches!(self, Value::Undefined | Value::Function(_))
    }
}

/// Structural equality, usable as an alternative equality hook.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    a == b
}

fn func_ptr_eq(a: &Func, b: &Func) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Parses a canonical array index ("0", "17"; not "01" or "-1"). Indices
/// stop below `2^32 - 1`; larger keys are not indices.
pub(crate) fn array_index(key: &str) -> Option<usize> {
    let idx: u32 = key.parse().ok()?;
    (idx != u32::MAX && idx.to_string() == key).then_some(idx as usize)
}

fn number_to_json(number: Number) -> serde_json::Value {
    let n = number.get();
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if !number.is_float() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Parses a numeric string literal. Blank strings are 0.
fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.starts_with('+') {
            return f64::NAN;
        }
        return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }
    let unsigned = s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s);
    if unsigned == "Infinity" {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    // Rust also accepts "inf" and "nan", which are not numeric literals here.
    if unsigned.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

// Structural equality. Numbers follow SameValueZero so that values can be
// set members and map keys.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                let (a, b) = (a.get(), b.get());
                a == b || (a.is_nan() && b.is_nan())
            }
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Set(a), Value::Set(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => Value::same(self, other),
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Undefined | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => {
                let n = n.get();
                let bits = if n == 0.0 {
                    0
                } else if n.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    n.to_bits()
                };
                bits.hash(state);
            }
            Value::String(s) => s.hash(state),
            Value::Array(items) => {
                items.len().hash(state);
                for item in items.iter() {
                    item.hash(state);
                }
            }
            // Keyed containers compare order-insensitively.
            Value::Object(object) => object.len().hash(state),
            Value::Map(map) => map.len().hash(state),
            Value::Set(set) => set.len().hash(state),
            Value::Function(f) => (Arc::as_ptr(f) as *const () as usize).hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(n.get())),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_nested(f, item)?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                if let Some(class) = object.class() {
                    write!(f, "{class} ")?;
                }
                f.write_str("{")?;
                for (i, (k, v)) in object.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {k}: ")?;
                    write_nested(f, v)?;
                }
                f.write_str(if object.is_empty() { "}" } else { " }" })
            }
            Value::Map(map) => {
                f.write_str("Map {")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(" ")?;
                    write_nested(f, k)?;
                    f.write_str(" => ")?;
                    write_nested(f, v)?;
                }
                f.write_str(if map.is_empty() { "}" } else { " }" })
            }
            Value::Set(set) => {
                f.write_str("Set {")?;
                for (i, item) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(" ")?;
                    write_nested(f, item)?;
                }
                f.write_str(if set.is_empty() { "}" } else { " }" })
            }
            Value::Function(_) => f.write_str("[Function]"),
        }
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) => write!(f, "{:?}", &**s),
        other => write!(f, "{other}"),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nested(f, self)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::new(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::new(n as f64))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::new(n as f64))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(Number::new(n as f64))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(Number::new(n as f64))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(Arc::new(object))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(Number::from(n)),
            Json::String(s) => Value::from(s.as_str()),
            Json::Array(items) => Value::array(items.iter().map(Value::from)),
            Json::Object(map) => Value::object(map.iter().map(|(k, v)| (k.as_str(), Value::from(v)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_is_identity_for_containers() {
        let a = Value::from(json!({"x": 1}));
        let b = Value::from(json!({"x": 1}));
        assert!(Value::same(&a, &a.clone()));
        assert!(!Value::same(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_for_scalars() {
        assert!(Value::same(&Value::from(1), &Value::from(1.0)));
        assert!(Value::same(&Value::from("a"), &Value::from("a")));
        assert!(!Value::same(&Value::from(f64::NAN), &Value::from(f64::NAN)));
        assert!(Value::same(&Value::from(0.0), &Value::from(-0.0)));
        assert!(!Value::same(&Value::Null, &Value::Undefined));
    }

    #[test]
    fn test_functions_compare_by_pointer() {
        let f = Value::function(|v| v.clone());
        let g = Value::function(|v| v.clone());
        assert!(Value::same(&f, &f.clone()));
        assert!(!Value::same(&f, &g));
        assert_ne!(f, g);
    }

    #[test]
    fn test_nan_is_a_single_set_member() {
        let set = Value::set([f64::NAN, f64::NAN, 0.0, -0.0]);
        assert_eq!(set.as_set().unwrap().len(), 2);
    }

    #[test]
    fn test_get_and_has_own() {
        let obj = Value::from(json!({"a": 1, "list": [10, 20]}));
        assert_eq!(obj.get("a"), Value::from(1));
        assert!(obj.get("missing").is_undefined());
        assert!(obj.has_own("a"));
        assert!(!obj.has_own("missing"));

        let list = obj.get("list");
        assert_eq!(list.get("1"), Value::from(20));
        assert!(list.get("01").is_undefined());
        assert!(list.get("5").is_undefined());
        assert!(list.has_own("0"));
        assert!(!list.has_own("2"));

        let map = Value::map([("k", 1)]);
        assert_eq!(map.get("k"), Value::from(1));
        assert!(map.has_own("k"));

        assert!(Value::from(5).get("a").is_undefined());
    }

    #[test]
    fn test_truthiness() {
        for falsy in [
            Value::Undefined,
            Value::Null,
            Value::Bool(false),
            Value::from(0),
            Value::from(f64::NAN),
            Value::from(""),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?}");
        }
        assert!(Value::from("0").is_truthy());
        assert!(Value::array(Vec::<Value>::new()).is_truthy());
    }

    #[test]
    fn test_array_index_range() {
        assert_eq!(array_index("4294967294"), Some(4_294_967_294));
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("18446744073709551615"), None);
        assert!(Value::array([1]).get("18446744073709551615").is_undefined());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::from(" 12 ").to_number(), 12.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("0x10").to_number(), 16.0);
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
        assert_eq!(Value::from("-Infinity").to_number(), f64::NEG_INFINITY);
        assert!(Value::from("inf").to_number().is_nan());
        assert!(Value::from("12px").to_number().is_nan());
        assert!(Value::Undefined.to_number().is_nan());
        assert!(Value::array([1]).to_number().is_nan());
    }

    #[test]
    fn test_json_floats_stay_floats() {
        let doc = json!({"x": 2.0, "y": [1.0, 3], "z": 0.5});
        let value = Value::from(&doc);
        assert_eq!(value.to_json(), doc);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"x":2.0,"y":[1.0,3],"z":0.5}"#);
        assert_eq!(value.get("x"), Value::from(2));
        assert!(Value::same(&value.get("x"), &Value::from(2)));
    }

    #[test]
    fn test_to_key() {
        assert_eq!(Value::from(1).to_key(), "1");
        assert_eq!(Value::from(1.5).to_key(), "1.5");
        assert_eq!(Value::from(-0.0).to_key(), "0");
        assert_eq!(Value::from("name").to_key(), "name");
        assert_eq!(Value::Bool(true).to_key(), "true");
    }

    #[test]
    fn test_json_conversion() {
        let doc = json!({"a": [1, 2.5, "x"], "b": {"c": null, "d": true}});
        assert_eq!(Value::from(&doc).to_json(), doc);

        let value = Value::object([
            ("kept", Value::from(1)),
            ("gone", Value::Undefined),
            ("fn", Value::function(|v| v.clone())),
            ("list", Value::array([Value::Undefined, Value::from(f64::INFINITY)])),
            ("set", Value::set([1, 2])),
            ("map", Value::map([(1, "one")])),
        ]);
        assert_eq!(
            value.to_json(),
            json!({"kept": 1, "list": [null, null], "set": [1, 2], "map": {"1": "one"}})
        );
    }

    #[test]
    fn test_serialize() {
        let value = Value::object([("a", Value::array([1, 2]))]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_display() {
        let value = Value::object_with_class(
            "Point",
            [("x", Value::from(1)), ("label", Value::from("p"))],
        );
        assert_eq!(value.to_string(), r#"Point { x: 1, label: "p" }"#);
        assert_eq!(Value::map([("k", 1)]).to_string(), r#"Map { "k" => 1 }"#);
        assert_eq!(Value::set(Vec::<Value>::new()).to_string(), "Set {}");
        assert_eq!(Value::from("raw").to_string(), "raw");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from(json!([])).kind(), Kind::Sequence);
        assert_eq!(Value::from(json!({})).kind().name(), "Object");
        assert!(Kind::MapLike.is_keyed());
        assert!(!Kind::SetLike.is_keyed());
    }
}
