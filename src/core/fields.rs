//! Custom key-value fields carried by log entries

use std::collections::btree_map::{self, BTreeMap};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Value type for structured logging fields
#[derive(Clone)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Null,
    /// Arbitrary JSON payload, rendered as-is by the JSON format
    Json(serde_json::Value),
    /// Any value with a textual representation
    Display(Arc<dyn fmt::Display + Send + Sync>),
    /// An error value, rendered as its message
    Error(Arc<dyn StdError + Send + Sync>),
}

impl FieldValue {
    /// Wrap any `Display` value, rendered through its textual form
    pub fn display<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        FieldValue::Display(Arc::new(value))
    }

    /// Wrap an error value, rendered as its message
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        FieldValue::Error(Arc::new(err))
    }

    /// Text of a value that is a string, a `Display` value or an error.
    ///
    /// Other variants have no canonical text and yield `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Display(d) => Some(d.to_string()),
            FieldValue::Error(e) => Some(e.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Uint(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Json(v) => v.clone(),
            FieldValue::Display(d) => serde_json::Value::String(d.to_string()),
            FieldValue::Error(e) => serde_json::Value::String(e.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::Json(v) => write!(f, "{}", v),
            FieldValue::Display(d) => write!(f, "{}", d),
            FieldValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            FieldValue::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            FieldValue::Float(fl) => f.debug_tuple("Float").field(fl).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Null => f.write_str("Null"),
            FieldValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            FieldValue::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
            FieldValue::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Uint(a), FieldValue::Uint(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Json(a), FieldValue::Json(b)) => a == b,
            (FieldValue::Display(a), FieldValue::Display(b)) => a.to_string() == b.to_string(),
            (FieldValue::Error(a), FieldValue::Error(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u64::from(u))
    }
}

impl From<u16> for FieldValue {
    fn from(u: u16) -> Self {
        FieldValue::Uint(u64::from(u))
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A set of custom fields; keys are unique and a later write replaces an
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    fields: BTreeMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field, consuming and returning the set
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Copy every field of `other` into `self`, overriding on collision
    pub fn merge(&mut self, other: &Fields) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// A fresh set holding `self` overlaid with `other`; neither input changes
    #[must_use]
    pub fn merged(&self, other: &Fields) -> Fields {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Build a [`Fields`] set from `key => value` pairs.
///
/// ```
/// use duosink::fields;
///
/// let f = fields! { "port" => 8080, "host" => "localhost" };
/// assert_eq!(f.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl StdError for Boom {}

    #[test]
    fn test_merge_last_write_wins() {
        let base = Fields::new().with_field("a", 1).with_field("b", "x");
        let overlay = Fields::new().with_field("a", 2).with_field("c", true);

        let merged = base.merged(&overlay);

        assert_eq!(merged.get("a"), Some(&FieldValue::Int(2)));
        assert_eq!(merged.get("b"), Some(&FieldValue::String("x".into())));
        assert_eq!(merged.get("c"), Some(&FieldValue::Bool(true)));
        // inputs untouched
        assert_eq!(base.get("a"), Some(&FieldValue::Int(1)));
        assert!(!base.contains_key("c"));
    }

    #[test]
    fn test_as_text() {
        assert_eq!(FieldValue::from("s").as_text().as_deref(), Some("s"));
        assert_eq!(FieldValue::display(42).as_text().as_deref(), Some("42"));
        assert_eq!(FieldValue::error(Boom).as_text().as_deref(), Some("boom"));
        assert_eq!(FieldValue::Int(1).as_text(), None);
        assert_eq!(FieldValue::Null.as_text(), None);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(FieldValue::Int(-3).to_json_value(), serde_json::json!(-3));
        assert_eq!(FieldValue::Uint(3).to_json_value(), serde_json::json!(3));
        assert_eq!(FieldValue::Float(f64::NAN).to_json_value(), serde_json::Value::Null);
        assert_eq!(FieldValue::error(Boom).to_json_value(), serde_json::json!("boom"));
        assert_eq!(
            FieldValue::from(serde_json::json!({"k": [1, 2]})).to_json_value(),
            serde_json::json!({"k": [1, 2]})
        );
    }

    #[test]
    fn test_fields_macro() {
        let f = fields! { "port" => 8080, "host" => "localhost", "tls" => false };
        assert_eq!(f.len(), 3);
        assert_eq!(f.get("port"), Some(&FieldValue::Int(8080)));

        let empty = fields! {};
        assert!(empty.is_empty());
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<i32> = None;
        assert_eq!(FieldValue::from(none), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::String("x".into()));
    }
}
