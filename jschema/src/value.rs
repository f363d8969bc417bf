//! The value library interface (spec.md §6): allocating map-shaped and
//! list-shaped values, forcefully writing into them during construction,
//! and freezing them to enforce read-only-ness.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use bigdecimal::BigDecimal;

/// A parsed JSON value, shaped by whatever target type drove its
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Str(String),
    Map(MapShaped),
    Record(MapShaped),
    Array(ListShaped),
    Tuple(ListShaped),
}

impl Value {
    #[must_use]
    pub fn new_map() -> Self {
        Value::Map(MapShaped::new(None))
    }

    #[must_use]
    pub fn new_record(package: impl Into<String>, name: impl Into<String>) -> Self {
        Value::Record(MapShaped::new(Some((package.into(), name.into()))))
    }

    #[must_use]
    pub fn new_array() -> Self {
        Value::Array(ListShaped::new())
    }

    #[must_use]
    pub fn new_tuple() -> Self {
        Value::Tuple(ListShaped::new())
    }

    /// `putForcefully(key, value)` on a map-shaped value (spec.md §6).
    ///
    /// # Panics
    /// Panics if `self` is not map-shaped.
    pub fn put_forcefully(&mut self, key: &str, value: Value) {
        match self {
            Value::Map(m) | Value::Record(m) => m.put_forcefully(key, value),
            _ => panic!("put_forcefully() called on a non-map-shaped value"),
        }
    }

    /// `addRefValue(index, value)` on a list-shaped value (spec.md §6).
    ///
    /// # Panics
    /// Panics if `self` is not list-shaped.
    pub fn add_ref_value(&mut self, index: usize, value: Value) {
        match self {
            Value::Array(l) | Value::Tuple(l) => l.add_ref_value(index, value),
            _ => panic!("add_ref_value() called on a non-list-shaped value"),
        }
    }

    /// Freezes a map-shaped or list-shaped value to enforce read-only-ness
    /// (spec.md §6).
    pub fn freeze(&mut self) {
        match self {
            Value::Map(m) | Value::Record(m) => m.frozen = true,
            Value::Array(l) | Value::Tuple(l) => l.frozen = true,
            _ => {}
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&MapShaped> {
        match self {
            Value::Map(m) | Value::Record(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&ListShaped> {
        match self {
            Value::Array(l) | Value::Tuple(l) => Some(l),
            _ => None,
        }
    }
}

/// A map-shaped value: a `MAP`'s string-keyed entries, or a `RECORD`'s
/// field entries plus its originating package+name identity.
#[derive(Debug, Clone, PartialEq)]
pub struct MapShaped {
    identity: Option<(String, String)>,
    entries: Vec<(String, Value)>,
    frozen: bool,
}

impl MapShaped {
    fn new(identity: Option<(String, String)>) -> Self {
        Self {
            identity,
            entries: Vec::new(),
            frozen: false,
        }
    }

    /// The `(package, name)` identity, for `RECORD` values.
    #[must_use]
    pub fn identity(&self) -> Option<(&str, &str)> {
        self.identity.as_ref().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    pub fn put_forcefully(&mut self, key: &str, value: Value) {
        debug_assert!(!self.frozen, "put_forcefully() on a frozen value");
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((String::from(key), value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A list-shaped value: an `ARRAY`'s or `TUPLE`'s ordered items.
#[derive(Debug, Clone, PartialEq)]
pub struct ListShaped {
    items: Vec<Value>,
    frozen: bool,
}

impl ListShaped {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            frozen: false,
        }
    }

    /// `addRefValue(index, value)`. Indices are expected to arrive in
    /// non-decreasing order (the core only ever advances `listIndices`),
    /// but out-of-order or sparse indices are handled by padding with
    /// `Value::Null` up to `index`.
    pub fn add_ref_value(&mut self, index: usize, value: Value) {
        debug_assert!(!self.frozen, "add_ref_value() on a frozen value");
        if index < self.items.len() {
            self.items[index] = value;
        } else {
            self.items.resize(index, Value::Null);
            self.items.push(value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}
