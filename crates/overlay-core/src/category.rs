use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// A feature's value under its dataset's category field.
///
/// Values compare by their display form. `Missing` (no such property) sorts
/// after every present value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryValue {
    Present(String),
    Missing,
}

impl CategoryValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        value.map_or(Self::Missing, |value| Self::Present(display_json(value)))
    }

    /// Reads `field` from a feature's property map.
    pub fn from_properties(properties: Option<&Map<String, Value>>, field: &str) -> Self {
        Self::from_json(properties.and_then(|props| props.get(field)))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Present(text) => text,
            Self::Missing => "undefined",
        }
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for CategoryValue {
    fn from(value: &str) -> Self {
        Self::Present(value.to_string())
    }
}

/// Natural string form of a JSON property value.
pub fn display_json(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => display_number(number),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn display_number(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        #[allow(clippy::cast_possible_truncation)]
        Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
            format!("{}", float as i64)
        }
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

/// Distinct category values of one dataset, kept in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    sorted: Vec<CategoryValue>,
}

impl CategorySet {
    pub fn new(values: impl IntoIterator<Item = CategoryValue>) -> Self {
        let unique: BTreeSet<CategoryValue> = values.into_iter().collect();
        Self {
            sorted: unique.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn contains(&self, value: &CategoryValue) -> bool {
        self.sorted.binary_search(value).is_ok()
    }

    /// Rank of `value` in sorted order.
    pub fn rank(&self, value: &CategoryValue) -> Option<usize> {
        self.sorted.binary_search(value).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryValue> {
        self.sorted.iter()
    }
}

impl FromIterator<CategoryValue> for CategorySet {
    fn from_iter<T: IntoIterator<Item = CategoryValue>>(iter: T) -> Self {
        Self::new(iter)
    }
}
