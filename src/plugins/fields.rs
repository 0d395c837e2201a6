use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Field declarations
// ---------------------------------------------------------------------------

/// What kind of value a field takes, with its default.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Int {
        default: i64,
        min: Option<i64>,
        max: Option<i64>,
    },
    Float { default: f64 },
    Bool { default: bool },
    Text { default: String },
    /// Name of one dataset.
    Dataset { default: String },
    /// Names or wildcard patterns of several datasets.
    DatasetMulti { default: Vec<String> },
    /// Path of a widget, e.g. `/page1/graph1`.
    Widget { default: String },
}

/// One named, typed setting that a plugin asks the host to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub descr: String,
    pub kind: FieldKind,
}

impl Field {
    fn new(name: &str, descr: &str, kind: FieldKind) -> Self {
        Field {
            name: name.to_string(),
            descr: descr.to_string(),
            kind,
        }
    }

    pub fn int(name: &str, descr: &str, default: i64) -> Self {
        Self::new(name, descr, FieldKind::Int { default, min: None, max: None })
    }

    pub fn float(name: &str, descr: &str, default: f64) -> Self {
        Self::new(name, descr, FieldKind::Float { default })
    }

    pub fn bool(name: &str, descr: &str, default: bool) -> Self {
        Self::new(name, descr, FieldKind::Bool { default })
    }

    pub fn text(name: &str, descr: &str, default: &str) -> Self {
        Self::new(name, descr, FieldKind::Text { default: default.to_string() })
    }

    pub fn dataset(name: &str, descr: &str) -> Self {
        Self::new(name, descr, FieldKind::Dataset { default: String::new() })
    }

    pub fn dataset_multi(name: &str, descr: &str) -> Self {
        Self::new(name, descr, FieldKind::DatasetMulti { default: Vec::new() })
    }

    pub fn widget(name: &str, descr: &str) -> Self {
        Self::new(name, descr, FieldKind::Widget { default: String::new() })
    }

    /// Restrict an int field to `min..=max`. No effect on other kinds.
    pub fn with_range(mut self, lo: Option<i64>, hi: Option<i64>) -> Self {
        if let FieldKind::Int { min, max, .. } = &mut self.kind {
            *min = lo;
            *max = hi;
        }
        self
    }

    pub fn default_value(&self) -> FieldValue {
        match &self.kind {
            FieldKind::Int { default, .. } => FieldValue::Int(*default),
            FieldKind::Float { default } => FieldValue::Float(*default),
            FieldKind::Bool { default } => FieldValue::Bool(*default),
            FieldKind::Text { default }
            | FieldKind::Dataset { default }
            | FieldKind::Widget { default } => FieldValue::Text(default.clone()),
            FieldKind::DatasetMulti { default } => FieldValue::List(default.clone()),
        }
    }

    /// Check `value` against this field, converting where the host may send
    /// a close relative (an int for a float, a single name for a list).
    fn coerce(&self, value: FieldValue) -> Result<FieldValue> {
        let mismatch = |v: &FieldValue| {
            Error::field(&self.name, format!("expected {}, got {v:?}", self.kind_name()))
        };
        match (&self.kind, value) {
            (FieldKind::Int { min, max, .. }, FieldValue::Int(i)) => {
                if matches!(min, Some(lo) if i < *lo) || matches!(max, Some(hi) if i > *hi) {
                    return Err(Error::field(
                        &self.name,
                        format!("{i} is outside {min:?}..={max:?}"),
                    ));
                }
                Ok(FieldValue::Int(i))
            }
            (FieldKind::Float { .. }, FieldValue::Int(i)) => Ok(FieldValue::Float(i as f64)),
            (FieldKind::Float { .. }, v @ FieldValue::Float(_)) => Ok(v),
            (FieldKind::Bool { .. }, v @ FieldValue::Bool(_)) => Ok(v),
            (
                FieldKind::Text { .. } | FieldKind::Dataset { .. } | FieldKind::Widget { .. },
                v @ FieldValue::Text(_),
            ) => Ok(v),
            (FieldKind::DatasetMulti { .. }, FieldValue::Text(s)) => Ok(FieldValue::List(vec![s])),
            (FieldKind::DatasetMulti { .. }, v @ FieldValue::List(_)) => Ok(v),
            (_, v) => Err(mismatch(&v)),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            FieldKind::Int { .. } => "an integer",
            FieldKind::Float { .. } => "a number",
            FieldKind::Bool { .. } => "a boolean",
            FieldKind::Text { .. } => "text",
            FieldKind::Dataset { .. } => "a dataset name",
            FieldKind::DatasetMulti { .. } => "a list of dataset names",
            FieldKind::Widget { .. } => "a widget path",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved values
// ---------------------------------------------------------------------------

/// A field value as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self {
        FieldValue::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

/// Field name → value, as handed to a plugin entry point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Parse a JSON object of `name: value` pairs.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Fill in defaults for anything not in `supplied` and check every value
    /// against its field declaration.
    pub fn resolve(fields: &[Field], supplied: &FieldValues) -> Result<Self> {
        for name in supplied.0.keys() {
            if !fields.iter().any(|f| &f.name == name) {
                log::warn!("Ignoring unknown field '{name}'");
            }
        }
        let mut resolved = BTreeMap::new();
        for field in fields {
            let value = match supplied.0.get(&field.name) {
                Some(v) => field.coerce(v.clone())?,
                None => field.default_value(),
            };
            resolved.insert(field.name.clone(), value);
        }
        Ok(FieldValues(resolved))
    }

    fn get(&self, name: &str) -> Result<&FieldValue> {
        self.0
            .get(name)
            .ok_or_else(|| Error::field(name, "no value supplied"))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            FieldValue::Int(i) => Ok(*i),
            other => Err(Error::field(name, format!("expected an integer, got {other:?}"))),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            FieldValue::Float(f) => Ok(*f),
            FieldValue::Int(i) => Ok(*i as f64),
            other => Err(Error::field(name, format!("expected a number, got {other:?}"))),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            FieldValue::Bool(b) => Ok(*b),
            other => Err(Error::field(name, format!("expected a boolean, got {other:?}"))),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            FieldValue::Text(s) => Ok(s),
            other => Err(Error::field(name, format!("expected text, got {other:?}"))),
        }
    }

    pub fn list(&self, name: &str) -> Result<&[String]> {
        match self.get(name)? {
            FieldValue::List(v) => Ok(v),
            other => Err(Error::field(name, format!("expected a list, got {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<Field> {
        vec![
            Field::int("dim", "dimension", 1).with_range(Some(0), None),
            Field::float("scale", "scale", 1.0),
            Field::dataset("xs_name", "x dataset"),
            Field::dataset_multi("repl", "replacements"),
            Field::bool("names", "create new names", false),
        ]
    }

    #[test]
    fn defaults_fill_missing() {
        let v = FieldValues::resolve(&fields(), &FieldValues::new()).unwrap();
        assert_eq!(v.int("dim").unwrap(), 1);
        assert_eq!(v.text("xs_name").unwrap(), "");
        assert!(v.list("repl").unwrap().is_empty());
        assert!(!v.bool("names").unwrap());
    }

    #[test]
    fn coercions() {
        let supplied = FieldValues::new().with("scale", 3i64).with("repl", "y*");
        let v = FieldValues::resolve(&fields(), &supplied).unwrap();
        assert_eq!(v.float("scale").unwrap(), 3.0);
        assert_eq!(v.list("repl").unwrap(), ["y*".to_string()]);
    }

    #[test]
    fn range_and_type_errors() {
        let below = FieldValues::new().with("dim", -1i64);
        assert!(matches!(
            FieldValues::resolve(&fields(), &below),
            Err(Error::Field { ref name, .. }) if name == "dim"
        ));
        let wrong = FieldValues::new().with("names", "yes");
        assert!(FieldValues::resolve(&fields(), &wrong).is_err());
    }

    #[test]
    fn parses_json_settings() {
        let supplied =
            FieldValues::from_json(r#"{"dim": 3, "xs_name": "x", "repl": ["a", "b*"], "names": true}"#)
                .unwrap();
        let v = FieldValues::resolve(&fields(), &supplied).unwrap();
        assert_eq!(v.int("dim").unwrap(), 3);
        assert_eq!(v.text("xs_name").unwrap(), "x");
        assert_eq!(v.list("repl").unwrap().len(), 2);
        assert!(v.bool("names").unwrap());
    }
}
