use std::collections::BTreeMap;

use arena_model::Locale;
use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::EntityKind;
use super::schema::{ColumnType, READ_ONLY_COLUMNS, companion_column};
use crate::error::{ArenaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// A validated column value, typed so it can be bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    TextList(Option<Vec<String>>),
    Integer(Option<i64>),
    Float(Option<f64>),
    Boolean(bool),
    Date(Option<NaiveDate>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        match self {
            FieldValue::Text(v) => v.is_none(),
            FieldValue::TextList(v) => v.is_none(),
            FieldValue::Integer(v) => v.is_none(),
            FieldValue::Float(v) => v.is_none(),
            FieldValue::Boolean(_) => false,
            FieldValue::Date(v) => v.is_none(),
        }
    }

    /// JSON form as it would come back from the database.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(v) => v.clone().map_or(Value::Null, Value::String),
            FieldValue::TextList(v) => v.as_ref().map_or(Value::Null, |items| {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }),
            FieldValue::Integer(v) => v.map_or(Value::Null, Value::from),
            FieldValue::Float(v) => v.map_or(Value::Null, Value::from),
            FieldValue::Boolean(v) => Value::Bool(*v),
            FieldValue::Date(v) => v.map_or(Value::Null, |date| {
                Value::String(date.format("%Y-%m-%d").to_string())
            }),
        }
    }

    fn coerce(column: &str, ty: ColumnType, raw: &Value) -> Result<Self> {
        let mismatch = |expected: &str| {
            ArenaError::invalid(format!("field '{column}' must be {expected}"))
        };

        match ty {
            ColumnType::Text => match raw {
                Value::Null => Ok(FieldValue::Text(None)),
                Value::String(s) => Ok(FieldValue::Text(non_empty(s))),
                Value::Number(n) => Ok(FieldValue::Text(Some(n.to_string()))),
                _ => Err(mismatch("a string")),
            },
            ColumnType::TextList => match raw {
                Value::Null => Ok(FieldValue::TextList(None)),
                Value::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        let Value::String(s) = item else {
                            return Err(mismatch("an array of strings"));
                        };
                        if let Some(s) = non_empty(s) {
                            values.push(s);
                        }
                    }
                    Ok(FieldValue::TextList(Some(values)))
                }
                _ => Err(mismatch("an array of strings")),
            },
            ColumnType::Integer => match raw {
                Value::Null => Ok(FieldValue::Integer(None)),
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| {
                        n.as_f64()
                            .filter(|f| {
                                f.fract() == 0.0
                                    && (i64::MIN as f64..i64::MAX as f64).contains(f)
                            })
                            .map(|f| f as i64)
                    })
                    .map(|v| FieldValue::Integer(Some(v)))
                    .ok_or_else(|| mismatch("a whole number")),
                _ => Err(mismatch("a whole number")),
            },
            ColumnType::Float => match raw {
                Value::Null => Ok(FieldValue::Float(None)),
                Value::Number(n) => n
                    .as_f64()
                    .map(|v| FieldValue::Float(Some(v)))
                    .ok_or_else(|| mismatch("a number")),
                _ => Err(mismatch("a number")),
            },
            ColumnType::Boolean => match raw {
                Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
                _ => Err(mismatch("true or false")),
            },
            ColumnType::Date => match raw {
                Value::Null => Ok(FieldValue::Date(None)),
                Value::String(s) if s.trim().is_empty() => {
                    Ok(FieldValue::Date(None))
                }
                Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map(|d| FieldValue::Date(Some(d)))
                    .map_err(|_| mismatch("a date formatted YYYY-MM-DD")),
                _ => Err(mismatch("a date formatted YYYY-MM-DD")),
            },
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validated column values for one insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFields {
    kind: EntityKind,
    mode: WriteMode,
    values: BTreeMap<String, FieldValue>,
}

impl ListingFields {
    pub fn from_payload(
        kind: EntityKind,
        payload: &Value,
        mode: WriteMode,
    ) -> Result<Self> {
        let Value::Object(object) = payload else {
            return Err(ArenaError::invalid("request body must be a JSON object"));
        };

        let schema = kind.schema();
        let mut values = BTreeMap::new();

        for (key, raw) in object {
            if READ_ONLY_COLUMNS.contains(&key.as_str()) {
                return Err(ArenaError::invalid(format!(
                    "field '{key}' is read-only"
                )));
            }
            let Some(column) = schema.writable(key) else {
                return Err(ArenaError::invalid(format!(
                    "unknown field '{key}' for {kind}"
                )));
            };

            let value = FieldValue::coerce(key, column.ty(), raw)?;
            if column.required() && value.is_null() {
                return Err(ArenaError::invalid(format!(
                    "field '{key}' is required"
                )));
            }
            values.insert(key.clone(), value);
        }

        match mode {
            WriteMode::Create => {
                if let Some(missing) =
                    schema.required().find(|c| !values.contains_key(c.name))
                {
                    return Err(ArenaError::invalid(format!(
                        "field '{}' is required",
                        missing.name
                    )));
                }
            }
            WriteMode::Update => {
                if values.is_empty() {
                    return Err(ArenaError::invalid(
                        "update must include at least one field",
                    ));
                }
                // A cleared source takes its translations with it.
                for column in schema.translatable() {
                    if !values.get(column.name).is_some_and(FieldValue::is_null) {
                        continue;
                    }
                    for locale in Locale::TRANSLATED {
                        if let Some(companion) = companion_column(column.name, locale) {
                            values.entry(companion).or_insert(FieldValue::Text(None));
                        }
                    }
                }
            }
        }

        Ok(Self { kind, mode, values })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Translatable Spanish columns this write sets to a non-empty value.
    pub fn changed_sources(&self) -> Vec<&'static str> {
        self.kind
            .schema()
            .translatable()
            .filter(|column| {
                self.values
                    .get(column.name)
                    .is_some_and(|value| !value.is_null())
            })
            .map(|column| column.name)
            .collect()
    }

    /// Row-shaped JSON for the values in this write.
    pub fn to_json(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}
