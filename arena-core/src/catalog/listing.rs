use arena_model::Locale;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::EntityKind;
use super::schema::companion_column;
use crate::error::{ArenaError, Result};

/// One row of a listing table, kept as the JSON object the database
/// produced so every kind shares a single representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub kind: EntityKind,
    pub id: i64,
    pub data: Map<String, Value>,
}

impl Listing {
    pub fn from_row(kind: EntityKind, row: Value) -> Result<Self> {
        let Value::Object(data) = row else {
            return Err(ArenaError::Internal(format!(
                "{kind} row did not decode to an object"
            )));
        };
        let id = data.get("id").and_then(Value::as_i64).ok_or_else(|| {
            ArenaError::Internal(format!("{kind} row is missing its id"))
        })?;
        Ok(Self { kind, id, data })
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.data
            .get(column)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.data
            .get("activo")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Swap every translatable field for its `locale` companion when one is
    /// filled in; Spanish text stays as the fallback.
    pub fn localized(&self, locale: Locale) -> Listing {
        let mut localized = self.clone();
        if locale == Locale::Es {
            return localized;
        }

        for column in self.kind.schema().translatable() {
            let Some(companion) = companion_column(column.name, locale) else {
                continue;
            };
            if let Some(text) = self.text(&companion) {
                localized
                    .data
                    .insert(column.name.to_string(), Value::String(text.to_string()));
            }
        }
        localized
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}
