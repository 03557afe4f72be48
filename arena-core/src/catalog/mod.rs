//! Listing catalog: the seven entity tables and the rules for reading and
//! writing their rows.

pub mod fields;
pub mod listing;
pub mod query;
pub mod schema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use fields::{FieldValue, ListingFields, WriteMode};
pub use listing::Listing;
pub use query::ListingQuery;
pub use schema::{Column, ColumnType, EntitySchema, WritableColumn};

use crate::error::ArenaError;
use schema::{BARES, CAFES, EVENTOS, GALERIAS, HOTELES, RESTAURANTES, SHOPPING};

/// Folder name for uploads not tied to an entity table.
pub const GENERAL_FOLDER: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Restaurantes,
    Bares,
    Cafes,
    Hoteles,
    Galerias,
    Shopping,
    Eventos,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Restaurantes,
        EntityKind::Bares,
        EntityKind::Cafes,
        EntityKind::Hoteles,
        EntityKind::Galerias,
        EntityKind::Shopping,
        EntityKind::Eventos,
    ];

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Restaurantes => "restaurantes",
            EntityKind::Bares => "bares",
            EntityKind::Cafes => "cafes",
            EntityKind::Hoteles => "hoteles",
            EntityKind::Galerias => "galerias",
            EntityKind::Shopping => "shopping",
            EntityKind::Eventos => "eventos",
        }
    }

    /// Singular tag stored in `favoritos.item_type`.
    pub fn item_tag(self) -> &'static str {
        match self {
            EntityKind::Restaurantes => "restaurante",
            EntityKind::Bares => "bar",
            EntityKind::Cafes => "cafe",
            EntityKind::Hoteles => "hotel",
            EntityKind::Galerias => "galeria",
            EntityKind::Shopping => "shopping",
            EntityKind::Eventos => "evento",
        }
    }

    pub fn schema(self) -> EntitySchema {
        let specific = match self {
            EntityKind::Restaurantes => RESTAURANTES,
            EntityKind::Bares => BARES,
            EntityKind::Cafes => CAFES,
            EntityKind::Hoteles => HOTELES,
            EntityKind::Galerias => GALERIAS,
            EntityKind::Shopping => SHOPPING,
            EntityKind::Eventos => EVENTOS,
        };
        EntitySchema::new(specific)
    }

    pub fn is_dated(self) -> bool {
        matches!(self, EntityKind::Eventos)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for EntityKind {
    type Err = ArenaError;

    /// Accepts the table name or the favorites tag, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.table() == wanted || kind.item_tag() == wanted)
            .ok_or_else(|| ArenaError::NotFound(format!("unknown entity '{s}'")))
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.table())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tables_and_tags() {
        assert_eq!("bares".parse::<EntityKind>().unwrap(), EntityKind::Bares);
        assert_eq!("Bar".parse::<EntityKind>().unwrap(), EntityKind::Bares);
        assert_eq!(
            " EVENTO ".parse::<EntityKind>().unwrap(),
            EntityKind::Eventos
        );
        assert!(matches!(
            "museos".parse::<EntityKind>(),
            Err(ArenaError::NotFound(_))
        ));
    }

    #[test]
    fn tags_and_tables_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in EntityKind::ALL {
            assert!(seen.insert(kind.table()));
            if kind.item_tag() != kind.table() {
                assert!(seen.insert(kind.item_tag()));
            }
        }
    }

    #[test]
    fn only_eventos_are_dated() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.is_dated(), kind.schema().has_column("fecha_inicio"));
        }
    }

    #[test]
    fn serializes_as_table_name() {
        let json = serde_json::to_string(&EntityKind::Galerias).unwrap();
        assert_eq!(json, "\"galerias\"");
    }
}
