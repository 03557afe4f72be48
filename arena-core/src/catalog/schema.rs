//! Static column layout of every listing table.
//!
//! Identifiers used to build SQL come only from these tables; request input
//! is matched against them and never interpolated.

use arena_model::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    TextList,
    Integer,
    Float,
    Boolean,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    /// Spanish source text with `_en` / `_pt` companions.
    pub translatable: bool,
    pub required: bool,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Text,
        translatable: false,
        required: false,
    }
}

const fn translatable(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Text,
        translatable: true,
        required: false,
    }
}

const fn typed(name: &'static str, ty: ColumnType) -> Column {
    Column {
        name,
        ty,
        translatable: false,
        required: false,
    }
}

const fn required(column: Column) -> Column {
    Column {
        required: true,
        ..column
    }
}

/// Columns no client may write.
pub const READ_ONLY_COLUMNS: [&str; 4] =
    ["id", "created_at", "updated_at", "traducido_at"];

pub(crate) const COMMON_COLUMNS: &[Column] = &[
    required(text("nombre")),
    translatable("descripcion"),
    text("direccion"),
    text("zona"),
    text("telefono"),
    text("email"),
    text("sitio_web"),
    text("instagram"),
    text("imagen_url"),
    typed("galeria_imagenes", ColumnType::TextList),
    typed("latitud", ColumnType::Float),
    typed("longitud", ColumnType::Float),
    typed("destacado", ColumnType::Boolean),
    typed("activo", ColumnType::Boolean),
];

pub(crate) const RESTAURANTES: &[Column] = &[
    translatable("tipo_cocina"),
    translatable("horario"),
    text("rango_precio"),
];

pub(crate) const BARES: &[Column] = &[
    translatable("tipo_bar"),
    translatable("horario"),
    text("rango_precio"),
];

pub(crate) const CAFES: &[Column] = &[
    translatable("especialidad"),
    translatable("horario"),
    typed("wifi", ColumnType::Boolean),
];

pub(crate) const HOTELES: &[Column] = &[
    typed("estrellas", ColumnType::Integer),
    translatable("servicios"),
    text("rango_precio"),
];

pub(crate) const GALERIAS: &[Column] = &[
    translatable("tipo_arte"),
    translatable("horario"),
    text("artistas"),
];

pub(crate) const SHOPPING: &[Column] = &[
    translatable("horario"),
    translatable("servicios"),
    typed("cantidad_locales", ColumnType::Integer),
];

pub(crate) const EVENTOS: &[Column] = &[
    translatable("categoria"),
    required(typed("fecha_inicio", ColumnType::Date)),
    typed("fecha_fin", ColumnType::Date),
    text("hora"),
    text("lugar"),
    text("precio"),
];

/// A writable column resolved against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritableColumn {
    Source(&'static Column),
    /// `{source}_en` or `{source}_pt`.
    Companion {
        source: &'static Column,
        locale: Locale,
    },
}

impl WritableColumn {
    pub fn ty(&self) -> ColumnType {
        match self {
            WritableColumn::Source(column) => column.ty,
            WritableColumn::Companion { .. } => ColumnType::Text,
        }
    }

    pub fn required(&self) -> bool {
        matches!(self, WritableColumn::Source(column) if column.required)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    specific: &'static [Column],
}

impl EntitySchema {
    pub(crate) const fn new(specific: &'static [Column]) -> Self {
        Self { specific }
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static Column> + '_ {
        COMMON_COLUMNS.iter().chain(self.specific.iter())
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns().find(|column| column.name == name)
    }

    pub fn translatable(&self) -> impl Iterator<Item = &'static Column> + '_ {
        self.columns().filter(|column| column.translatable)
    }

    pub fn required(&self) -> impl Iterator<Item = &'static Column> + '_ {
        self.columns().filter(|column| column.required)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Resolve a payload key to a column the API may write.
    pub fn writable(&self, name: &str) -> Option<WritableColumn> {
        if let Some(column) = self.column(name) {
            return Some(WritableColumn::Source(column));
        }

        Locale::TRANSLATED.into_iter().find_map(|locale| {
            let suffix = locale.column_suffix()?;
            let base = name.strip_suffix(suffix)?;
            self.column(base)
                .filter(|column| column.translatable)
                .map(|source| WritableColumn::Companion { source, locale })
        })
    }
}

/// Name of the localized companion column for `source`.
pub fn companion_column(source: &str, locale: Locale) -> Option<String> {
    locale
        .column_suffix()
        .map(|suffix| format!("{source}{suffix}"))
}
