use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use super::image::ImageKind;
use crate::catalog::{EntityKind, GENERAL_FOLDER};
use crate::error::{ArenaError, Result};

/// A validated object storage key: relative, `/`-separated, no `..`,
/// URL-safe characters only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// `{folder}/{yyyy}/{mm}/{uuid}.{ext}` for a fresh upload.
    pub fn for_upload(folder: Option<&str>, kind: ImageKind) -> Result<Self> {
        Self::for_upload_at(folder, kind, Utc::now())
    }

    pub fn for_upload_at(
        folder: Option<&str>,
        kind: ImageKind,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let folder = upload_folder(folder)?;
        Ok(Self(format!(
            "{folder}/{:04}/{:02}/{}.{}",
            now.year(),
            now.month(),
            Uuid::new_v4(),
            kind.extension()
        )))
    }

    /// Validate a key received from a client.
    pub fn parse(raw: &str) -> Result<Self> {
        let key = raw.trim();
        let invalid = || ArenaError::invalid(format!("invalid object key '{raw}'"));

        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(invalid());
        }
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(invalid());
        }
        // URL-unreserved characters only, so keys join into storage URLs as-is.
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~'))
        {
            return Err(invalid());
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uploads land under an entity table name or `general`.
fn upload_folder(folder: Option<&str>) -> Result<&'static str> {
    let Some(raw) = folder.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(GENERAL_FOLDER);
    };
    if raw.eq_ignore_ascii_case(GENERAL_FOLDER) {
        return Ok(GENERAL_FOLDER);
    }
    raw.parse::<EntityKind>()
        .map(EntityKind::table)
        .map_err(|_| ArenaError::invalid(format!("unknown upload folder '{raw}'")))
}
