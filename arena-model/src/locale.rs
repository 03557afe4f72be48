use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content languages served by the consumer app.
///
/// Spanish is the source language; English and Portuguese are filled in by
/// the translation pipeline into `_en` / `_pt` suffixed columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
    Pt,
}

impl Locale {
    pub const TRANSLATED: [Locale; 2] = [Locale::En, Locale::Pt];

    pub fn code(self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
            Locale::Pt => "pt",
        }
    }

    /// Column suffix for translated companions, `None` for the source language.
    pub fn column_suffix(self) -> Option<&'static str> {
        match self {
            Locale::Es => None,
            Locale::En => Some("_en"),
            Locale::Pt => Some("_pt"),
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Locale::Es => "Spanish",
            Locale::En => "English",
            Locale::Pt => "Brazilian Portuguese",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        // Accept region-qualified tags like "pt-BR" or "en_US".
        let primary = lowered.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            "pt" => Ok(Locale::Pt),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_region_tags() {
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::Pt);
        assert_eq!("EN_us".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("es".parse::<Locale>().unwrap(), Locale::Es);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn suffixes() {
        assert_eq!(Locale::Es.column_suffix(), None);
        assert_eq!(Locale::En.column_suffix(), Some("_en"));
        assert_eq!(Locale::Pt.column_suffix(), Some("_pt"));
    }
}
