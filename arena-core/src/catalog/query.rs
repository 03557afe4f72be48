use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 100;

/// Filters and paging accepted by the listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Case-insensitive substring over `nombre` and `descripcion`.
    pub q: Option<String>,
    pub zona: Option<String>,
    pub destacado: Option<bool>,
    /// Eventos only: hide events that already ended.
    pub upcoming: Option<bool>,
    pub include_inactive: Option<bool>,
}

impl ListingQuery {
    /// The same filters with inactive rows always hidden.
    pub fn public(mut self) -> Self {
        self.include_inactive = None;
        self
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.per_page())
    }

    pub fn include_inactive(&self) -> bool {
        self.include_inactive.unwrap_or(false)
    }

    pub fn upcoming(&self) -> bool {
        self.upcoming.unwrap_or(false)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn zona(&self) -> Option<&str> {
        self.zona.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// `ILIKE` pattern for the search term with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.search_term().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for ch in term.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_and_clamps() {
        let query = ListingQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(query.offset(), 0);

        let query = ListingQuery {
            page: Some(0),
            per_page: Some(1000),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), MAX_PER_PAGE);

        let query = ListingQuery {
            page: Some(3),
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(query.per_page(), 1);
        assert_eq!(query.offset(), 2);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        let query = ListingQuery {
            q: Some(" 100%_off\\ ".into()),
            ..Default::default()
        };
        assert_eq!(query.like_pattern().as_deref(), Some("%100\\%\\_off\\\\%"));

        let blank = ListingQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.like_pattern(), None);
    }

    #[test]
    fn public_drops_include_inactive() {
        let query = ListingQuery {
            include_inactive: Some(true),
            ..Default::default()
        }
        .public();
        assert!(!query.include_inactive());
    }
}
