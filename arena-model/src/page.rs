use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was served.
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page)) as u32
        };

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn empty(page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), page, per_page, 0)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 1, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
    }

    #[test]
    fn empty_page_has_no_pages() {
        let page: Page<u8> = Page::empty(1, 12);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn map_preserves_counters() {
        let page = Page::new(vec![1, 2], 2, 2, 4).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next());
    }
}
