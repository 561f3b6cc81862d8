use serde::{Deserialize, Serialize};

/// Page-based pagination parameters accepted by every listing route.
///
/// Pages are 1-indexed; a `page` of zero is treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pager {
    #[serde(default = "Pager::default_page")]
    pub page: u32,
    #[serde(default = "Pager::default_limit")]
    pub limit: u32,
}

impl Pager {
    const DEFAULT_PAGE: u32 = 1;
    const DEFAULT_LIMIT: u32 = 20;

    // Required by serde
    const fn default_page() -> u32 {
        Self::DEFAULT_PAGE
    }

    const fn default_limit() -> u32 {
        Self::DEFAULT_LIMIT
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.limit)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Builds the response pagination block for a page of results.
    ///
    /// `hasMore` is an approximation: a full page is assumed to have a
    /// successor, which is wrong only when the total count is an exact
    /// multiple of the limit.
    #[must_use]
    pub fn block<T>(&self, returned: &[T]) -> Pagination {
        Pagination {
            page: self.page.max(1),
            limit: self.limit,
            has_more: returned.len() as u64 == u64::from(self.limit),
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self { page: Self::DEFAULT_PAGE, limit: Self::DEFAULT_LIMIT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_one_indexed() {
        let pager = Pager { page: 1, limit: 20 };
        assert_eq!(pager.offset(), 0);

        let pager = Pager { page: 2, limit: 20 };
        assert_eq!(pager.offset(), 20);

        let pager = Pager { page: 3, limit: 5 };
        assert_eq!(pager.offset(), 10);
    }

    #[test]
    fn test_page_zero_is_treated_as_first() {
        let pager = Pager { page: 0, limit: 20 };
        assert_eq!(pager.offset(), 0);
        assert_eq!(pager.block(&[(); 3]).page, 1);
    }

    #[test]
    fn test_has_more_approximation() {
        let pager = Pager { page: 1, limit: 20 };

        // a partial page never has a successor
        assert!(!pager.block(&[(); 5]).has_more);

        // a full page is assumed to have one, even when the total
        // count is an exact multiple of the limit
        assert!(pager.block(&[(); 20]).has_more);
    }

    #[test]
    fn test_query_defaults() {
        let pager: Pager = serde_json::from_str("{}").unwrap();
        assert_eq!(pager, Pager { page: 1, limit: 20 });

        let pager: Pager = serde_json::from_str(r#"{"page": 4, "limit": 10}"#).unwrap();
        assert_eq!(pager, Pager { page: 4, limit: 10 });
    }

    #[test]
    fn test_serialized_block_shape() {
        let block = Pager { page: 2, limit: 20 }.block(&[(); 20]);
        let value = serde_json::to_value(block).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"page": 2, "limit": 20, "hasMore": true})
        );
    }
}
