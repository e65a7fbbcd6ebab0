/* 📖 # How do list endpoints filter and page?

List endpoints read their filters from the request payload and apply them to a
literal table. An empty search term and an empty category list match every row.
A page size of zero or less returns the whole filtered set, so the default
samples (which send `rowsPerPage: 0`) see everything.
*/

use serde::Serialize;
use serde_json::Value;

/// Paging fields of a request payload, with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// 1-based.
    pub page: i64,
    pub rows_per_page: i64,
    pub sort_by: String,
    pub descending: bool,
}

impl PageRequest {
    /// Read `payload.pagination`. A missing page size falls back to `default_rows`.
    pub fn from_payload(payload: Option<&Value>, default_rows: i64) -> Self {
        let pagination = payload.and_then(|p| p.get("pagination"));
        let field = |name: &str| pagination.and_then(|p| p.get(name));
        Self {
            page: field("page").and_then(as_integer).unwrap_or(1).max(1),
            rows_per_page: field("rowsPerPage")
                .and_then(as_integer)
                .unwrap_or(default_rows),
            sort_by: field("sortBy")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("id")
                .to_string(),
            descending: field("descending")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Slice `rows` to this page.
    pub fn apply<T: Clone>(&self, rows: &[T]) -> Vec<T> {
        paginate(rows, self.page, self.rows_per_page)
    }

    /// Pagination block echoed in list responses.
    pub fn block(&self, total: usize) -> PaginationBlock {
        PaginationBlock {
            page: self.page,
            rows_per_page: self.rows_per_page,
            sort_by: self.sort_by.clone(),
            descending: self.descending,
            total,
        }
    }
}

/// `pagination` object of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBlock {
    pub page: i64,
    pub rows_per_page: i64,
    pub sort_by: String,
    pub descending: bool,
    pub total: usize,
}

fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

/// Rows `[(page-1)*size, page*size)` of `rows`, clipped to its bounds.
///
/// A size of zero or less disables slicing. A page below 1 counts as page 1.
pub fn paginate<T: Clone>(rows: &[T], page: i64, rows_per_page: i64) -> Vec<T> {
    if rows_per_page <= 0 {
        return rows.to_vec();
    }
    let page = page.max(1);
    let start = (page - 1).saturating_mul(rows_per_page);
    let end = start.saturating_add(rows_per_page);
    let clip = |index: i64| usize::try_from(index).map_or(rows.len(), |i| i.min(rows.len()));
    rows[clip(start)..clip(end)].to_vec()
}

/// Search and category filters of a product list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Lowercased search term. Empty matches everything.
    pub search: String,
    pub categories: Vec<i64>,
}

impl ProductFilter {
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let search = payload
            .and_then(|p| p.get("search"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        let categories = payload
            .and_then(|p| p.get("selectedCategories"))
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(as_integer).collect())
            .unwrap_or_default();
        Self { search, categories }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_lowercase();
        self
    }

    /// Case-insensitive substring match on `title` or `sku`, and category membership.
    pub fn matches(&self, row: &Value) -> bool {
        let contains = |field: &str| {
            row.get(field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&self.search))
        };
        let search_ok = self.search.is_empty() || contains("title") || contains("sku");
        let category_ok = self.categories.is_empty()
            || row
                .get("category")
                .and_then(|c| c.get("id"))
                .and_then(as_integer)
                .is_some_and(|id| self.categories.contains(&id));
        search_ok && category_ok
    }

    pub fn apply(&self, rows: &[Value]) -> Vec<Value> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

/// `date: {from, to}` filter of report requests, inclusive on both ends.
///
/// Dates are compared as `YYYY-MM-DD` strings against the `created_at` prefix.
/// Slashes in the request are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let date = payload.and_then(|p| p.get("date"));
        let bound = |name: &str| {
            date.and_then(|d| d.get(name))
                .and_then(Value::as_str)
                .map(|s| s.trim().replace('/', "-"))
                .filter(|s| !s.is_empty())
        };
        Self {
            from: bound("from"),
            to: bound("to"),
        }
    }

    pub fn contains(&self, row: &Value) -> bool {
        let Some(created) = row.get("created_at").and_then(Value::as_str) else {
            return true;
        };
        let day = created.get(..10).unwrap_or(created);
        self.from.as_deref().is_none_or(|from| day >= from)
            && self.to.as_deref().is_none_or(|to| day <= to)
    }

    pub fn apply(&self, rows: &[Value]) -> Vec<Value> {
        rows.iter().filter(|row| self.contains(row)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;
    use serde_json::json;

    #[test]
    fn test_paginate_slices_pages() {
        let rows: Vec<i32> = (1..=7).collect();
        assert_eq!(paginate(&rows, 1, 3), vec![1, 2, 3]);
        assert_eq!(paginate(&rows, 3, 3), vec![7]);
        assert_eq!(paginate(&rows, 4, 3), Vec::<i32>::new());
    }

    #[test]
    fn test_paginate_non_positive_size_returns_all() {
        let rows = vec!["a", "b"];
        assert_eq!(paginate(&rows, 5, 0), rows);
        assert_eq!(paginate(&rows, 1, -2), rows);
    }

    #[test]
    fn test_paginate_page_below_one_is_first_page() {
        let rows: Vec<i32> = (1..=4).collect();
        assert_eq!(paginate(&rows, 0, 2), vec![1, 2]);
        assert_eq!(paginate(&rows, -3, 2), vec![1, 2]);
    }

    #[test]
    fn test_paginate_slice_property() {
        let rows: Vec<usize> = (0..11).collect();
        for size in 1..5i64 {
            for page in 1..6i64 {
                let start = ((page - 1) * size) as usize;
                let end = (page * size) as usize;
                let expected: Vec<usize> =
                    rows[start.min(rows.len())..end.min(rows.len())].to_vec();
                assert_eq!(paginate(&rows, page, size), expected);
            }
        }
    }

    #[test]
    fn test_paginate_huge_page_does_not_overflow() {
        let rows = vec![1, 2, 3];
        assert!(paginate(&rows, i64::MAX, i64::MAX).is_empty());
    }

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::from_payload(Some(&json!({})), 100000000);
        assert_eq!(
            request,
            PageRequest {
                page: 1,
                rows_per_page: 100000000,
                sort_by: "id".to_string(),
                descending: false,
            }
        );
        let block = serde_json::to_string(&request.block(1)).unwrap();
        assert_eq!(
            block,
            r#"{"page":1,"rowsPerPage":100000000,"sortBy":"id","descending":false,"total":1}"#
        );
    }

    #[test]
    fn test_product_filter_search_and_category() {
        let products = mock_data::products();
        let by_title = ProductFilter::default().with_search("Amazon").apply(&products);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0]["sku"], "OFFAMAZONNW");

        let by_sku = ProductFilter::default().with_search("gv").apply(&products);
        assert_eq!(by_sku[0]["id"], 696);

        let shopping = ProductFilter::from_payload(Some(&json!({"selectedCategories": [7]})));
        assert_eq!(shopping.apply(&products).len(), 1);

        assert_eq!(ProductFilter::default().apply(&products).len(), 3);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::from_payload(Some(&json!({
            "date": {"from": "2025/06/21", "to": "2025/06/30"}
        })));
        let rows = mock_data::wallet_statement_rows();
        let kept = range.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["txn_type"], "debit");
        assert_eq!(DateRange::default().apply(&rows).len(), 2);
    }
}
