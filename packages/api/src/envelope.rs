//! Response envelopes wrapping every resource payload.
//!
//! | Shape | Used by |
//! |-------|---------|
//! | `{ "data": T }` | single-resource responses ([`Data<T>`]) |
//! | `{ "data": [T] }` | list responses ([`Data<Vec<T>>`]) |
//! | `{ "pagination": {…}, "data": [T] }` | paginated lists ([`Page<T>`]) |

use flatfile_core::{Decode, Decoded, Path, Record};
use serde::Serialize;
use serde_json::Value;

/// `{ "data": T }`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: Decode> Decode for Data<T> {
    fn shape() -> String {
        format!("Data<{}>", T::shape())
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, &Self::shape())?;
        let data = record.required("data");
        record.finish(|| Some(Data { data: data? }))
    }
}

/// Pagination metadata attached to paginated list responses.
///
/// Only parsed; the client never walks pages on its own. All three counts
/// accept any JSON number.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page this response holds. The platform may omit it; absence is kept
    /// as `None` rather than normalised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<f64>,
    pub page_count: f64,
    pub total_count: f64,
}

impl Pagination {
    /// `current_page`, treating an omitted page as page 0.
    pub fn current_page_or_default(&self) -> f64 {
        self.current_page.unwrap_or(0.0)
    }
}

impl Decode for Pagination {
    fn shape() -> String {
        "Pagination".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Pagination")?;
        let current_page = record.optional("currentPage");
        let page_count = record.required("pageCount");
        let total_count = record.required("totalCount");
        record.finish(|| {
            Some(Pagination {
                current_page: current_page?,
                page_count: page_count?,
                total_count: total_count?,
            })
        })
    }
}

/// `{ "pagination": Pagination, "data": [T] }`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub pagination: Pagination,
    pub data: Vec<T>,
}

impl<T: Decode> Decode for Page<T> {
    fn shape() -> String {
        format!("Page<{}>", T::shape())
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, &Self::shape())?;
        let pagination = record.required("pagination");
        let data = record.required("data");
        record.finish(|| {
            Some(Page {
                pagination: pagination?,
                data: data?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatfile_core::decode;
    use serde_json::json;

    #[test]
    fn data_envelope() {
        let wrapped: Data<Vec<String>> = decode(&json!({ "data": ["a", "b"] })).unwrap();
        assert_eq!(wrapped.into_inner(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_data_is_reported() {
        let err = decode::<Data<String>>(&json!({ "items": [] })).unwrap_err();
        assert!(err.has_failure_at("data"));
        assert_eq!(err.failures()[0].expected, "string");
    }

    #[test]
    fn current_page_absent_stays_absent() {
        let page: Page<String> = decode(&json!({
            "pagination": { "pageCount": 1, "totalCount": 2 },
            "data": ["x", "y"]
        }))
        .unwrap();
        assert_eq!(page.pagination.current_page, None);
        assert_eq!(page.pagination.current_page_or_default(), 0.0);

        let json = serde_json::to_value(&page).unwrap();
        assert!(json["pagination"].get("currentPage").is_none());
    }

    #[test]
    fn pagination_counts_are_plain_numbers() {
        let page: Page<String> = decode(&json!({
            "pagination": { "currentPage": 1.0, "pageCount": 2.5, "totalCount": -1 },
            "data": []
        }))
        .unwrap();
        assert_eq!(page.pagination.current_page, Some(1.0));
        assert_eq!(page.pagination.page_count, 2.5);
        assert_eq!(page.pagination.total_count, -1.0);
    }

    #[test]
    fn pagination_failures_are_nested() {
        let err = decode::<Page<String>>(&json!({
            "pagination": { "currentPage": "1", "pageCount": 1 },
            "data": []
        }))
        .unwrap_err();
        let paths: Vec<String> = err.failures().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(paths, vec!["pagination.currentPage", "pagination.totalCount"]);
    }
}
