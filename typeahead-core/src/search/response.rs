//! Response body of the search endpoint.
//!
//! Records are kept verbatim: only `title` is lifted out for display, every
//! other field rides along in `extra` untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// One document record as returned by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    #[serde(
        default,
        deserialize_with = "lenient_title",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchDoc {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            extra: Map::new(),
        }
    }

    /// Title to render; records without one render as an empty string.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// A title that is not a string counts as missing; it must not sink the
/// rest of the body.
fn lenient_title<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(title) => Some(title),
        _ => None,
    })
}

/// Top-level JSON document: `{ "numFound": n, "docs": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub docs: Vec<SearchDoc>,

    #[serde(default)]
    pub num_found: Option<u64>,
}

impl SearchResponse {
    /// Parse a response body. A body without a `docs` list is malformed.
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// What a successful lookup hands back to the widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub docs: Vec<SearchDoc>,
    pub total: Option<u64>,
}

impl From<SearchResponse> for SearchHits {
    fn from(resp: SearchResponse) -> Self {
        Self {
            docs: resp.docs,
            total: resp.num_found,
        }
    }
}

impl From<Vec<SearchDoc>> for SearchHits {
    fn from(docs: Vec<SearchDoc>) -> Self {
        Self { docs, total: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_are_kept_verbatim() {
        let body = br#"{
            "numFound": 2,
            "start": 0,
            "docs": [
                {"title": "The Hobbit", "author_name": ["J.R.R. Tolkien"], "first_publish_year": 1937},
                {"key": "/works/OL1W"}
            ]
        }"#;

        let resp = SearchResponse::from_slice(body).unwrap();
        assert_eq!(resp.num_found, Some(2));
        assert_eq!(resp.docs.len(), 2);

        let hobbit = &resp.docs[0];
        assert_eq!(hobbit.display_title(), "The Hobbit");
        assert_eq!(hobbit.extra["first_publish_year"], 1937);
        assert_eq!(hobbit.extra["author_name"][0], "J.R.R. Tolkien");

        let untitled = &resp.docs[1];
        assert_eq!(untitled.title, None);
        assert_eq!(untitled.display_title(), "");
        assert_eq!(untitled.extra["key"], "/works/OL1W");
    }

    #[test]
    fn missing_docs_is_malformed() {
        let err = SearchResponse::from_slice(br#"{"numFound": 0}"#).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = SearchResponse::from_slice(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn null_title_renders_empty() {
        let resp = SearchResponse::from_slice(br#"{"docs": [{"title": null}]}"#).unwrap();
        assert_eq!(resp.docs[0].display_title(), "");
        assert_eq!(SearchHits::from(resp).total, None);
    }

    #[test]
    fn odd_title_types_only_blank_their_own_row() {
        let body = br#"{"docs": [
            {"title": "Good"},
            {"title": 42},
            {"title": ["a", "b"], "key": "/works/OL2W"},
            {"title": {"en": "Nested"}},
            {"title": "Also good"}
        ]}"#;

        let resp = SearchResponse::from_slice(body).unwrap();
        let titles: Vec<&str> = resp.docs.iter().map(SearchDoc::display_title).collect();
        assert_eq!(titles, ["Good", "", "", "", "Also good"]);
        assert_eq!(resp.docs[2].extra["key"], "/works/OL2W");
    }
}
