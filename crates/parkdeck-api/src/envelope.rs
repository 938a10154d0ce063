// Response envelope normalization and paging types.
//
// The platform wraps most payloads as `{ "success": bool, "data": ... }`,
// where `data` is either a bare value or a Spring-style page
// `{ "content": [...], "totalPages": N, "totalElements": M }`. A few
// older endpoints return the bare value with no wrapper at all. Every
// response passes through this module exactly once, so downstream
// consumers only ever see one shape.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

// ── Request-side paging ──────────────────────────────────────────────

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    /// Newest first. The crate-wide default for every list endpoint --
    /// sibling endpoints do not get to drift apart.
    #[default]
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Pagination parameters sent with every list request.
///
/// One default for the whole crate: page 0, 20 elements, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_dir: SortDir,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort_dir: SortDir::default(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Self::default()
        }
    }

    /// Wire query parameters (`page`, `size`, `sortOrder`).
    pub fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortOrder", self.sort_dir.as_str().to_owned()),
        ]
    }
}

// ── Response-side paging ─────────────────────────────────────────────

/// One page of a paginated collection, after normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Wrap a bare array as a single complete page.
    fn from_items(items: Vec<T>) -> Self {
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        Self {
            content: items,
            total_pages: 1,
            total_elements: total,
        }
    }
}

// ── Envelope unwrapping ──────────────────────────────────────────────

/// Strip the `{ success, data }` wrapper if present, returning the
/// payload value. `success: false` becomes [`Error::Api`] carrying the
/// server's `message` verbatim when present.
///
/// This is the only place in the workspace that knows about the
/// wrapper; callers receive one stable shape.
pub(crate) fn unwrap_data(body: &str, status: u16) -> Result<Value, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })?;

    match value.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(value.get("data").cloned().unwrap_or(Value::Null)),
        Some(false) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| "request rejected by server".to_owned(), str::to_owned);
            let code = value
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_owned);
            Err(Error::Api {
                status,
                message,
                code,
            })
        }
        // No wrapper -- the bare payload is the data.
        None => Ok(value),
    }
}

/// Deserialize an unwrapped payload into a concrete type.
pub(crate) fn decode<T: DeserializeOwned>(data: Value, body: &str) -> Result<T, Error> {
    serde_json::from_value(data).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Interpret an unwrapped payload as a page of `T`.
///
/// Accepts both the `{ content, totalPages, totalElements }` body and a
/// bare array (older endpoints), so callers never branch on shape.
pub(crate) fn decode_page<T: DeserializeOwned>(data: Value, body: &str) -> Result<Page<T>, Error> {
    let is_page_object = data
        .as_object()
        .is_some_and(|map| map.contains_key("content"));
    if is_page_object {
        return decode(data, body);
    }

    match data {
        Value::Array(_) => {
            let items: Vec<T> = decode(data, body)?;
            Ok(Page::from_items(items))
        }
        other => Err(Error::Envelope {
            message: format!(
                "expected a page object or array, got {}",
                type_name(&other)
            ),
        }),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: i64,
    }

    #[test]
    fn unwraps_success_envelope() {
        let body = r#"{"success": true, "data": {"id": 7}}"#;
        let data = unwrap_data(body, 200).unwrap();
        let item: Item = decode(data, body).unwrap();
        assert_eq!(item, Item { id: 7 });
    }

    #[test]
    fn unwraps_paged_envelope() {
        let body = r#"{
            "success": true,
            "data": {"content": [{"id": 1}, {"id": 2}], "totalPages": 5, "totalElements": 42}
        }"#;
        let data = unwrap_data(body, 200).unwrap();
        let page: Page<Item> = decode_page(data, body).unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.total_elements, 42);
    }

    #[test]
    fn accepts_bare_array_as_single_page() {
        let body = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;
        let data = unwrap_data(body, 200).unwrap();
        let page: Page<Item> = decode_page(data, body).unwrap();
        assert_eq!(page.content.len(), 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn accepts_bare_object() {
        let body = r#"{"id": 9}"#;
        let data = unwrap_data(body, 200).unwrap();
        let item: Item = decode(data, body).unwrap();
        assert_eq!(item, Item { id: 9 });
    }

    #[test]
    fn success_false_carries_server_message() {
        let body = r#"{"success": false, "message": "lot name already taken"}"#;
        let err = unwrap_data(body, 200).unwrap_err();
        match err {
            Error::Api { message, .. } => assert_eq!(message, "lot name already taken"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn success_false_without_message_uses_fallback() {
        let body = r#"{"success": false}"#;
        let err = unwrap_data(body, 200).unwrap_err();
        assert_eq!(
            err.server_message(),
            Some("request rejected by server")
        );
    }

    #[test]
    fn scalar_payload_is_not_a_page() {
        let body = r#"{"success": true, "data": 3}"#;
        let data = unwrap_data(body, 200).unwrap();
        assert!(matches!(
            decode_page::<Item>(data, body),
            Err(Error::Envelope { .. })
        ));
    }

    #[test]
    fn default_page_request_is_standardized() {
        let req = PageRequest::default();
        assert_eq!(req.page, 0);
        assert_eq!(req.size, 20);
        assert_eq!(req.sort_dir, SortDir::Desc);
    }
}
