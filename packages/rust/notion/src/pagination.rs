//! Cursor-paginated list envelope shared by the query and block endpoints.

use serde::Deserialize;

/// One page of a Notion list response.
#[derive(Debug, Deserialize)]
pub(crate) struct PaginatedList<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> PaginatedList<T> {
    /// Cursor for the following request, or `None` once the list is exhausted.
    ///
    /// A response claiming `has_more` without a cursor is treated as the end,
    /// since there is nothing to continue from.
    pub fn continuation(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        match self.next_cursor.as_deref() {
            Some(cursor) if !cursor.is_empty() => Some(cursor),
            _ => {
                tracing::warn!("has_more set without next_cursor, stopping pagination");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_follows_cursor() {
        let list: PaginatedList<u32> = serde_json::from_str(
            r#"{"object": "list", "results": [1, 2], "has_more": true, "next_cursor": "abc"}"#,
        )
        .unwrap();
        assert_eq!(list.results, vec![1, 2]);
        assert_eq!(list.continuation(), Some("abc"));
    }

    #[test]
    fn continuation_ends_without_more() {
        let list: PaginatedList<u32> =
            serde_json::from_str(r#"{"results": [], "has_more": false, "next_cursor": null}"#)
                .unwrap();
        assert_eq!(list.continuation(), None);
    }

    #[test]
    fn continuation_ends_on_missing_cursor() {
        let list: PaginatedList<u32> =
            serde_json::from_str(r#"{"has_more": true, "next_cursor": null}"#).unwrap();
        assert!(list.results.is_empty());
        assert_eq!(list.continuation(), None);
    }
}
