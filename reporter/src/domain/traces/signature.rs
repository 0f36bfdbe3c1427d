//! Query signatures
//!
//! Traces are grouped by the shape of the query that produced them. The
//! signature is the operation name followed by the query text with incidental
//! whitespace collapsed, so the same operation sent by differently formatting
//! clients lands in the same bucket.

use crate::utils::string::{collapse_whitespace, non_blank};

/// Operation name used when the request did not name one
pub const ANONYMOUS_OPERATION: &str = "-";

/// `"# <operation>\n<collapsed query>"`
pub fn query_signature(operation_name: Option<&str>, query: Option<&str>) -> String {
    format!(
        "# {}\n{}",
        non_blank(operation_name).unwrap_or(ANONYMOUS_OPERATION),
        collapse_whitespace(query.unwrap_or_default())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_signature_normalizes_whitespace() {
        assert_eq!(
            query_signature(Some("Get"), Some("query Get {\r\n  a\n\n b }")),
            "# Get\nquery Get { a b }"
        );
    }

    #[test]
    fn test_query_signature_anonymous_operation() {
        assert_eq!(query_signature(None, Some("{ a }")), "# -\n{ a }");
        assert_eq!(query_signature(Some("  "), Some("{ a }")), "# -\n{ a }");
    }

    #[test]
    fn test_query_signature_missing_query() {
        assert_eq!(query_signature(Some("Get"), None), "# Get\n");
    }

    #[test]
    fn test_query_signature_groups_formatting_variants() {
        let compact = query_signature(Some("Hero"), Some("query Hero { hero { name } }"));
        let pretty = query_signature(
            Some("Hero"),
            Some("query Hero {\n  hero {\n    name\n  }\n}\n"),
        );
        assert_eq!(compact, pretty);
    }
}
