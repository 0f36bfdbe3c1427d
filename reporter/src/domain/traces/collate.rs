//! Resolver timing collation
//!
//! Execution engines report resolver timings in completion order. The tree
//! builder needs them grouped by subtree, so they are sorted by path first:
//! segment by segment, numeric segments numerically, everything else as
//! case-insensitive text, with a prefix sorting before its extensions.

use std::cmp::Ordering;

use super::types::{FieldTiming, PathSegment};

/// Total order over response paths
pub fn compare_paths(a: &[PathSegment], b: &[PathSegment]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| compare_segments(x, y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn compare_segments(a: &PathSegment, b: &PathSegment) -> Ordering {
    match (a, b) {
        (PathSegment::Index(x), PathSegment::Index(y)) => x.cmp(y),
        (PathSegment::Field(x), PathSegment::Field(y)) => cmp_ignore_ascii_case(x, y),
        _ => cmp_ignore_ascii_case(&a.to_string(), &b.to_string()),
    }
}

fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_uppercase())
        .cmp(b.bytes().map(|c| c.to_ascii_uppercase()))
}

/// Sort timings into the order the tree builder expects (stable)
pub fn sort_timings(timings: &mut [FieldTiming]) {
    timings.sort_by(|a, b| compare_paths(&a.path, &b.path));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response_path;

    fn paths(timings: &[FieldTiming]) -> Vec<String> {
        timings
            .iter()
            .map(|t| {
                t.path
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect()
    }

    fn timing(path: Vec<PathSegment>) -> FieldTiming {
        FieldTiming {
            path,
            parent_type: String::new(),
            field_name: String::new(),
            return_type: String::new(),
            start_offset_nanos: 0,
            duration_nanos: 0,
        }
    }

    #[test]
    fn test_parent_sorts_before_children() {
        let mut timings = vec![
            timing(response_path!["hero", "name"]),
            timing(response_path!["hero"]),
        ];
        sort_timings(&mut timings);
        assert_eq!(paths(&timings), vec!["hero", "hero.name"]);
    }

    #[test]
    fn test_indices_sort_numerically() {
        let mut timings = vec![
            timing(response_path!["heroes", 10, "name"]),
            timing(response_path!["heroes", 2, "name"]),
            timing(response_path!["heroes", 1, "name"]),
            timing(response_path!["heroes"]),
        ];
        sort_timings(&mut timings);
        assert_eq!(
            paths(&timings),
            vec!["heroes", "heroes.1.name", "heroes.2.name", "heroes.10.name"]
        );
    }

    #[test]
    fn test_fields_sort_case_insensitively() {
        let mut timings = vec![
            timing(response_path!["me", "name"]),
            timing(response_path!["me", "Avatar"]),
            timing(response_path!["me", "id"]),
        ];
        sort_timings(&mut timings);
        assert_eq!(paths(&timings), vec!["me.Avatar", "me.id", "me.name"]);
    }

    #[test]
    fn test_underscore_fields_sort_after_letters() {
        let mut timings = vec![
            timing(response_path!["me", "__typename"]),
            timing(response_path!["me", "name"]),
            timing(response_path!["me", "Avatar"]),
        ];
        sort_timings(&mut timings);
        assert_eq!(paths(&timings), vec!["me.Avatar", "me.name", "me.__typename"]);
    }

    #[test]
    fn test_subtrees_stay_contiguous() {
        let mut timings = vec![
            timing(response_path!["heroes", 1, "name"]),
            timing(response_path!["heroes", 0, "friends"]),
            timing(response_path!["heroes", 0, "friends", 0, "name"]),
            timing(response_path!["heroes", 0, "name"]),
            timing(response_path!["heroes"]),
        ];
        sort_timings(&mut timings);
        assert_eq!(
            paths(&timings),
            vec![
                "heroes",
                "heroes.0.friends",
                "heroes.0.friends.0.name",
                "heroes.0.name",
                "heroes.1.name",
            ]
        );
    }

    #[test]
    fn test_compare_paths_prefix_first() {
        assert_eq!(
            compare_paths(&response_path!["a"], &response_path!["a", "b"]),
            Ordering::Less
        );
        assert_eq!(
            compare_paths(&response_path!["a", 0], &response_path!["a", 0]),
            Ordering::Equal
        );
    }
}
