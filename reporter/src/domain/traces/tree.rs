//! Trace tree reconstruction
//!
//! Turns the flat, path-addressed resolver timings of one request into a tree
//! shaped like the GraphQL response. List-typed fields get one synthetic child
//! per element so that element fields hang under their index.
//!
//! ## Input order
//!
//! `timings` must already be in collation order (see [`super::collate`]): a
//! parent precedes all of its descendants and the records of one subtree are
//! contiguous. The builder never re-sorts; it walks the slice exactly once with
//! a [`ResolverCursor`] shared by the whole descent.
//!
//! ## Errors
//!
//! The root takes every top-level error. Below the root, each resolved field
//! takes the errors whose path equals its own; errors pointing below the last
//! resolved field of a branch are not attached anywhere.

use super::types::{FieldError, FieldTiming, PathSegment, TraceNode};

/// Forward-only position in the sorted timing list
#[derive(Debug)]
pub struct ResolverCursor<'a> {
    timings: &'a [FieldTiming],
    position: usize,
}

impl<'a> ResolverCursor<'a> {
    pub fn new(timings: &'a [FieldTiming], position: usize) -> Self {
        Self { timings, position }
    }

    pub fn peek(&self) -> Option<&'a FieldTiming> {
        self.timings.get(self.position)
    }

    pub fn advance(&mut self) {
        if self.position < self.timings.len() {
            self.position += 1;
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.timings.len()
    }
}

/// Reconstruct the trace tree of one request.
///
/// Returns `None` when there is neither a top-level timing record nor any error.
pub fn build(timings: &[FieldTiming], errors: &[FieldError]) -> Option<TraceNode> {
    let top_level = errors.iter().filter(|e| e.is_top_level());

    let Some(root_position) = timings.iter().position(|t| t.path.len() == 1) else {
        if errors.is_empty() {
            return None;
        }
        return Some(TraceNode::error_shell(top_level));
    };

    let root_timing = &timings[root_position];
    let root = TraceNode::for_resolver(root_timing, top_level);
    let beneath: Vec<&FieldError> = errors
        .iter()
        .filter(|e| e.is_beneath(&root_timing.path))
        .collect();

    let mut cursor = ResolverCursor::new(timings, root_position + 1);
    let root = descend(&mut cursor, &root_timing.path, root, &beneath);

    if !cursor.is_exhausted() {
        tracing::trace!(
            consumed = cursor.position(),
            total = timings.len(),
            "Resolver timings left outside the root subtree"
        );
    }
    Some(root)
}

/// Consume the contiguous run of records that belong directly under `node`.
fn descend(
    cursor: &mut ResolverCursor<'_>,
    path: &[PathSegment],
    mut node: TraceNode,
    errors: &[&FieldError],
) -> TraceNode {
    if is_list_type(&node.type_name) {
        let element_type = list_element_type(&node.type_name);

        // Element fields sit two segments down: [..path, index, field]
        while let Some(record) = cursor.peek() {
            if record.path.len() != path.len() + 2 || !record.path.starts_with(path) {
                break;
            }

            let Some(index) = record.path[path.len()].as_index() else {
                tracing::trace!(path = ?record.path, "Expected a list index, skipping record");
                cursor.advance();
                continue;
            };

            let mut element_path = path.to_vec();
            element_path.push(PathSegment::Index(index));

            let start = cursor.position();
            let element = TraceNode::for_list_element(index, &node.type_name, element_type.clone());
            let element_errors: Vec<&FieldError> = errors
                .iter()
                .copied()
                .filter(|e| e.is_beneath(&element_path))
                .collect();
            let element = descend(cursor, &element_path, element, &element_errors);
            node.children.push(element);

            // Nothing under this index matched; skip the record so the run keeps moving
            if cursor.position() == start {
                tracing::trace!(
                    path = ?record.path,
                    "List element consumed no records, forcing cursor forward"
                );
                cursor.advance();
            }
        }
    } else {
        while let Some(record) = cursor.peek() {
            if record.path.len() != path.len() + 1 || !record.path.starts_with(path) {
                break;
            }
            cursor.advance();

            let child = TraceNode::for_resolver(
                record,
                errors.iter().copied().filter(|e| e.is_at(&record.path)),
            );
            let child_errors: Vec<&FieldError> = errors
                .iter()
                .copied()
                .filter(|e| e.is_beneath(&record.path))
                .collect();
            let child = descend(cursor, &record.path, child, &child_errors);
            node.children.push(child);
        }
    }

    node
}

/// `[T]`, `[T!]`, `[T]!` are lists; anything else is treated as a scalar or object
pub fn is_list_type(type_name: &str) -> bool {
    let type_name = type_name.trim_end_matches('!');
    type_name.starts_with('[') && type_name.ends_with(']')
}

/// Strip one non-null marker and one list wrapper: `[Character!]!` -> `Character!`.
///
/// Nested lists lose a single level only, so `[[Int]]` becomes `[Int]`.
pub fn list_element_type(type_name: &str) -> String {
    let type_name = type_name.trim_end_matches('!');
    type_name
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(type_name)
        .to_string()
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
