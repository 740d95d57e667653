//! Candidate normalization per QUERY.md §5
//!
//! Collapses a raw AND/OR candidate tree into its most index-efficient
//! equivalent form: one two-sided range probe instead of two one-sided
//! scans, one composite-index probe instead of an intersection of
//! single-field probes. Normalization never errors: an unnormalizable
//! tree yields `None` and the caller keeps the raw tree as a
//! multi-probe fallback plan.

use std::collections::HashSet;

use log::debug;

use super::candidate::{IndexCandidate, IndexOperation, RangeBound};
use super::finder::SchemaProvider;

/// Normalizes a candidate tree, or reports that no normalized form
/// exists.
pub fn normalize(candidate: &IndexCandidate, schema: &dyn SchemaProvider) -> Option<IndexCandidate> {
    match candidate {
        IndexCandidate::Leaf { .. }
        | IndexCandidate::Chain { .. }
        | IndexCandidate::Range { .. } => Some(candidate.clone()),

        // A union normalizes only if every branch does; a failing
        // branch fails the whole group.
        IndexCandidate::Or { children } => {
            let normalized: Option<Vec<IndexCandidate>> = children
                .iter()
                .map(|child| normalize(child, schema))
                .collect();
            normalized.map(|children| IndexCandidate::Or { children })
        }

        IndexCandidate::And { children } => normalize_and(children, schema),
    }
}

fn normalize_and(children: &[IndexCandidate], schema: &dyn SchemaProvider) -> Option<IndexCandidate> {
    match children {
        [] => None,
        [single] => normalize(single, schema),
        _ => merge_range_pair(children).or_else(|| collapse_eq_prefix(children, schema)),
    }
}

/// AND of two opposite-direction range leaves on the same index
/// merges into one two-sided `Range` probe.
fn merge_range_pair(children: &[IndexCandidate]) -> Option<IndexCandidate> {
    let [a, b] = children else {
        return None;
    };

    let (low, high) = if is_lower_leaf(a) && is_upper_leaf(b) {
        (a, b)
    } else if is_lower_leaf(b) && is_upper_leaf(a) {
        (b, a)
    } else {
        return None;
    };

    let IndexCandidate::Leaf {
        index,
        class,
        field,
        operation: low_op,
        operand: Some(low_value),
    } = low
    else {
        return None;
    };
    let IndexCandidate::Leaf {
        index: high_index,
        operation: high_op,
        operand: Some(high_value),
        ..
    } = high
    else {
        return None;
    };

    if index != high_index {
        return None;
    }

    Some(IndexCandidate::Range {
        index: index.clone(),
        class: class.clone(),
        field: field.clone(),
        low: Some(bound(low_value.clone(), *low_op)),
        high: Some(bound(high_value.clone(), *high_op)),
    })
}

fn is_lower_leaf(candidate: &IndexCandidate) -> bool {
    matches!(
        candidate,
        IndexCandidate::Leaf { operation, .. } if operation.is_lower_bound()
    )
}

fn is_upper_leaf(candidate: &IndexCandidate) -> bool {
    matches!(
        candidate,
        IndexCandidate::Leaf { operation, .. } if operation.is_upper_bound()
    )
}

fn bound(value: serde_json::Value, op: IndexOperation) -> RangeBound {
    if matches!(op, IndexOperation::Gte | IndexOperation::Lte) {
        RangeBound::inclusive(value)
    } else {
        RangeBound::exclusive(value)
    }
}

/// AND of equality leaves on distinct fields of one class collapses
/// onto the first declared composite index whose leading field is
/// among the AND'd fields. The usable portion is the maximal
/// contiguous prefix of the declared field order; fields past the
/// first gap stay residual. Single-column indexes are not
/// reconsidered here.
fn collapse_eq_prefix(
    children: &[IndexCandidate],
    schema: &dyn SchemaProvider,
) -> Option<IndexCandidate> {
    let mut class: Option<&str> = None;
    let mut fields: HashSet<&str> = HashSet::new();

    for child in children {
        let IndexCandidate::Leaf {
            class: child_class,
            field,
            operation: IndexOperation::Eq,
            ..
        } = child
        else {
            return None;
        };
        match class {
            None => class = Some(child_class),
            Some(c) if c == child_class => {}
            Some(_) => return None,
        }
        if !fields.insert(field.as_str()) {
            // Two equality probes on one field never collapse
            return None;
        }
    }

    let class = class?;
    let class_def = schema.class(class)?;

    for index in &class_def.indexes {
        if !index.is_composite() || index.map_access.is_some() {
            continue;
        }
        let Some(first) = index.first_field() else {
            continue;
        };
        if !fields.contains(first) {
            continue;
        }

        let prefix_len = index
            .fields
            .iter()
            .take_while(|field| fields.contains(field.as_str()))
            .count();
        if prefix_len < fields.len() {
            debug!(
                "composite collapse onto '{}' covers {} of {} AND'd fields; rest stay residual",
                index.name,
                prefix_len,
                fields.len()
            );
        }

        return Some(IndexCandidate::leaf(
            &index.name,
            class,
            first,
            IndexOperation::Eq,
        ));
    }

    None
}
