//! Vertical slots for cards that share an origin cell.

use std::collections::HashMap;

use super::geometry::{GridSpan, CARD_PITCH};

/// Assign a stack slot to every span, in the order given. Spans sharing the
/// same `(segment_start, start_index)` get 0, 1, 2, ... in that order.
pub fn assign_stack_slots(spans: &[GridSpan]) -> Vec<usize> {
    let mut counters: HashMap<(usize, usize), usize> = HashMap::new();
    spans
        .iter()
        .map(|span| {
            let slot = counters.entry(span.origin()).or_insert(0);
            let index = *slot;
            *slot += 1;
            index
        })
        .collect()
}

/// Vertical pixel offset of a stack slot. Deep stacks run past the row.
pub fn stack_offset(stack_index: usize) -> f32 {
    stack_index as f32 * CARD_PITCH
}
